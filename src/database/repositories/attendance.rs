//! Daily attendance repository implementation
//!
//! Holds the kiosk scan write path plus present/absent/excused queries used
//! by the REST handlers and the auto-absence sweep.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::models::attendance::{
    AbsentRecord, AttendanceRecordsQuery, DailyAttendanceLog, ExcusedRequest, PresentRecord,
};
use crate::utils::errors::{OpenAttendanceError, Result};

#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_present(
        &self,
        student_id: &str,
        date: NaiveDate,
    ) -> Result<Option<PresentRecord>> {
        let record = sqlx::query_as::<_, PresentRecord>(
            "SELECT * FROM present WHERE student_id = $1 AND attendance_date = $2",
        )
        .bind(student_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Insert a check-in row for the given day
    pub async fn check_in(
        &self,
        student_id: &str,
        staff_id: &str,
        date: NaiveDate,
        time_in: DateTime<Utc>,
        time_in_client: Option<&str>,
        location: Option<&str>,
    ) -> Result<PresentRecord> {
        let record = sqlx::query_as::<_, PresentRecord>(
            r#"
            INSERT INTO present (student_id, staff_id, attendance_date, time_in, time_in_client, location)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(student_id)
        .bind(staff_id)
        .bind(date)
        .bind(time_in)
        .bind(time_in_client)
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    /// Stamp the check-out time on an open present row
    pub async fn check_out(
        &self,
        present_id: i64,
        time_out: DateTime<Utc>,
        time_out_client: Option<&str>,
    ) -> Result<PresentRecord> {
        let record = sqlx::query_as::<_, PresentRecord>(
            r#"
            UPDATE present
            SET time_out = $2, time_out_client = $3
            WHERE present_id = $1 AND time_out IS NULL
            RETURNING *
            "#,
        )
        .bind(present_id)
        .bind(time_out)
        .bind(time_out_client)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| OpenAttendanceError::Conflict("attendance already checked out".to_string()))?;

        Ok(record)
    }

    /// Record a slot log entry; duplicate slots for the same day are ignored
    pub async fn record_slot_log(
        &self,
        student_id: &str,
        staff_id: &str,
        date: NaiveDate,
        slot: &str,
        datetime: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO daily_attendance_logs (student_id, staff_id, log_date, log_slot, log_datetime)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, log_date, log_slot) DO NOTHING
            "#,
        )
        .bind(student_id)
        .bind(staff_id)
        .bind(date)
        .bind(slot)
        .bind(datetime)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_slot_logs(
        &self,
        student_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<DailyAttendanceLog>> {
        let logs = sqlx::query_as::<_, DailyAttendanceLog>(
            "SELECT * FROM daily_attendance_logs WHERE student_id = $1 AND log_date = $2 ORDER BY log_datetime",
        )
        .bind(student_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Insert an absence row unless the student already has any attendance
    /// record for the day. Returns true when a row was inserted.
    pub async fn mark_absent_if_unrecorded(
        &self,
        student_id: &str,
        staff_id: Option<&str>,
        reason: Option<&str>,
        date: NaiveDate,
        datetime: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO absent (student_id, staff_id, reason, absent_date, absent_datetime)
            SELECT $1, $2, $3, $4, $5
            WHERE NOT EXISTS (SELECT 1 FROM present WHERE student_id = $1 AND attendance_date = $4)
              AND NOT EXISTS (SELECT 1 FROM absent WHERE student_id = $1 AND absent_date = $4)
              AND NOT EXISTS (
                  SELECT 1 FROM excused
                  WHERE student_id = $1 AND excused_date = $4 AND result = 'excused'
              )
            ON CONFLICT (student_id, absent_date) DO NOTHING
            "#,
        )
        .bind(student_id)
        .bind(staff_id)
        .bind(reason)
        .bind(date)
        .bind(datetime)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_present_for_date(&self, date: NaiveDate) -> Result<Vec<PresentRecord>> {
        let records = sqlx::query_as::<_, PresentRecord>(
            "SELECT * FROM present WHERE attendance_date = $1 ORDER BY time_in",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn list_absent_for_date(&self, date: NaiveDate) -> Result<Vec<AbsentRecord>> {
        let records = sqlx::query_as::<_, AbsentRecord>(
            "SELECT * FROM absent WHERE absent_date = $1 ORDER BY absent_datetime",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Present records over a date range, optionally restricted to a section
    pub async fn list_present_range(
        &self,
        query: &AttendanceRecordsQuery,
    ) -> Result<Vec<PresentRecord>> {
        let records = sqlx::query_as::<_, PresentRecord>(
            r#"
            SELECT p.* FROM present p
            JOIN students st ON st.student_id = p.student_id
            WHERE ($1::DATE IS NULL OR p.attendance_date >= $1)
              AND ($2::DATE IS NULL OR p.attendance_date <= $2)
              AND ($3::TEXT IS NULL OR st.classroom_section = $3)
            ORDER BY p.attendance_date, p.time_in
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(query.from)
        .bind(query.to)
        .bind(query.section.as_deref())
        .bind(query.limit.unwrap_or(500).clamp(1, 5000))
        .bind(query.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Absence records over a date range, optionally restricted to a section
    pub async fn list_absent_range(
        &self,
        query: &AttendanceRecordsQuery,
    ) -> Result<Vec<AbsentRecord>> {
        let records = sqlx::query_as::<_, AbsentRecord>(
            r#"
            SELECT a.* FROM absent a
            JOIN students st ON st.student_id = a.student_id
            WHERE ($1::DATE IS NULL OR a.absent_date >= $1)
              AND ($2::DATE IS NULL OR a.absent_date <= $2)
              AND ($3::TEXT IS NULL OR st.classroom_section = $3)
            ORDER BY a.absent_date, a.absent_datetime
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(query.from)
        .bind(query.to)
        .bind(query.section.as_deref())
        .bind(query.limit.unwrap_or(500).clamp(1, 5000))
        .bind(query.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn create_excused(
        &self,
        student_id: &str,
        requester_staff_id: &str,
        reason: &str,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ExcusedRequest> {
        let request = sqlx::query_as::<_, ExcusedRequest>(
            r#"
            INSERT INTO excused (student_id, requester_staff_id, reason, excused_date, request_datetime)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(student_id)
        .bind(requester_staff_id)
        .bind(reason)
        .bind(date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    /// Apply a verdict to a pending excused request
    pub async fn apply_excused_verdict(
        &self,
        excused_id: i64,
        processor_staff_id: &str,
        result: &str,
        now: DateTime<Utc>,
    ) -> Result<ExcusedRequest> {
        let request = sqlx::query_as::<_, ExcusedRequest>(
            r#"
            UPDATE excused
            SET result = $2, processor_staff_id = $3, verdict_datetime = $4
            WHERE excused_id = $1 AND result = 'pending'
            RETURNING *
            "#,
        )
        .bind(excused_id)
        .bind(result)
        .bind(processor_staff_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            OpenAttendanceError::Conflict("excused request is not pending".to_string())
        })?;

        Ok(request)
    }

    pub async fn list_excused(&self, result: Option<&str>) -> Result<Vec<ExcusedRequest>> {
        let requests = sqlx::query_as::<_, ExcusedRequest>(
            r#"
            SELECT * FROM excused
            WHERE ($1::TEXT IS NULL OR result = $1)
            ORDER BY request_datetime DESC
            "#,
        )
        .bind(result)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}
