//! Event repository implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::event::{
    CreateEventRequest, Event, EventAttendance, EventNote, EventStaff, EventStatus,
    UpdateEventRequest,
};
use crate::utils::errors::{OpenAttendanceError, Result};

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        request: CreateEventRequest,
        created_by_staff_id: &str,
    ) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (event_name, event_description, event_type, location, start_datetime, end_datetime, created_by_staff_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.event_name)
        .bind(request.event_description)
        .bind(request.event_type)
        .bind(request.location)
        .bind(request.start_datetime)
        .bind(request.end_datetime)
        .bind(created_by_staff_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    pub async fn find_by_id(&self, event_id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE event_id = $1")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    pub async fn update(&self, event_id: i64, request: UpdateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET event_name = COALESCE($2, event_name),
                event_description = COALESCE($3, event_description),
                event_type = COALESCE($4, event_type),
                location = COALESCE($5, location),
                start_datetime = COALESCE($6, start_datetime),
                end_datetime = COALESCE($7, end_datetime),
                updated_at = NOW()
            WHERE event_id = $1
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(request.event_name)
        .bind(request.event_description)
        .bind(request.event_type)
        .bind(request.location)
        .bind(request.start_datetime)
        .bind(request.end_datetime)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(OpenAttendanceError::EventNotFound { event_id })?;

        Ok(event)
    }

    pub async fn delete(&self, event_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OpenAttendanceError::EventNotFound { event_id });
        }

        Ok(())
    }

    pub async fn list(&self, status: Option<&str>) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT * FROM events
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY start_datetime DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    pub async fn set_status(&self, event_id: i64, status: EventStatus) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(
            "UPDATE events SET status = $2, updated_at = NOW() WHERE event_id = $1 RETURNING *",
        )
        .bind(event_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(OpenAttendanceError::EventNotFound { event_id })?;

        Ok(event)
    }

    /// Advance planned events whose start time has passed. Returns affected rows.
    pub async fn advance_started(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE events SET status = 'ongoing', updated_at = NOW() WHERE status = 'planned' AND start_datetime <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Complete ongoing events whose end time has passed. Returns affected rows.
    pub async fn advance_ended(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE events SET status = 'completed', updated_at = NOW() WHERE status = 'ongoing' AND end_datetime <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn assign_staff(
        &self,
        event_id: i64,
        staff_id: &str,
        role: &str,
    ) -> Result<EventStaff> {
        let assignment = sqlx::query_as::<_, EventStaff>(
            r#"
            INSERT INTO event_staff (event_id, staff_id, role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(staff_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(assignment)
    }

    pub async fn unassign_staff(&self, event_id: i64, staff_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM event_staff WHERE event_id = $1 AND staff_id = $2")
            .bind(event_id)
            .bind(staff_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OpenAttendanceError::NotFound("event staff assignment".to_string()));
        }

        Ok(())
    }

    pub async fn list_staff(&self, event_id: i64) -> Result<Vec<EventStaff>> {
        let staff = sqlx::query_as::<_, EventStaff>(
            "SELECT * FROM event_staff WHERE event_id = $1 ORDER BY assigned_at",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn find_attendance(
        &self,
        event_id: i64,
        student_id: &str,
    ) -> Result<Option<EventAttendance>> {
        let attendance = sqlx::query_as::<_, EventAttendance>(
            "SELECT * FROM event_attendance WHERE event_id = $1 AND student_id = $2",
        )
        .bind(event_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    pub async fn check_in_attendee(
        &self,
        event_id: i64,
        student_id: &str,
        staff_id: &str,
        time_in: DateTime<Utc>,
        time_in_client: Option<&str>,
        location: Option<&str>,
    ) -> Result<EventAttendance> {
        let attendance = sqlx::query_as::<_, EventAttendance>(
            r#"
            INSERT INTO event_attendance (event_id, student_id, checked_in_by_staff_id, time_in, time_in_client, location)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(student_id)
        .bind(staff_id)
        .bind(time_in)
        .bind(time_in_client)
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        Ok(attendance)
    }

    pub async fn check_out_attendee(
        &self,
        attendance_id: i64,
        time_out: DateTime<Utc>,
        time_out_client: Option<&str>,
    ) -> Result<EventAttendance> {
        let attendance = sqlx::query_as::<_, EventAttendance>(
            r#"
            UPDATE event_attendance
            SET time_out = $2, time_out_client = $3
            WHERE id = $1 AND time_out IS NULL
            RETURNING *
            "#,
        )
        .bind(attendance_id)
        .bind(time_out)
        .bind(time_out_client)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| OpenAttendanceError::Conflict("attendee already checked out".to_string()))?;

        Ok(attendance)
    }

    pub async fn list_attendance(&self, event_id: i64) -> Result<Vec<EventAttendance>> {
        let attendance = sqlx::query_as::<_, EventAttendance>(
            "SELECT * FROM event_attendance WHERE event_id = $1 ORDER BY time_in",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attendance)
    }

    pub async fn add_note(
        &self,
        event_id: i64,
        staff_id: Option<&str>,
        content: &str,
    ) -> Result<EventNote> {
        let note = sqlx::query_as::<_, EventNote>(
            r#"
            INSERT INTO event_notes (event_id, staff_id, note_content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(staff_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(note)
    }

    pub async fn list_notes(&self, event_id: i64) -> Result<Vec<EventNote>> {
        let notes = sqlx::query_as::<_, EventNote>(
            "SELECT * FROM event_notes WHERE event_id = $1 ORDER BY created_at",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }

    pub async fn delete_note(&self, event_id: i64, note_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM event_notes WHERE note_id = $1 AND event_id = $2")
            .bind(note_id)
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OpenAttendanceError::NotFound("event note".to_string()));
        }

        Ok(())
    }
}
