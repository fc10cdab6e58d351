//! Attendance handlers: kiosk scans, records, manual absences, excused
//! requests, and the attendance sheet export

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::attendance::{
    AbsentRecord, AttendanceRecordsQuery, CreateExcusedRequest, DailyAttendanceLog,
    ExcusedRequest, ExcusedVerdictRequest, ManualAbsenceRequest, PresentRecord, ScanDirection,
    ScanRequest, ScanResponse,
};
use crate::models::student::StudentListQuery;
use crate::services::StaffContext;
use crate::state::AppState;
use crate::utils::errors::{OpenAttendanceError, Result};
use crate::utils::helpers::slot_for_time;
use crate::utils::logging::log_scan;

/// What an accepted scan should do, decided from today's present row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanAction {
    CheckIn,
    CheckOut { present_id: i64 },
}

/// The scan toggle: no row for today checks the student in, an open row
/// checks them out, and a completed row is a duplicate scan.
fn scan_action(existing: Option<&PresentRecord>) -> Result<ScanAction> {
    match existing {
        None => Ok(ScanAction::CheckIn),
        Some(record) if record.time_out.is_none() => Ok(ScanAction::CheckOut {
            present_id: record.present_id,
        }),
        Some(_) => Err(OpenAttendanceError::Conflict(
            "attendance already completed for today".to_string(),
        )),
    }
}

/// POST /api/attendance/scan
///
/// First scan of the day checks the student in, the second checks them out,
/// a third is rejected. Every accepted scan also lands in the slot log.
pub async fn scan(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Json(request): Json<ScanRequest>,
) -> Result<(StatusCode, Json<ScanResponse>)> {
    state.scan_rate_limiter.check_rate_limit(&context.staff_id)?;

    let student = state
        .database
        .students
        .find_by_qr_token(&request.qr_code_token)
        .await?
        .ok_or_else(|| OpenAttendanceError::NotFound("student badge".to_string()))?;

    if !student.is_active() {
        return Err(OpenAttendanceError::PermissionDenied(format!(
            "student {} is not active",
            student.student_id
        )));
    }

    let now = state.effective_now().await?;
    let today = now.date_naive();

    let existing = state
        .database
        .attendance
        .find_present(&student.student_id, today)
        .await?;

    let (direction, status_code) = match scan_action(existing.as_ref())? {
        ScanAction::CheckIn => {
            state
                .database
                .attendance
                .check_in(
                    &student.student_id,
                    &context.staff_id,
                    today,
                    now,
                    request.client_time.as_deref(),
                    request.location.as_deref(),
                )
                .await?;
            (ScanDirection::CheckIn, StatusCode::CREATED)
        }
        ScanAction::CheckOut { present_id } => {
            state
                .database
                .attendance
                .check_out(present_id, now, request.client_time.as_deref())
                .await?;
            (ScanDirection::CheckOut, StatusCode::OK)
        }
    };

    let slot = slot_for_time(now.time(), direction == ScanDirection::CheckIn);
    state
        .database
        .attendance
        .record_slot_log(&student.student_id, &context.staff_id, today, slot, now)
        .await?;

    let direction_label = match direction {
        ScanDirection::CheckIn => "check_in",
        ScanDirection::CheckOut => "check_out",
    };
    log_scan(
        &student.student_id,
        &context.staff_id,
        direction_label,
        request.location.as_deref(),
    );

    Ok((
        status_code,
        Json(ScanResponse {
            student_id: student.student_id.clone(),
            student_name: student.full_name(),
            direction,
            server_time: now,
        }),
    ))
}

/// GET /api/attendance/records
pub async fn records(
    State(state): State<AppState>,
    Query(query): Query<AttendanceRecordsQuery>,
) -> Result<Json<Value>> {
    let present = state.database.attendance.list_present_range(&query).await?;
    let absent = state.database.attendance.list_absent_range(&query).await?;
    Ok(Json(json!({ "present": present, "absent": absent })))
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<NaiveDate>,
}

/// GET /api/attendance/day
pub async fn day(
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<Value>> {
    let date = match query.date {
        Some(date) => date,
        None => state.effective_now().await?.date_naive(),
    };
    let present: Vec<PresentRecord> = state.database.attendance.list_present_for_date(date).await?;
    let absent: Vec<AbsentRecord> = state.database.attendance.list_absent_for_date(date).await?;
    Ok(Json(json!({ "date": date, "present": present, "absent": absent })))
}

/// GET /api/attendance/:student_id/slots
pub async fn slot_logs(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Query(query): Query<DayQuery>,
) -> Result<Json<Vec<DailyAttendanceLog>>> {
    let date = match query.date {
        Some(date) => date,
        None => state.effective_now().await?.date_naive(),
    };
    let logs = state.database.attendance.list_slot_logs(&student_id, date).await?;
    Ok(Json(logs))
}

/// POST /api/attendance/absent
pub async fn mark_absent(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Json(request): Json<ManualAbsenceRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let student = state
        .database
        .students
        .find_by_student_id(&request.student_id)
        .await?
        .ok_or_else(|| OpenAttendanceError::StudentNotFound {
            student_id: request.student_id.clone(),
        })?;

    let now = state.effective_now().await?;
    let date = request.absent_date.unwrap_or_else(|| now.date_naive());

    let inserted = state
        .database
        .attendance
        .mark_absent_if_unrecorded(
            &student.student_id,
            Some(&context.staff_id),
            request.reason.as_deref(),
            date,
            now,
        )
        .await?;

    if !inserted {
        return Err(OpenAttendanceError::Conflict(format!(
            "student {} already has an attendance record for {date}",
            student.student_id
        )));
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "student_id": student.student_id, "absent_date": date })),
    ))
}

/// POST /api/attendance/excused
pub async fn create_excused(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Json(request): Json<CreateExcusedRequest>,
) -> Result<(StatusCode, Json<ExcusedRequest>)> {
    if request.reason.trim().is_empty() {
        return Err(OpenAttendanceError::InvalidInput(
            "reason is required".to_string(),
        ));
    }

    let now = state.effective_now().await?;
    let date = request.excused_date.unwrap_or_else(|| now.date_naive());
    let excused = state
        .database
        .attendance
        .create_excused(&request.student_id, &context.staff_id, &request.reason, date, now)
        .await?;

    Ok((StatusCode::CREATED, Json(excused)))
}

#[derive(Debug, Deserialize)]
pub struct ExcusedListQuery {
    pub result: Option<String>,
}

/// GET /api/attendance/excused
pub async fn list_excused(
    State(state): State<AppState>,
    Query(query): Query<ExcusedListQuery>,
) -> Result<Json<Vec<ExcusedRequest>>> {
    let requests = state
        .database
        .attendance
        .list_excused(query.result.as_deref())
        .await?;
    Ok(Json(requests))
}

/// PUT /api/attendance/excused/:excused_id
pub async fn excused_verdict(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Path(excused_id): Path<i64>,
    Json(request): Json<ExcusedVerdictRequest>,
) -> Result<Json<ExcusedRequest>> {
    if !matches!(request.result.as_str(), "excused" | "denied") {
        return Err(OpenAttendanceError::InvalidInput(
            "result must be 'excused' or 'denied'".to_string(),
        ));
    }

    let now = state.effective_now().await?;
    let excused = state
        .database
        .attendance
        .apply_excused_verdict(excused_id, &context.staff_id, &request.result, now)
        .await?;

    Ok(Json(excused))
}

#[derive(Debug, Deserialize)]
pub struct SheetQuery {
    pub section: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// GET /api/attendance/export/sheet.csv
///
/// Monthly attendance sheet for one section, with the school header block.
pub async fn export_sheet(
    State(state): State<AppState>,
    Query(query): Query<SheetQuery>,
) -> Result<impl IntoResponse> {
    let config = state.database.school.get().await?;
    let section = state
        .database
        .sections
        .find_by_name(&query.section)
        .await?
        .ok_or_else(|| OpenAttendanceError::NotFound(format!("section {}", query.section)))?;

    let students = state
        .database
        .students
        .list(&StudentListQuery {
            section: Some(query.section.clone()),
            status: Some("Active".to_string()),
            limit: Some(1000),
            offset: None,
        })
        .await?;

    let range = AttendanceRecordsQuery {
        from: Some(query.from),
        to: Some(query.to),
        section: Some(query.section.clone()),
        limit: Some(5000),
        offset: None,
    };
    let present = state.database.attendance.list_present_range(&range).await?;
    let absent = state.database.attendance.list_absent_range(&range).await?;

    let csv = state.services.export_service.attendance_csv(
        config.as_ref(),
        &query.section,
        section.grade_level,
        query.from,
        query.to,
        &students,
        &present,
        &absent,
    )?;

    let file_name = format!(
        "attendance_{}_{:04}-{:02}.csv",
        query.section,
        query.from.year(),
        query.from.month()
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn present_row(time_out: Option<chrono::DateTime<Utc>>) -> PresentRecord {
        PresentRecord {
            present_id: 7,
            student_id: "S-1".into(),
            staff_id: "STF-1".into(),
            attendance_date: NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
            time_in: Utc.with_ymd_and_hms(2026, 8, 28, 7, 30, 0).unwrap(),
            time_out,
            time_in_client: None,
            time_out_client: None,
            location: None,
        }
    }

    #[test]
    fn test_first_scan_checks_in() {
        assert_eq!(scan_action(None).unwrap(), ScanAction::CheckIn);
    }

    #[test]
    fn test_open_row_checks_out() {
        let row = present_row(None);
        assert_eq!(
            scan_action(Some(&row)).unwrap(),
            ScanAction::CheckOut { present_id: 7 }
        );
    }

    #[test]
    fn test_completed_row_is_a_conflict() {
        let row = present_row(Some(Utc.with_ymd_and_hms(2026, 8, 28, 16, 5, 0).unwrap()));
        let err = scan_action(Some(&row)).unwrap_err();
        assert!(matches!(err, OpenAttendanceError::Conflict(_)));
    }
}
