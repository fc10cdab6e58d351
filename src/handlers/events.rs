//! Event handlers: lifecycle, staff assignments, attendance, notes

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::event::{
    AssignEventStaffRequest, CreateEventNoteRequest, CreateEventRequest, Event, EventAttendance,
    EventNote, EventScanRequest, EventStaff, EventStatus, UpdateEventRequest,
};
use crate::services::StaffContext;
use crate::state::AppState;
use crate::utils::errors::{OpenAttendanceError, Result};

#[derive(Debug, Deserialize)]
pub struct EventListQuery {
    pub status: Option<String>,
}

/// Reject inverted or empty time ranges
fn check_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end <= start {
        return Err(OpenAttendanceError::InvalidInput(
            "end_datetime must be after start_datetime".to_string(),
        ));
    }
    Ok(())
}

async fn find_event(state: &AppState, event_id: i64) -> Result<Event> {
    state
        .database
        .events
        .find_by_id(event_id)
        .await?
        .ok_or(OpenAttendanceError::EventNotFound { event_id })
}

/// GET /api/events
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<Event>>> {
    if let Some(status) = query.status.as_deref() {
        if EventStatus::parse(status).is_none() {
            return Err(OpenAttendanceError::InvalidInput(format!(
                "unknown event status: {status}"
            )));
        }
    }
    let events = state.database.events.list(query.status.as_deref()).await?;
    Ok(Json(events))
}

/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    check_time_range(request.start_datetime, request.end_datetime)?;
    let event = state.database.events.create(request, &context.staff_id).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/events/:event_id
pub async fn get(State(state): State<AppState>, Path(event_id): Path<i64>) -> Result<Json<Event>> {
    Ok(Json(find_event(&state, event_id).await?))
}

/// PUT /api/events/:event_id
pub async fn update(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    if request.start_datetime.is_some() || request.end_datetime.is_some() {
        let current = find_event(&state, event_id).await?;
        check_time_range(
            request.start_datetime.unwrap_or(current.start_datetime),
            request.end_datetime.unwrap_or(current.end_datetime),
        )?;
    }
    let event = state.database.events.update(event_id, request).await?;
    Ok(Json(event))
}

/// DELETE /api/events/:event_id
pub async fn delete(State(state): State<AppState>, Path(event_id): Path<i64>) -> Result<StatusCode> {
    state.database.events.delete(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// PUT /api/events/:event_id/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<Event>> {
    let next = EventStatus::parse(&request.status).ok_or_else(|| {
        OpenAttendanceError::InvalidInput(format!("unknown event status: {}", request.status))
    })?;

    let event = find_event(&state, event_id).await?;
    let current = EventStatus::parse(&event.status).ok_or_else(|| {
        OpenAttendanceError::Config(format!("stored event status is invalid: {}", event.status))
    })?;

    if !current.can_transition_to(next) {
        return Err(OpenAttendanceError::InvalidStatusTransition {
            from: event.status,
            to: request.status,
        });
    }

    let event = state.database.events.set_status(event_id, next).await?;
    Ok(Json(event))
}

/// POST /api/events/:event_id/staff
pub async fn assign_staff(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(request): Json<AssignEventStaffRequest>,
) -> Result<(StatusCode, Json<EventStaff>)> {
    find_event(&state, event_id).await?;
    let staff = state
        .database
        .staff
        .find_by_staff_id(&request.staff_id)
        .await?
        .ok_or(OpenAttendanceError::StaffNotFound {
            staff_id: request.staff_id.clone(),
        })?;

    let assignment = state
        .database
        .events
        .assign_staff(event_id, &staff.staff_id, request.role.as_deref().unwrap_or("scanner"))
        .await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// DELETE /api/events/:event_id/staff/:staff_id
pub async fn unassign_staff(
    State(state): State<AppState>,
    Path((event_id, staff_id)): Path<(i64, String)>,
) -> Result<StatusCode> {
    state.database.events.unassign_staff(event_id, &staff_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/events/:event_id/staff
pub async fn list_staff(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<EventStaff>>> {
    find_event(&state, event_id).await?;
    let staff = state.database.events.list_staff(event_id).await?;
    Ok(Json(staff))
}

/// POST /api/events/:event_id/scan
///
/// Same in/out toggle as the daily kiosk, scoped to one ongoing event.
pub async fn scan(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Path(event_id): Path<i64>,
    Json(request): Json<EventScanRequest>,
) -> Result<(StatusCode, Json<EventAttendance>)> {
    let event = find_event(&state, event_id).await?;
    if event.status != "ongoing" {
        return Err(OpenAttendanceError::Conflict(format!(
            "event is {}, scans are only accepted while ongoing",
            event.status
        )));
    }

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
    let existing = state
        .database
        .events
        .find_attendance(event_id, &student.student_id)
        .await?;

    match existing {
        None => {
            let attendance = state
                .database
                .events
                .check_in_attendee(
                    event_id,
                    &student.student_id,
                    &context.staff_id,
                    now,
                    request.client_time.as_deref(),
                    request.location.as_deref(),
                )
                .await?;
            Ok((StatusCode::CREATED, Json(attendance)))
        }
        Some(record) if record.time_out.is_none() => {
            let attendance = state
                .database
                .events
                .check_out_attendee(record.id, now, request.client_time.as_deref())
                .await?;
            Ok((StatusCode::OK, Json(attendance)))
        }
        Some(_) => Err(OpenAttendanceError::Conflict(
            "attendee already checked out of this event".to_string(),
        )),
    }
}

/// GET /api/events/:event_id/attendance
pub async fn list_attendance(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<EventAttendance>>> {
    find_event(&state, event_id).await?;
    let attendance = state.database.events.list_attendance(event_id).await?;
    Ok(Json(attendance))
}

/// POST /api/events/:event_id/notes
pub async fn add_note(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Path(event_id): Path<i64>,
    Json(request): Json<CreateEventNoteRequest>,
) -> Result<(StatusCode, Json<EventNote>)> {
    if request.note_content.trim().is_empty() {
        return Err(OpenAttendanceError::InvalidInput(
            "note_content is required".to_string(),
        ));
    }
    find_event(&state, event_id).await?;
    let note = state
        .database
        .events
        .add_note(event_id, Some(&context.staff_id), &request.note_content)
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/events/:event_id/notes
pub async fn list_notes(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<EventNote>>> {
    find_event(&state, event_id).await?;
    let notes = state.database.events.list_notes(event_id).await?;
    Ok(Json(notes))
}

/// DELETE /api/events/:event_id/notes/:note_id
pub async fn delete_note(
    State(state): State<AppState>,
    Path((event_id, note_id)): Path<(i64, i64)>,
) -> Result<StatusCode> {
    state.database.events.delete_note(event_id, note_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_time_range_must_move_forward() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap();
        assert!(check_time_range(start, end).is_ok());
        assert!(check_time_range(end, start).is_err());
        assert!(check_time_range(start, start).is_err());
    }
}
