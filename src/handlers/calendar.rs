//! Calendar and holiday handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};

use crate::models::calendar::{
    CalendarConfig, CreateHolidayRequest, CustomHoliday, UpsertCalendarConfigRequest,
};
use crate::services::StaffContext;
use crate::state::AppState;
use crate::utils::errors::{OpenAttendanceError, Result};

/// GET /api/calendar
pub async fn get_config(State(state): State<AppState>) -> Result<Json<CalendarConfig>> {
    let config = state
        .database
        .calendar
        .get_config()
        .await?
        .ok_or_else(|| OpenAttendanceError::NotFound("calendar configuration".to_string()))?;
    Ok(Json(config))
}

/// PUT /api/calendar
pub async fn upsert_config(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Json(request): Json<UpsertCalendarConfigRequest>,
) -> Result<Json<CalendarConfig>> {
    context.ensure_admin()?;
    if request.country.trim().is_empty() {
        return Err(OpenAttendanceError::InvalidInput(
            "country is required".to_string(),
        ));
    }
    let config = state.database.calendar.upsert_config(request).await?;
    Ok(Json(config))
}

/// GET /api/calendar/holidays
pub async fn list_holidays(State(state): State<AppState>) -> Result<Json<Vec<CustomHoliday>>> {
    let holidays = state.database.calendar.list_holidays().await?;
    Ok(Json(holidays))
}

/// POST /api/calendar/holidays
pub async fn create_holiday(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Json(request): Json<CreateHolidayRequest>,
) -> Result<(StatusCode, Json<CustomHoliday>)> {
    context.ensure_admin()?;
    if request.name.trim().is_empty() {
        return Err(OpenAttendanceError::InvalidInput(
            "name is required".to_string(),
        ));
    }
    let holiday = state.database.calendar.create_holiday(request).await?;
    Ok((StatusCode::CREATED, Json(holiday)))
}

/// DELETE /api/calendar/holidays/:id
pub async fn delete_holiday(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    context.ensure_admin()?;
    state.database.calendar.delete_holiday(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
