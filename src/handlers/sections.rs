//! Section management handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::models::section::{CreateSectionRequest, Section, UpdateSectionRequest};
use crate::state::AppState;
use crate::utils::errors::{OpenAttendanceError, Result};
use crate::utils::helpers::parse_weekday;

fn validate_allowed_days(allowed_days: Option<&str>) -> Result<()> {
    if let Some(list) = allowed_days {
        for name in list.split(',').filter(|s| !s.trim().is_empty()) {
            if parse_weekday(name).is_none() {
                return Err(OpenAttendanceError::InvalidInput(format!(
                    "unknown weekday in allowed_days: {}",
                    name.trim()
                )));
            }
        }
    }
    Ok(())
}

/// GET /api/sections
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Section>>> {
    let sections = state.database.sections.list().await?;
    Ok(Json(sections))
}

/// POST /api/sections
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateSectionRequest>,
) -> Result<(StatusCode, Json<Section>)> {
    if request.section_name.trim().is_empty() {
        return Err(OpenAttendanceError::InvalidInput(
            "section_name is required".to_string(),
        ));
    }
    validate_allowed_days(request.allowed_days.as_deref())?;

    let section = state.database.sections.create(request).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

/// GET /api/sections/:section_id
pub async fn get(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
) -> Result<Json<Section>> {
    let section = state
        .database
        .sections
        .find_by_id(section_id)
        .await?
        .ok_or(OpenAttendanceError::SectionNotFound { section_id })?;
    Ok(Json(section))
}

/// PUT /api/sections/:section_id
pub async fn update(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
    Json(request): Json<UpdateSectionRequest>,
) -> Result<Json<Section>> {
    validate_allowed_days(request.allowed_days.as_deref())?;
    let section = state.database.sections.update(section_id, request).await?;
    Ok(Json(section))
}

/// DELETE /api/sections/:section_id
pub async fn delete(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
) -> Result<StatusCode> {
    state.database.sections.delete(section_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
