//! School configuration handlers (singleton row)

use axum::extract::{Multipart, State};
use axum::{Extension, Json};

use crate::models::school::{SchoolConfig, UpsertSchoolConfigRequest, SCHOOL_TYPES, TIME_SOURCES};
use crate::services::{StaffContext, UploadKind};
use crate::state::AppState;
use crate::utils::errors::{OpenAttendanceError, Result};
use crate::utils::logging::log_admin_action;

/// GET /api/school
pub async fn get(State(state): State<AppState>) -> Result<Json<SchoolConfig>> {
    let config = state
        .database
        .school
        .get()
        .await?
        .ok_or_else(|| OpenAttendanceError::NotFound("school configuration".to_string()))?;
    Ok(Json(config))
}

/// PUT /api/school
pub async fn upsert(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Json(request): Json<UpsertSchoolConfigRequest>,
) -> Result<Json<SchoolConfig>> {
    context.ensure_admin()?;
    if request.school_name.trim().is_empty() {
        return Err(OpenAttendanceError::InvalidInput(
            "school_name is required".to_string(),
        ));
    }
    if let Some(school_type) = request.school_type.as_deref() {
        if !SCHOOL_TYPES.contains(&school_type) {
            return Err(OpenAttendanceError::InvalidInput(format!(
                "school_type must be one of {SCHOOL_TYPES:?}"
            )));
        }
    }
    if let Some(time_source) = request.time_source.as_deref() {
        if !TIME_SOURCES.contains(&time_source) {
            return Err(OpenAttendanceError::InvalidInput(format!(
                "time_source must be one of {TIME_SOURCES:?}"
            )));
        }
    }

    let time_source_changed = request.time_source.is_some() || request.ntp_server.is_some();
    let config = state.database.school.upsert(request).await?;

    // a new NTP server or source makes the cached offset stale
    if time_source_changed {
        state.services.clock_service.invalidate().await;
    }

    log_admin_action(&context.staff_id, "update_school_config", None);
    Ok(Json(config))
}

/// POST /api/school/logo
pub async fn upload_logo(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    mut multipart: Multipart,
) -> Result<Json<SchoolConfig>> {
    context.ensure_admin()?;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("logo.png").to_string();
        let bytes = field.bytes().await?;
        let stored = state
            .services
            .storage_service
            .store(UploadKind::SchoolLogo, &file_name, &bytes)
            .await?;

        state.database.school.set_logo_path(&stored).await?;
        let config = state
            .database
            .school
            .get()
            .await?
            .ok_or_else(|| OpenAttendanceError::NotFound("school configuration".to_string()))?;
        log_admin_action(&context.staff_id, "update_school_logo", None);
        return Ok(Json(config));
    }

    Err(OpenAttendanceError::InvalidInput(
        "multipart field 'file' is required".to_string(),
    ))
}
