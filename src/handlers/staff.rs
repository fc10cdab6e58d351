//! Staff management handlers

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::staff::{CreateStaffRequest, Staff, UpdateStaffRequest, STAFF_TYPES};
use crate::services::{StaffContext, UploadKind};
use crate::state::AppState;
use crate::utils::errors::{OpenAttendanceError, Result};
use crate::utils::helpers;
use crate::utils::logging::log_admin_action;

#[derive(Debug, Deserialize)]
pub struct StaffListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn validate_staff_type(staff_type: &str) -> Result<()> {
    if !STAFF_TYPES.contains(&staff_type) {
        return Err(OpenAttendanceError::InvalidInput(format!(
            "staff_type must be one of {STAFF_TYPES:?}"
        )));
    }
    Ok(())
}

/// GET /api/staff
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<StaffListQuery>,
) -> Result<Json<Vec<Staff>>> {
    let staff = state
        .database
        .staff
        .list(query.limit.unwrap_or(100), query.offset.unwrap_or(0))
        .await?;
    Ok(Json(staff))
}

/// POST /api/staff
///
/// Creates a staff account, optionally with login credentials. When a login
/// is attached the one-time recovery code is returned alongside the account.
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Json(mut request): Json<CreateStaffRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    validate_staff_type(&request.staff_type)?;
    if let Some(email) = request.email_address.as_deref() {
        if !helpers::is_valid_email(email) {
            return Err(OpenAttendanceError::InvalidInput(
                "email_address is not a valid address".to_string(),
            ));
        }
    }

    let login_request = request.login.take();
    let (credentials, recovery_code) = match &login_request {
        Some(login) => {
            let (creds, code) = state.services.auth_service.prepare_credentials(login)?;
            (Some(creds), Some(code))
        }
        None => (None, None),
    };

    let staff = state.database.staff.create(request, credentials).await?;
    log_admin_action(&context.staff_id, "create_staff", Some(&staff.staff_id));

    Ok((
        StatusCode::CREATED,
        Json(json!({ "staff": staff, "recovery_code": recovery_code })),
    ))
}

/// GET /api/staff/:staff_id
pub async fn get(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
) -> Result<Json<Staff>> {
    let staff = state
        .database
        .staff
        .find_by_staff_id(&staff_id)
        .await?
        .ok_or(OpenAttendanceError::StaffNotFound { staff_id })?;
    Ok(Json(staff))
}

/// PUT /api/staff/:staff_id
pub async fn update(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    Json(request): Json<UpdateStaffRequest>,
) -> Result<Json<Staff>> {
    if let Some(staff_type) = request.staff_type.as_deref() {
        validate_staff_type(staff_type)?;
    }
    let staff = state.database.staff.update(&staff_id, request).await?;
    Ok(Json(staff))
}

/// DELETE /api/staff/:staff_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Path(staff_id): Path<String>,
) -> Result<StatusCode> {
    if context.staff_id == staff_id {
        return Err(OpenAttendanceError::InvalidInput(
            "cannot delete your own account".to_string(),
        ));
    }
    state.database.staff.delete(&staff_id).await?;
    log_admin_action(&context.staff_id, "delete_staff", Some(&staff_id));
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/staff/:staff_id/profile-image
pub async fn upload_profile_image(
    State(state): State<AppState>,
    Path(staff_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Staff>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("profile.png").to_string();
        let bytes = field.bytes().await?;
        let stored = state
            .services
            .storage_service
            .store(UploadKind::StaffImage, &file_name, &bytes)
            .await?;

        state.database.staff.set_profile_image(&staff_id, &stored).await?;
        let staff = state
            .database
            .staff
            .find_by_staff_id(&staff_id)
            .await?
            .ok_or(OpenAttendanceError::StaffNotFound { staff_id })?;
        return Ok(Json(staff));
    }

    Err(OpenAttendanceError::InvalidInput(
        "multipart field 'file' is required".to_string(),
    ))
}
