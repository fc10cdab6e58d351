//! Database backup and restore handlers (admin only)

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::services::{BackupEntry, StaffContext, UploadKind};
use crate::state::AppState;
use crate::utils::errors::{OpenAttendanceError, Result};
use crate::utils::logging::log_admin_action;

/// GET /api/backups
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<BackupEntry>>> {
    let backups = state.services.backup_service.list_backups().await?;
    Ok(Json(backups))
}

/// POST /api/backups
pub async fn create(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
) -> Result<(StatusCode, Json<Value>)> {
    let path = state.services.backup_service.create_backup().await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    log_admin_action(&context.staff_id, "create_backup", Some(&file_name));
    Ok((StatusCode::CREATED, Json(json!({ "file_name": file_name }))))
}

/// GET /api/backups/:file_name
pub async fn download(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse> {
    let path = state.services.backup_service.resolve_backup(&file_name)?;
    if !path.exists() {
        return Err(OpenAttendanceError::NotFound(format!("backup {file_name}")));
    }
    let bytes = tokio::fs::read(&path).await?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    ))
}

/// DELETE /api/backups/:file_name
pub async fn delete(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Path(file_name): Path<String>,
) -> Result<StatusCode> {
    state.services.backup_service.delete_backup(&file_name).await?;
    log_admin_action(&context.staff_id, "delete_backup", Some(&file_name));
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/backups/restore
///
/// Accepts an uploaded custom-format dump and restores the database from it.
pub async fn restore(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("restore.dump").to_string();
        let bytes = field.bytes().await?;
        let stored = state
            .services
            .storage_service
            .store(UploadKind::RestoreDump, &file_name, &bytes)
            .await?;

        let dump_path = state.services.storage_service.resolve(&stored)?;
        state.services.backup_service.restore_staged(&dump_path).await?;

        log_admin_action(&context.staff_id, "restore_backup", Some(&file_name));
        return Ok(Json(json!({ "restored_from": file_name })));
    }

    Err(OpenAttendanceError::InvalidInput(
        "multipart field 'file' is required".to_string(),
    ))
}
