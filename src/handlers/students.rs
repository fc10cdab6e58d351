//! Student management handlers: CRUD, QR badges, profile images, exports

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};

use crate::models::student::{CreateStudentRequest, Student, StudentListQuery, UpdateStudentRequest};
use crate::services::{StaffContext, UploadKind};
use crate::state::AppState;
use crate::utils::errors::{OpenAttendanceError, Result};
use crate::utils::helpers;
use crate::utils::logging::log_admin_action;

/// GET /api/students
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> Result<Json<Vec<Student>>> {
    let students = state.database.students.list(&query).await?;
    Ok(Json(students))
}

/// POST /api/students
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>)> {
    if request.student_id.trim().is_empty() || request.first_name.trim().is_empty() {
        return Err(OpenAttendanceError::InvalidInput(
            "student_id and first_name are required".to_string(),
        ));
    }
    if let Some(phone) = request.emergency_contact_phone.as_deref() {
        if !helpers::is_valid_phone(phone) {
            return Err(OpenAttendanceError::InvalidInput(
                "emergency contact phone is not a valid number".to_string(),
            ));
        }
    }

    let token = helpers::generate_qr_token();
    let student = state.database.students.create(request, &token).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// GET /api/students/:student_id
pub async fn get(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<Student>> {
    let student = state
        .database
        .students
        .find_by_student_id(&student_id)
        .await?
        .ok_or(OpenAttendanceError::StudentNotFound { student_id })?;
    Ok(Json(student))
}

/// PUT /api/students/:student_id
pub async fn update(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(request): Json<UpdateStudentRequest>,
) -> Result<Json<Student>> {
    let student = state.database.students.update(&student_id, request).await?;
    Ok(Json(student))
}

/// DELETE /api/students/:student_id
pub async fn delete(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Path(student_id): Path<String>,
) -> Result<StatusCode> {
    state.database.students.delete(&student_id).await?;
    log_admin_action(&context.staff_id, "delete_student", Some(&student_id));
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/students/:student_id/qr/regenerate
///
/// Issues a fresh token, invalidating any printed badge.
pub async fn regenerate_qr(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Path(student_id): Path<String>,
) -> Result<Json<Student>> {
    let token = helpers::generate_qr_token();
    let student = state.database.students.set_qr_token(&student_id, &token).await?;
    log_admin_action(&context.staff_id, "regenerate_qr", Some(&student_id));
    Ok(Json(student))
}

/// GET /api/students/:student_id/qr.svg
pub async fn qr_badge(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse> {
    let student = state
        .database
        .students
        .find_by_student_id(&student_id)
        .await?
        .ok_or(OpenAttendanceError::StudentNotFound { student_id })?;

    let token = student
        .qr_code_token
        .as_deref()
        .ok_or_else(|| OpenAttendanceError::NotFound("QR token".to_string()))?;
    let svg = state.services.export_service.qr_svg(token)?;

    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

/// GET /api/students/export/roster.csv
pub async fn export_roster(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> Result<impl IntoResponse> {
    let students = state.database.students.list(&query).await?;
    let csv = state.services.export_service.roster_csv(&students)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"roster.csv\"".to_string(),
            ),
        ],
        csv,
    ))
}

/// Badges are only printed for active students unless the caller asks
/// for a different status explicitly
fn bundle_query(mut query: StudentListQuery) -> StudentListQuery {
    if query.status.is_none() {
        query.status = Some("Active".to_string());
    }
    query
}

/// GET /api/students/export/qr-bundle.zip
pub async fn export_qr_bundle(
    State(state): State<AppState>,
    Query(query): Query<StudentListQuery>,
) -> Result<impl IntoResponse> {
    let students = state.database.students.list(&bundle_query(query)).await?;
    let archive = state.services.export_service.qr_bundle_zip(&students)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"qr-badges.zip\"".to_string(),
            ),
        ],
        archive,
    ))
}

/// POST /api/students/:student_id/profile-image
pub async fn upload_profile_image(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<Student>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("profile.png").to_string();
        let bytes = field.bytes().await?;
        let stored = state
            .services
            .storage_service
            .store(UploadKind::StudentImage, &file_name, &bytes)
            .await?;

        state.database.students.set_profile_image(&student_id, &stored).await?;
        let student = state
            .database
            .students
            .find_by_student_id(&student_id)
            .await?
            .ok_or(OpenAttendanceError::StudentNotFound { student_id })?;
        return Ok(Json(student));
    }

    Err(OpenAttendanceError::InvalidInput(
        "multipart field 'file' is required".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_defaults_to_active_students() {
        let query = bundle_query(StudentListQuery::default());
        assert_eq!(query.status.as_deref(), Some("Active"));

        let explicit = bundle_query(StudentListQuery {
            status: Some("Inactive".to_string()),
            ..Default::default()
        });
        assert_eq!(explicit.status.as_deref(), Some("Inactive"));
    }
}
