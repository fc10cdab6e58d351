//! Authentication handlers: first-run registration, login, password changes

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::staff::{CreateLoginRequest, CreateStaffRequest};
use crate::services::StaffContext;
use crate::state::AppState;
use crate::utils::errors::{OpenAttendanceError, Result};
use crate::utils::logging::log_admin_action;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub staff_id: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct RecoverPasswordRequest {
    pub username: String,
    pub security_answer: Option<String>,
    pub recovery_code: Option<String>,
    pub new_password: String,
}

/// GET /api/auth/registration-status
pub async fn registration_status(State(state): State<AppState>) -> Result<Json<Value>> {
    let open = state.services.auth_service.registration_open().await?;
    Ok(Json(json!({ "registration_open": open })))
}

/// POST /api/auth/register
///
/// Creates the initial admin account. Closed as soon as any admin login
/// exists.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    if !state.services.auth_service.registration_open().await? {
        return Err(OpenAttendanceError::PermissionDenied(
            "registration is closed".to_string(),
        ));
    }

    let login_request = CreateLoginRequest {
        username: request.username,
        password: request.password,
        security_question: request.security_question,
        security_answer: request.security_answer,
    };
    let (credentials, recovery_code) = state
        .services
        .auth_service
        .prepare_credentials(&login_request)?;

    let staff_request = CreateStaffRequest {
        staff_id: request.staff_id,
        name: request.name,
        staff_type: "admin".to_string(),
        phone_number: None,
        email_address: None,
        teacher_type: None,
        adviser_unit: None,
        login: None,
    };
    let staff = state
        .database
        .staff
        .create(staff_request, Some(credentials))
        .await?;

    log_admin_action(&staff.staff_id, "register_admin", None);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "staff": staff, "recovery_code": recovery_code })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let (token, staff) = state
        .services
        .auth_service
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(json!({ "token": token, "staff": staff })))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode> {
    state
        .services
        .auth_service
        .change_password(&context.staff_id, &request.current_password, &request.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/recover
pub async fn recover_password(
    State(state): State<AppState>,
    Json(request): Json<RecoverPasswordRequest>,
) -> Result<StatusCode> {
    state
        .services
        .auth_service
        .recover_password(
            &request.username,
            request.security_answer.as_deref(),
            request.recovery_code.as_deref(),
            &request.new_password,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
