//! SMS provider settings, manual sends, and delivery log handlers

use axum::extract::{Query, State};
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::models::sms::{
    SendSmsRequest, SmsLog, SmsLogQuery, SmsProviderSettings, UpsertSmsSettingsRequest,
};
use crate::services::{MessageContext, StaffContext};
use crate::state::AppState;
use crate::utils::errors::{OpenAttendanceError, Result};
use crate::utils::logging::log_admin_action;

/// GET /api/sms/settings
pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SmsProviderSettings>> {
    let settings = state
        .database
        .sms
        .get_settings()
        .await?
        .ok_or_else(|| OpenAttendanceError::NotFound("SMS provider settings".to_string()))?;
    Ok(Json(settings))
}

/// PUT /api/sms/settings
pub async fn upsert_settings(
    State(state): State<AppState>,
    Extension(context): Extension<StaffContext>,
    Json(request): Json<UpsertSmsSettingsRequest>,
) -> Result<Json<SmsProviderSettings>> {
    context.ensure_admin()?;
    if !matches!(request.provider_type.as_str(), "api" | "usb") {
        return Err(OpenAttendanceError::InvalidInput(
            "provider_type must be 'api' or 'usb'".to_string(),
        ));
    }
    if request.provider_type == "api"
        && request.api_url.is_none()
        && state.database.sms.get_settings().await?.and_then(|s| s.api_url).is_none()
    {
        return Err(OpenAttendanceError::InvalidInput(
            "api_url is required for the api provider".to_string(),
        ));
    }

    let settings = state.database.sms.upsert_settings(request).await?;
    log_admin_action(&context.staff_id, "update_sms_settings", None);
    Ok(Json(settings))
}

/// POST /api/sms/send
///
/// Manual notification to a student's emergency contact.
pub async fn send(
    State(state): State<AppState>,
    Json(request): Json<SendSmsRequest>,
) -> Result<Json<Value>> {
    let student = state
        .database
        .students
        .find_by_student_id(&request.student_id)
        .await?
        .ok_or_else(|| OpenAttendanceError::StudentNotFound {
            student_id: request.student_id.clone(),
        })?;

    let school_name = state
        .database
        .school
        .get()
        .await?
        .map(|c| c.school_name)
        .unwrap_or_else(|| "the school".to_string());

    let context = MessageContext {
        student_name: student.full_name(),
        contact_name: student
            .emergency_contact_name
            .clone()
            .unwrap_or_else(|| "Guardian".to_string()),
        school_name,
        status: "notified".to_string(),
        time: state.effective_now().await?.format("%H:%M").to_string(),
    };

    let status = state
        .services
        .sms_service
        .notify_contact(&student, &context, request.message.as_deref())
        .await?;

    Ok(Json(json!({ "student_id": student.student_id, "status": status })))
}

/// GET /api/sms/logs
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<SmsLogQuery>,
) -> Result<Json<Vec<SmsLog>>> {
    let logs = state.database.sms.list_logs(&query).await?;
    Ok(Json(logs))
}
