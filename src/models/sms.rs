//! SMS provider settings and delivery log models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SmsProviderSettings {
    pub id: i32,
    pub provider_type: Option<String>,
    pub provider_name: String,
    pub api_url: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub sender_name: Option<String>,
    pub tty_path: Option<String>,
    pub baud_rate: Option<i32>,
    pub message_template: Option<String>,
    pub sms_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SmsLog {
    pub sms_id: i64,
    pub recipient_number: String,
    pub recipient_name: Option<String>,
    pub related_student_id: Option<String>,
    pub message_body: String,
    pub status: String,
    pub sent_at: DateTime<Utc>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertSmsSettingsRequest {
    pub provider_type: String,
    pub provider_name: String,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub sender_name: Option<String>,
    pub tty_path: Option<String>,
    pub baud_rate: Option<i32>,
    pub message_template: Option<String>,
    pub sms_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendSmsRequest {
    pub student_id: String,
    /// Overrides the configured template when present
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmsLogQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
