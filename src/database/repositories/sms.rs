//! SMS settings and delivery log repository

use sqlx::PgPool;

use crate::models::sms::{SmsLog, SmsLogQuery, SmsProviderSettings, UpsertSmsSettingsRequest};
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct SmsRepository {
    pool: PgPool,
}

impl SmsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_settings(&self) -> Result<Option<SmsProviderSettings>> {
        let settings = sqlx::query_as::<_, SmsProviderSettings>(
            "SELECT * FROM sms_provider_settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    pub async fn upsert_settings(
        &self,
        request: UpsertSmsSettingsRequest,
    ) -> Result<SmsProviderSettings> {
        let settings = sqlx::query_as::<_, SmsProviderSettings>(
            r#"
            INSERT INTO sms_provider_settings
                (id, provider_type, provider_name, api_url, api_key, sender_name, tty_path, baud_rate, message_template, sms_enabled)
            VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, FALSE))
            ON CONFLICT (id) DO UPDATE SET
                provider_type = EXCLUDED.provider_type,
                provider_name = EXCLUDED.provider_name,
                api_url = COALESCE($3, sms_provider_settings.api_url),
                api_key = COALESCE($4, sms_provider_settings.api_key),
                sender_name = COALESCE($5, sms_provider_settings.sender_name),
                tty_path = COALESCE($6, sms_provider_settings.tty_path),
                baud_rate = COALESCE($7, sms_provider_settings.baud_rate),
                message_template = COALESCE($8, sms_provider_settings.message_template),
                sms_enabled = COALESCE($9, sms_provider_settings.sms_enabled),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(request.provider_type)
        .bind(request.provider_name)
        .bind(request.api_url)
        .bind(request.api_key)
        .bind(request.sender_name)
        .bind(request.tty_path)
        .bind(request.baud_rate)
        .bind(request.message_template)
        .bind(request.sms_enabled)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    pub async fn record_log(
        &self,
        recipient_number: &str,
        recipient_name: Option<&str>,
        related_student_id: Option<&str>,
        message_body: &str,
        status: &str,
        error_message: Option<&str>,
    ) -> Result<SmsLog> {
        let log = sqlx::query_as::<_, SmsLog>(
            r#"
            INSERT INTO sms_logs (recipient_number, recipient_name, related_student_id, message_body, status, error_message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(recipient_number)
        .bind(recipient_name)
        .bind(related_student_id)
        .bind(message_body)
        .bind(status)
        .bind(error_message)
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }

    pub async fn list_logs(&self, query: &SmsLogQuery) -> Result<Vec<SmsLog>> {
        let logs = sqlx::query_as::<_, SmsLog>(
            "SELECT * FROM sms_logs ORDER BY sent_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(query.limit.unwrap_or(100).clamp(1, 1000))
        .bind(query.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
