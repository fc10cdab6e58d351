//! SMS notification service implementation
//!
//! Delivers notifications through an HTTP SMS gateway configured in the
//! `sms_provider_settings` row. Every attempt, successful or not, is written
//! to `sms_logs`. USB modem providers are recognized in settings but this
//! build does not drive a modem; such sends are logged as failed.

use serde_json::json;
use tracing::{debug, info, warn};

use crate::database::repositories::SmsRepository;
use crate::models::sms::SmsProviderSettings;
use crate::models::student::Student;
use crate::utils::errors::{OpenAttendanceError, Result};

const DEFAULT_TEMPLATE: &str =
    "Hello {contact}, this is {school}. {student} was marked {status} at {time}.";

/// Values substituted into the message template
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub student_name: String,
    pub contact_name: String,
    pub school_name: String,
    pub status: String,
    pub time: String,
}

/// SMS delivery service
#[derive(Debug, Clone)]
pub struct SmsService {
    repository: SmsRepository,
    client: reqwest::Client,
}

impl SmsService {
    pub fn new(repository: SmsRepository) -> Self {
        Self {
            repository,
            client: reqwest::Client::new(),
        }
    }

    /// Render the configured template with `{placeholder}` substitution
    pub fn render_template(template: &str, context: &MessageContext) -> String {
        template
            .replace("{student}", &context.student_name)
            .replace("{contact}", &context.contact_name)
            .replace("{school}", &context.school_name)
            .replace("{status}", &context.status)
            .replace("{time}", &context.time)
    }

    /// Send a notification about a student to their emergency contact.
    ///
    /// Returns the delivery status string that was logged.
    pub async fn notify_contact(
        &self,
        student: &Student,
        context: &MessageContext,
        override_message: Option<&str>,
    ) -> Result<String> {
        let settings = self
            .repository
            .get_settings()
            .await?
            .ok_or_else(|| OpenAttendanceError::Sms("SMS provider not configured".to_string()))?;

        if !settings.sms_enabled {
            return Err(OpenAttendanceError::Sms("SMS sending is disabled".to_string()));
        }

        let recipient = student
            .emergency_contact_phone
            .as_deref()
            .ok_or_else(|| {
                OpenAttendanceError::InvalidInput(format!(
                    "student {} has no emergency contact phone",
                    student.student_id
                ))
            })?
            .to_string();

        let message = match override_message {
            Some(body) => body.to_string(),
            None => {
                let template = settings.message_template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
                Self::render_template(template, context)
            }
        };

        let outcome = self.deliver(&settings, &recipient, &message).await;
        let (status, error) = match &outcome {
            Ok(()) => ("sent", None),
            Err(e) => ("failed", Some(e.to_string())),
        };

        self.repository
            .record_log(
                &recipient,
                student.emergency_contact_name.as_deref(),
                Some(&student.student_id),
                &message,
                status,
                error.as_deref(),
            )
            .await?;

        crate::utils::logging::log_sms_attempt(
            &recipient,
            Some(&student.student_id),
            status == "sent",
            error.as_deref(),
        );

        outcome?;
        Ok(status.to_string())
    }

    /// Push the message through the configured provider
    async fn deliver(
        &self,
        settings: &SmsProviderSettings,
        recipient: &str,
        message: &str,
    ) -> Result<()> {
        match settings.provider_type.as_deref() {
            Some("api") => self.deliver_via_api(settings, recipient, message).await,
            Some("usb") => {
                warn!(provider = %settings.provider_name, "USB modem provider configured but not supported");
                Err(OpenAttendanceError::Sms(
                    "USB modem provider is not supported by this server".to_string(),
                ))
            }
            _ => Err(OpenAttendanceError::Sms("provider type is not set".to_string())),
        }
    }

    async fn deliver_via_api(
        &self,
        settings: &SmsProviderSettings,
        recipient: &str,
        message: &str,
    ) -> Result<()> {
        let api_url = settings
            .api_url
            .as_deref()
            .ok_or_else(|| OpenAttendanceError::Sms("API URL is not configured".to_string()))?;

        debug!(provider = %settings.provider_name, recipient = recipient, "Dispatching SMS via API");

        let mut request = self.client.post(api_url).json(&json!({
            "number": recipient,
            "message": message,
            "sender_name": settings.sender_name,
        }));

        if let Some(api_key) = settings.api_key.as_deref() {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenAttendanceError::Sms(format!(
                "gateway returned {status}: {body}"
            )));
        }

        info!(recipient = recipient, "SMS gateway accepted message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_context() -> MessageContext {
        MessageContext {
            student_name: "Ana Reyes".into(),
            contact_name: "Maria Reyes".into(),
            school_name: "Mabini High".into(),
            status: "absent".into(),
            time: "08:15".into(),
        }
    }

    fn sample_settings(api_url: Option<String>) -> SmsProviderSettings {
        SmsProviderSettings {
            id: 1,
            provider_type: Some("api".into()),
            provider_name: "test-gateway".into(),
            api_url,
            api_key: Some("secret-key".into()),
            sender_name: Some("MabiniHS".into()),
            tty_path: None,
            baud_rate: None,
            message_template: None,
            sms_enabled: true,
            updated_at: chrono::Utc::now(),
        }
    }

    fn test_service() -> SmsService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/openattendance_test")
            .expect("lazy pool");
        SmsService::new(SmsRepository::new(pool))
    }

    #[test]
    fn test_render_template() {
        let rendered = SmsService::render_template(DEFAULT_TEMPLATE, &sample_context());
        assert_eq!(
            rendered,
            "Hello Maria Reyes, this is Mabini High. Ana Reyes was marked absent at 08:15."
        );
    }

    #[test]
    fn test_render_template_ignores_unknown_placeholders() {
        let rendered = SmsService::render_template("{student} / {unknown}", &sample_context());
        assert_eq!(rendered, "Ana Reyes / {unknown}");
    }

    #[tokio::test]
    async fn test_deliver_via_api_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sms"))
            .and(header("Authorization", "Bearer secret-key"))
            .and(body_partial_json(json!({ "number": "+639171234567" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let service = test_service();
        let settings = sample_settings(Some(format!("{}/sms", server.uri())));
        let result = service
            .deliver(&settings, "+639171234567", "test message")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_deliver_via_api_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sms"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let service = test_service();
        let settings = sample_settings(Some(format!("{}/sms", server.uri())));
        let err = service
            .deliver(&settings, "+639171234567", "test message")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_usb_provider_rejected() {
        let service = test_service();
        let mut settings = sample_settings(None);
        settings.provider_type = Some("usb".into());
        let err = service
            .deliver(&settings, "+639171234567", "test message")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }
}
