//! Error handling for OpenAttendance
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. Every handler returns
//! `OpenAttendanceError`, which maps to a JSON body plus HTTP status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for the OpenAttendance application
#[derive(Error, Debug)]
pub enum OpenAttendanceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Student not found: {student_id}")]
    StudentNotFound { student_id: String },

    #[error("Staff not found: {staff_id}")]
    StaffNotFound { staff_id: String },

    #[error("Section not found: {section_id}")]
    SectionNotFound { section_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid event status transition: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Maintenance mode is active")]
    MaintenanceMode,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Backup failed: {0}")]
    Backup(String),

    #[error("SMS delivery failed: {0}")]
    Sms(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for OpenAttendance operations
pub type Result<T> = std::result::Result<T, OpenAttendanceError>;

impl OpenAttendanceError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            OpenAttendanceError::InvalidInput(_)
            | OpenAttendanceError::Multipart(_)
            | OpenAttendanceError::Csv(_)
            | OpenAttendanceError::InvalidStatusTransition { .. } => StatusCode::BAD_REQUEST,
            OpenAttendanceError::Authentication(_) | OpenAttendanceError::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            OpenAttendanceError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            OpenAttendanceError::StudentNotFound { .. }
            | OpenAttendanceError::StaffNotFound { .. }
            | OpenAttendanceError::SectionNotFound { .. }
            | OpenAttendanceError::EventNotFound { .. }
            | OpenAttendanceError::NotFound(_) => StatusCode::NOT_FOUND,
            OpenAttendanceError::Conflict(_) => StatusCode::CONFLICT,
            OpenAttendanceError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            OpenAttendanceError::MaintenanceMode
            | OpenAttendanceError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            // Unique/check violations surface as 409 instead of a bare 500
            OpenAttendanceError::Database(sqlx::Error::Database(e))
                if e.is_unique_violation() || e.is_check_violation() =>
            {
                StatusCode::CONFLICT
            }
            OpenAttendanceError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the error comes from bad client input rather than a fault
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for OpenAttendanceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            OpenAttendanceError::InvalidInput("missing field".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OpenAttendanceError::StudentNotFound { student_id: "S-1".into() }.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            OpenAttendanceError::Conflict("duplicate scan".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            OpenAttendanceError::Authentication("bad token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            OpenAttendanceError::MaintenanceMode.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err = OpenAttendanceError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_client_error_detection() {
        assert!(OpenAttendanceError::InvalidInput("x".into()).is_client_error());
        assert!(!OpenAttendanceError::Backup("pg_dump exited".into()).is_client_error());
    }
}
