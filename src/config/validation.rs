//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{OpenAttendanceError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_sweep_config(&settings.sweeps)?;
    validate_logging_config(&settings.logging)?;
    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(OpenAttendanceError::Config("Server host is required".to_string()));
    }

    if config.upload_dir.is_empty() || config.backup_dir.is_empty() {
        return Err(OpenAttendanceError::Config(
            "Upload and backup directories are required".to_string(),
        ));
    }

    if config.max_upload_bytes == 0 {
        return Err(OpenAttendanceError::Config(
            "Max upload size must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(OpenAttendanceError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(OpenAttendanceError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(OpenAttendanceError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate authentication configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < 16 {
        return Err(OpenAttendanceError::Config(
            "JWT secret must be at least 16 characters".to_string(),
        ));
    }

    if config.token_ttl_seconds == 0 {
        return Err(OpenAttendanceError::Config(
            "Token TTL must be greater than 0".to_string(),
        ));
    }

    // bcrypt rejects costs outside 4..=31
    if !(4..=31).contains(&config.bcrypt_cost) {
        return Err(OpenAttendanceError::Config(
            "bcrypt cost must be between 4 and 31".to_string(),
        ));
    }

    Ok(())
}

/// Validate sweep configuration
fn validate_sweep_config(config: &super::SweepConfig) -> Result<()> {
    if config.absence_sweep_enabled && config.absence_sweep_interval_seconds == 0 {
        return Err(OpenAttendanceError::Config(
            "Absence sweep interval must be greater than 0".to_string(),
        ));
    }

    if config.event_watchdog_enabled && config.event_watchdog_interval_seconds == 0 {
        return Err(OpenAttendanceError::Config(
            "Event watchdog interval must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(OpenAttendanceError::Config("Log level is required".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "super-secret-signing-key".to_string();
        settings
    }

    #[test]
    fn test_valid_settings_pass() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut settings = valid_settings();
        settings.auth.jwt_secret = "short".to_string();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_pool_bounds_checked() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        settings.database.max_connections = 5;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_zero_sweep_interval_rejected() {
        let mut settings = valid_settings();
        settings.sweeps.absence_sweep_interval_seconds = 0;
        assert!(validate_settings(&settings).is_err());
    }
}
