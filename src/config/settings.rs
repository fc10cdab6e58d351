//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub sweeps: SweepConfig,
    pub clock: ClockConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: String,
    pub backup_dir: String,
    /// Upper bound for multipart uploads, in bytes
    pub max_upload_bytes: usize,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_seconds: u64,
    pub bcrypt_cost: u32,
}

/// Background sweep configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SweepConfig {
    pub absence_sweep_enabled: bool,
    pub absence_sweep_interval_seconds: u64,
    pub event_watchdog_enabled: bool,
    pub event_watchdog_interval_seconds: u64,
}

/// Clock synchronization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClockConfig {
    /// How long a fetched NTP offset stays valid
    pub offset_ttl_seconds: u64,
    pub ntp_timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("OPENATTENDANCE").separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::OpenAttendanceError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                upload_dir: "data/uploads".to_string(),
                backup_dir: "data/backups".to_string(),
                max_upload_bytes: 8 * 1024 * 1024,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/openattendance".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_ttl_seconds: 8 * 3600,
                bcrypt_cost: bcrypt::DEFAULT_COST,
            },
            sweeps: SweepConfig {
                absence_sweep_enabled: true,
                absence_sweep_interval_seconds: 300,
                event_watchdog_enabled: true,
                event_watchdog_interval_seconds: 60,
            },
            clock: ClockConfig {
                offset_ttl_seconds: 3600,
                ntp_timeout_seconds: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "data/logs".to_string(),
            },
        }
    }
}
