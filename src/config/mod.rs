//! Configuration management module

pub mod settings;
pub mod validation;

pub use settings::{
    AuthConfig, ClockConfig, DatabaseConfig, LoggingConfig, ServerConfig, Settings, SweepConfig,
};
