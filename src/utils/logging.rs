//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the OpenAttendance server.

use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
///
/// The returned guard must be held for the lifetime of the process so the
/// non-blocking file writer keeps flushing.
pub fn init_logging(config: &LoggingConfig) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "openattendance.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log attendance scans with structured data
pub fn log_scan(student_id: &str, staff_id: &str, direction: &str, location: Option<&str>) {
    info!(
        student_id = student_id,
        staff_id = staff_id,
        direction = direction,
        location = location,
        "Kiosk scan recorded"
    );
}

/// Log background sweep runs
pub fn log_sweep(sweep: &str, affected: u64) {
    if affected > 0 {
        info!(sweep = sweep, affected = affected, "Sweep completed");
    } else {
        debug!(sweep = sweep, "Sweep completed with no changes");
    }
}

/// Log admin actions
pub fn log_admin_action(staff_id: &str, action: &str, target: Option<&str>) {
    warn!(
        staff_id = staff_id,
        action = action,
        target = target,
        "Admin action performed"
    );
}

/// Log SMS delivery attempts
pub fn log_sms_attempt(recipient: &str, student_id: Option<&str>, success: bool, error: Option<&str>) {
    if success {
        info!(recipient = recipient, student_id = student_id, "SMS sent");
    } else {
        warn!(
            recipient = recipient,
            student_id = student_id,
            error = error,
            "SMS delivery failed"
        );
    }
}
