//! Application state module
//!
//! Shared state handed to the HTTP router and background jobs.

use chrono::{DateTime, Utc};

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::middleware::RateLimitMiddleware;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Shared application state.
///
/// Everything inside is cheap to clone: repositories hold pool handles and
/// services hold `Arc`s, so the state itself is cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub database: DatabaseService,
    pub services: ServiceFactory,
    pub scan_rate_limiter: RateLimitMiddleware,
}

impl AppState {
    pub fn new(settings: Settings, database: DatabaseService) -> Self {
        let services = ServiceFactory::new(
            settings.clone(),
            database.staff.clone(),
            database.sms.clone(),
        );
        let scan_rate_limiter = RateLimitMiddleware::default();

        Self {
            settings,
            database,
            services,
            scan_rate_limiter,
        }
    }

    /// Resolve the effective wall-clock time from the school configuration.
    ///
    /// Every timestamp the system writes goes through here so kiosk scans,
    /// event scans, and the background sweeps agree on the time.
    pub async fn effective_now(&self) -> Result<DateTime<Utc>> {
        let now = match self.database.school.get().await? {
            Some(config) => {
                self.services
                    .clock_service
                    .now(&config.time_source, &config.ntp_server, config.time_zone_offset)
                    .await
            }
            None => Utc::now(),
        };
        Ok(now)
    }
}
