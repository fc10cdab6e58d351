//! Event status watchdog
//!
//! Moves events through their lifecycle on a timer: planned events whose
//! start time has passed become ongoing, and ongoing events whose end time
//! has passed become completed. Cancelled events are never touched.

use tracing::{error, info};

use crate::state::AppState;
use crate::utils::errors::Result;
use crate::utils::logging::log_sweep;

/// Run the watchdog on its configured interval until shutdown
pub async fn run(state: AppState) {
    let interval_seconds = state.settings.sweeps.event_watchdog_interval_seconds;
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_seconds));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!(interval_seconds = interval_seconds, "Event watchdog started");
    loop {
        ticker.tick().await;
        match tick_once(&state).await {
            Ok(advanced) => log_sweep("event_watchdog", advanced),
            Err(e) => error!(error = %e, "Event watchdog failed"),
        }
    }
}

/// One watchdog pass. Returns how many events changed status.
pub async fn tick_once(state: &AppState) -> Result<u64> {
    let now = state.effective_now().await?;
    let started = state.database.events.advance_started(now).await?;
    let ended = state.database.events.advance_ended(now).await?;
    Ok(started + ended)
}
