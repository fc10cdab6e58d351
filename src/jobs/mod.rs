//! Background jobs module
//!
//! Long-running tasks spawned at startup: the automatic absence sweep and
//! the event status watchdog.

pub mod absence_sweep;
pub mod event_watchdog;

use tracing::info;

use crate::state::AppState;

/// Spawn every enabled background job
pub fn spawn_all(state: &AppState) {
    if state.settings.sweeps.absence_sweep_enabled {
        tokio::spawn(absence_sweep::run(state.clone()));
    } else {
        info!("Absence sweep disabled by configuration");
    }

    if state.settings.sweeps.event_watchdog_enabled {
        tokio::spawn(event_watchdog::run(state.clone()));
    } else {
        info!("Event watchdog disabled by configuration");
    }
}
