//! Automatic absence sweep
//!
//! Periodically marks active students absent once the school day's checkout
//! target has passed and they have no attendance record for the day. The
//! sweep is idempotent: students with a present, absent, or approved excused
//! row are never touched, and holidays and non-school weekdays are skipped.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use tracing::{error, info, warn};

use crate::services::MessageContext;
use crate::state::AppState;
use crate::utils::errors::Result;
use crate::utils::helpers::parse_weekday;
use crate::utils::logging::log_sweep;

const SWEEP_REASON: &str = "No check-in recorded";

/// Whether the sweep is due to run for the given wall-clock time
pub fn sweep_due(now: NaiveTime, checkout_target: NaiveTime) -> bool {
    now >= checkout_target
}

/// Whether `date` is a school day for a student.
///
/// A section's `allowed_days` list wins when set; otherwise the default
/// Monday..Friday week applies.
pub fn is_school_day(date: NaiveDate, allowed_days: Option<&str>) -> bool {
    let weekday = date.weekday();
    match allowed_days {
        Some(list) if !list.trim().is_empty() => {
            list.split(',').filter_map(parse_weekday).any(|d| d == weekday)
        }
        _ => !matches!(weekday, Weekday::Sat | Weekday::Sun),
    }
}

/// Run the absence sweep on its configured interval until shutdown
pub async fn run(state: AppState) {
    let interval_seconds = state.settings.sweeps.absence_sweep_interval_seconds;
    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(interval_seconds));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!(interval_seconds = interval_seconds, "Absence sweep started");
    loop {
        ticker.tick().await;
        match sweep_once(&state).await {
            Ok(marked) => log_sweep("absence", marked),
            Err(e) => error!(error = %e, "Absence sweep failed"),
        }
    }
}

/// One sweep pass. Returns how many students were marked absent.
pub async fn sweep_once(state: &AppState) -> Result<u64> {
    let Some(config) = state.database.school.get().await? else {
        // nothing to do before first-run setup
        return Ok(0);
    };

    let now = state
        .services
        .clock_service
        .now(&config.time_source, &config.ntp_server, config.time_zone_offset)
        .await;
    let today = now.date_naive();

    if !sweep_due(now.time(), config.time_out_target) {
        return Ok(0);
    }
    if state.database.calendar.is_holiday(today).await? {
        return Ok(0);
    }

    let mut marked = 0u64;
    for (student, allowed_days) in state.database.students.list_active_with_allowed_days().await? {
        // a fixed weekday schedule overrides per-section day lists
        let allowed = if config.fixed_weekday_schedule {
            None
        } else {
            allowed_days.as_deref()
        };
        if !is_school_day(today, allowed) {
            continue;
        }

        let inserted = state
            .database
            .attendance
            .mark_absent_if_unrecorded(&student.student_id, None, Some(SWEEP_REASON), today, now)
            .await?;
        if !inserted {
            continue;
        }
        marked += 1;

        if student.emergency_contact_phone.is_some() {
            let context = MessageContext {
                student_name: student.full_name(),
                contact_name: student
                    .emergency_contact_name
                    .clone()
                    .unwrap_or_else(|| "Guardian".to_string()),
                school_name: config.school_name.clone(),
                status: "absent".to_string(),
                time: now.format("%H:%M").to_string(),
            };
            if let Err(e) = state
                .services
                .sms_service
                .notify_contact(&student, &context, None)
                .await
            {
                warn!(student_id = %student.student_id, error = %e, "Absence notification not sent");
            }
        }
    }

    Ok(marked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sweep_due_after_checkout_target() {
        let target = NaiveTime::from_hms_opt(16, 0, 0).unwrap();
        assert!(!sweep_due(NaiveTime::from_hms_opt(15, 59, 0).unwrap(), target));
        assert!(sweep_due(target, target));
        assert!(sweep_due(NaiveTime::from_hms_opt(18, 0, 0).unwrap(), target));
    }

    #[test]
    fn test_default_week_skips_weekends() {
        // 2026-08-28 is a Friday, 2026-08-29 a Saturday
        assert!(is_school_day(date(2026, 8, 28), None));
        assert!(!is_school_day(date(2026, 8, 29), None));
        assert!(!is_school_day(date(2026, 8, 30), None));
    }

    #[test]
    fn test_allowed_days_override_default_week() {
        assert!(is_school_day(date(2026, 8, 29), Some("Saturday")));
        assert!(!is_school_day(date(2026, 8, 28), Some("Saturday")));
    }

    #[test]
    fn test_blank_allowed_days_falls_back() {
        assert!(is_school_day(date(2026, 8, 28), Some("  ")));
    }
}
