//! Event models: events, staff assignments, attendance, notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub event_id: i64,
    pub event_name: String,
    pub event_description: Option<String>,
    pub event_type: Option<String>,
    pub location: Option<String>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub status: String,
    pub created_by_staff_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventStaff {
    pub id: i64,
    pub event_id: i64,
    pub staff_id: String,
    pub role: String,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventAttendance {
    pub id: i64,
    pub event_id: i64,
    pub student_id: String,
    pub time_in: DateTime<Utc>,
    pub time_out: Option<DateTime<Utc>>,
    pub time_in_client: Option<String>,
    pub time_out_client: Option<String>,
    pub location: Option<String>,
    pub checked_in_by_staff_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventNote {
    pub note_id: i64,
    pub event_id: i64,
    pub staff_id: Option<String>,
    pub note_content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub event_name: String,
    pub event_description: Option<String>,
    pub event_type: Option<String>,
    pub location: Option<String>,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub event_name: Option<String>,
    pub event_description: Option<String>,
    pub event_type: Option<String>,
    pub location: Option<String>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignEventStaffRequest {
    pub staff_id: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventScanRequest {
    pub qr_code_token: String,
    pub location: Option<String>,
    pub client_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventNoteRequest {
    pub note_content: String,
}

/// Event lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Planned,
    Ongoing,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Planned => "planned",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "planned" => Some(EventStatus::Planned),
            "ongoing" => Some(EventStatus::Ongoing),
            "completed" => Some(EventStatus::Completed),
            "cancelled" => Some(EventStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether a manual transition to `next` is allowed.
    ///
    /// Events only move forward: planned -> ongoing -> completed, with
    /// cancellation possible until the event has completed.
    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        matches!(
            (self, next),
            (EventStatus::Planned, EventStatus::Ongoing)
                | (EventStatus::Ongoing, EventStatus::Completed)
                | (EventStatus::Planned, EventStatus::Cancelled)
                | (EventStatus::Ongoing, EventStatus::Cancelled)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert!(EventStatus::Planned.can_transition_to(EventStatus::Ongoing));
        assert!(EventStatus::Ongoing.can_transition_to(EventStatus::Completed));
        assert!(EventStatus::Planned.can_transition_to(EventStatus::Cancelled));
        assert!(EventStatus::Ongoing.can_transition_to(EventStatus::Cancelled));

        assert!(!EventStatus::Planned.can_transition_to(EventStatus::Completed));
        assert!(!EventStatus::Completed.can_transition_to(EventStatus::Ongoing));
        assert!(!EventStatus::Cancelled.can_transition_to(EventStatus::Ongoing));
        assert!(!EventStatus::Completed.can_transition_to(EventStatus::Cancelled));
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in ["planned", "ongoing", "completed", "cancelled"] {
            assert_eq!(EventStatus::parse(status).unwrap().as_str(), status);
        }
        assert!(EventStatus::parse("archived").is_none());
    }
}
