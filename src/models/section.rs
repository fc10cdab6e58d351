//! Section (class) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Section {
    pub section_id: i64,
    pub section_name: String,
    pub adviser_staff_id: Option<String>,
    pub room_number: Option<String>,
    pub grade_level: Option<i32>,
    pub strand: Option<String>,
    pub schedule_data: Option<serde_json::Value>,
    /// Comma-separated weekday names students of this section attend
    pub allowed_days: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Section {
    /// Parsed allowed weekdays, empty when the column is unset
    pub fn allowed_weekdays(&self) -> Vec<chrono::Weekday> {
        self.allowed_days
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter_map(crate::utils::helpers::parse_weekday)
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSectionRequest {
    pub section_name: String,
    pub adviser_staff_id: Option<String>,
    pub room_number: Option<String>,
    pub grade_level: Option<i32>,
    pub strand: Option<String>,
    pub schedule_data: Option<serde_json::Value>,
    pub allowed_days: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSectionRequest {
    pub section_name: Option<String>,
    pub adviser_staff_id: Option<String>,
    pub room_number: Option<String>,
    pub grade_level: Option<i32>,
    pub strand: Option<String>,
    pub schedule_data: Option<serde_json::Value>,
    pub allowed_days: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_allowed_weekdays_parsing() {
        let section = Section {
            section_id: 1,
            section_name: "Agimat".into(),
            adviser_staff_id: None,
            room_number: None,
            grade_level: Some(10),
            strand: None,
            schedule_data: None,
            allowed_days: Some("Monday, Wednesday, friday".into()),
            created_at: Utc::now(),
        };
        assert_eq!(
            section.allowed_weekdays(),
            vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]
        );
    }

    #[test]
    fn test_allowed_weekdays_unset() {
        let section = Section {
            section_id: 1,
            section_name: "Agimat".into(),
            adviser_staff_id: None,
            room_number: None,
            grade_level: None,
            strand: None,
            schedule_data: None,
            allowed_days: None,
            created_at: Utc::now(),
        };
        assert!(section.allowed_weekdays().is_empty());
    }
}
