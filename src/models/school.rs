//! School configuration model (single-row table)

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SchoolConfig {
    pub config_id: i32,
    pub school_name: String,
    pub school_type: Option<String>,
    pub school_id: Option<String>,
    pub address: Option<String>,
    pub logo_path: Option<String>,
    pub organization_hotline: Option<String>,
    pub country_code: String,
    pub principal_name: Option<String>,
    pub principal_title: Option<String>,
    pub school_year: Option<String>,
    pub fixed_weekday_schedule: bool,
    pub strict_attendance_window: bool,
    pub maintenance_mode: bool,
    pub time_source: String,
    pub fallback_source: String,
    pub ntp_server: String,
    pub time_zone_offset: i32,
    pub auto_time_zone: bool,
    pub enable_utc_correction: bool,
    pub time_in_start: NaiveTime,
    pub time_late_threshold: NaiveTime,
    pub time_out_target: NaiveTime,
    pub feature_event_based: bool,
    pub feature_id_generation: bool,
    pub feature_sf2_generation: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertSchoolConfigRequest {
    pub school_name: String,
    pub school_type: Option<String>,
    pub school_id: Option<String>,
    pub address: Option<String>,
    pub organization_hotline: Option<String>,
    pub country_code: Option<String>,
    pub principal_name: Option<String>,
    pub principal_title: Option<String>,
    pub school_year: Option<String>,
    pub fixed_weekday_schedule: Option<bool>,
    pub strict_attendance_window: Option<bool>,
    pub maintenance_mode: Option<bool>,
    pub time_source: Option<String>,
    pub fallback_source: Option<String>,
    pub ntp_server: Option<String>,
    pub time_zone_offset: Option<i32>,
    pub auto_time_zone: Option<bool>,
    pub enable_utc_correction: Option<bool>,
    pub time_in_start: Option<NaiveTime>,
    pub time_late_threshold: Option<NaiveTime>,
    pub time_out_target: Option<NaiveTime>,
    pub feature_event_based: Option<bool>,
    pub feature_id_generation: Option<bool>,
    pub feature_sf2_generation: Option<bool>,
}

pub const SCHOOL_TYPES: &[&str] = &["public", "private", "charter", "international"];
pub const TIME_SOURCES: &[&str] = &["ntp", "server", "client"];
pub const FALLBACK_SOURCES: &[&str] = &["server", "client"];
