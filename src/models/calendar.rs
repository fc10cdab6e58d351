//! Calendar configuration and custom holiday models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CalendarConfig {
    pub id: i32,
    pub country: String,
    pub state: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomHoliday {
    pub id: i64,
    pub name: String,
    pub holiday_date: NaiveDate,
    pub holiday_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertCalendarConfigRequest {
    pub country: String,
    pub state: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHolidayRequest {
    pub name: String,
    pub holiday_date: NaiveDate,
    pub holiday_type: Option<String>,
}
