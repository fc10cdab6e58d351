//! Daily attendance models: present/absent rows, excused requests, slot logs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PresentRecord {
    pub present_id: i64,
    pub student_id: String,
    pub staff_id: String,
    pub attendance_date: NaiveDate,
    pub time_in: DateTime<Utc>,
    pub time_out: Option<DateTime<Utc>>,
    pub time_in_client: Option<String>,
    pub time_out_client: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AbsentRecord {
    pub absent_id: i64,
    pub student_id: String,
    pub staff_id: Option<String>,
    pub reason: Option<String>,
    pub absent_date: NaiveDate,
    pub absent_datetime: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExcusedRequest {
    pub excused_id: i64,
    pub student_id: String,
    pub requester_staff_id: String,
    pub processor_staff_id: Option<String>,
    pub reason: String,
    pub excused_date: NaiveDate,
    pub request_datetime: DateTime<Utc>,
    pub verdict_datetime: Option<DateTime<Utc>>,
    pub result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyAttendanceLog {
    pub log_id: i64,
    pub student_id: String,
    pub staff_id: String,
    pub log_date: NaiveDate,
    pub log_slot: String,
    pub log_datetime: DateTime<Utc>,
}

/// Kiosk scan payload: a QR token plus optional client-side context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub qr_code_token: String,
    pub location: Option<String>,
    /// Wall-clock time reported by the kiosk device, stored verbatim
    pub client_time: Option<String>,
}

/// Outcome of a kiosk scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    pub student_id: String,
    pub student_name: String,
    pub direction: ScanDirection,
    pub server_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanDirection {
    CheckIn,
    CheckOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualAbsenceRequest {
    pub student_id: String,
    pub reason: Option<String>,
    pub absent_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExcusedRequest {
    pub student_id: String,
    pub reason: String,
    pub excused_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcusedVerdictRequest {
    pub result: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceRecordsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub section: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
