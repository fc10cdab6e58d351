//! Data models module

pub mod attendance;
pub mod calendar;
pub mod event;
pub mod school;
pub mod section;
pub mod sms;
pub mod staff;
pub mod student;

pub use attendance::{
    AbsentRecord, DailyAttendanceLog, ExcusedRequest, PresentRecord, ScanDirection, ScanRequest,
    ScanResponse,
};
pub use calendar::{CalendarConfig, CustomHoliday};
pub use event::{Event, EventAttendance, EventNote, EventStaff, EventStatus};
pub use school::SchoolConfig;
pub use section::Section;
pub use sms::{SmsLog, SmsProviderSettings};
pub use staff::{Staff, StaffLogin};
pub use student::Student;
