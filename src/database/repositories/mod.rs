//! Repository implementations for database operations

pub mod attendance;
pub mod calendar;
pub mod event;
pub mod school;
pub mod section;
pub mod sms;
pub mod staff;
pub mod student;

pub use attendance::AttendanceRepository;
pub use calendar::CalendarRepository;
pub use event::EventRepository;
pub use school::SchoolConfigRepository;
pub use section::SectionRepository;
pub use sms::SmsRepository;
pub use staff::{LoginCredentials, StaffRepository};
pub use student::StudentRepository;
