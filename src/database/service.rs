//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    AttendanceRepository, CalendarRepository, DatabasePool, EventRepository,
    SchoolConfigRepository, SectionRepository, SmsRepository, StaffRepository, StudentRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub pool: DatabasePool,
    pub students: StudentRepository,
    pub staff: StaffRepository,
    pub sections: SectionRepository,
    pub attendance: AttendanceRepository,
    pub events: EventRepository,
    pub school: SchoolConfigRepository,
    pub sms: SmsRepository,
    pub calendar: CalendarRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            students: StudentRepository::new(pool.clone()),
            pool: pool.clone(),
            staff: StaffRepository::new(pool.clone()),
            sections: SectionRepository::new(pool.clone()),
            attendance: AttendanceRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            school: SchoolConfigRepository::new(pool.clone()),
            sms: SmsRepository::new(pool.clone()),
            calendar: CalendarRepository::new(pool),
        }
    }
}
