//! Staff account and login models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Staff {
    pub id: i64,
    pub staff_id: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub staff_type: String,
    pub teacher_type: Option<String>,
    pub adviser_unit: Option<String>,
    pub profile_image_path: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Staff {
    pub fn is_admin(&self) -> bool {
        self.staff_type == "admin"
    }
}

/// Login credentials row; the password hash never serializes out
#[derive(Debug, Clone, FromRow)]
pub struct StaffLogin {
    pub login_id: i64,
    pub staff_id: String,
    pub username: String,
    pub password_hash: String,
    pub security_question: Option<String>,
    pub security_answer_hash: Option<String>,
    pub recovery_code_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaffRequest {
    pub staff_id: String,
    pub name: String,
    pub staff_type: String,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub teacher_type: Option<String>,
    pub adviser_unit: Option<String>,
    pub login: Option<CreateLoginRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoginRequest {
    pub username: String,
    pub password: String,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStaffRequest {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub staff_type: Option<String>,
    pub teacher_type: Option<String>,
    pub adviser_unit: Option<String>,
    pub active: Option<bool>,
}

pub const STAFF_TYPES: &[&str] = &["student_council", "teacher", "security", "admin"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin() {
        let staff = Staff {
            id: 1,
            staff_id: "T-01".into(),
            name: "Admin".into(),
            phone_number: None,
            email_address: None,
            staff_type: "admin".into(),
            teacher_type: None,
            adviser_unit: None,
            profile_image_path: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(staff.is_admin());
    }
}
