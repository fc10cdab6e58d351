//! Student model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub student_id: String,
    pub last_name: Option<String>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub qr_code_token: Option<String>,
    pub profile_image_path: Option<String>,
    pub classroom_section: Option<String>,
    pub status: String,
    pub gender: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{}, {}", last, self.first_name),
            None => self.first_name.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == "Active"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub student_id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub classroom_section: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relationship: Option<String>,
    pub classroom_section: Option<String>,
    pub status: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentListQuery {
    pub section: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let student = Student {
            id: 1,
            student_id: "S-001".into(),
            last_name: Some("Reyes".into()),
            first_name: "Ana".into(),
            middle_name: None,
            phone_number: None,
            address: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            emergency_contact_relationship: None,
            qr_code_token: None,
            profile_image_path: None,
            classroom_section: None,
            status: "Active".into(),
            gender: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(student.full_name(), "Reyes, Ana");
        assert!(student.is_active());
    }
}
