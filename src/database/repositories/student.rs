//! Student repository implementation

use sqlx::PgPool;

use crate::models::student::{CreateStudentRequest, Student, StudentListQuery, UpdateStudentRequest};
use crate::utils::errors::{OpenAttendanceError, Result};

const STUDENT_COLUMNS: &str = "id, student_id, last_name, first_name, middle_name, phone_number, address, \
     emergency_contact_name, emergency_contact_phone, emergency_contact_relationship, \
     qr_code_token, profile_image_path, classroom_section, status, gender, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new student with a freshly generated QR token
    pub async fn create(&self, request: CreateStudentRequest, qr_token: &str) -> Result<Student> {
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO students (student_id, first_name, last_name, middle_name, phone_number, address,
                emergency_contact_name, emergency_contact_phone, emergency_contact_relationship,
                classroom_section, gender, qr_code_token)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(request.student_id)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.middle_name)
        .bind(request.phone_number)
        .bind(request.address)
        .bind(request.emergency_contact_name)
        .bind(request.emergency_contact_phone)
        .bind(request.emergency_contact_relationship)
        .bind(request.classroom_section)
        .bind(request.gender)
        .bind(qr_token)
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    /// Find a student by their school-issued ID
    pub async fn find_by_student_id(&self, student_id: &str) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = $1"
        ))
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// Find a student by QR code token
    pub async fn find_by_qr_token(&self, token: &str) -> Result<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE qr_code_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    /// Update a student, leaving unspecified fields untouched
    pub async fn update(&self, student_id: &str, request: UpdateStudentRequest) -> Result<Student> {
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                middle_name = COALESCE($4, middle_name),
                phone_number = COALESCE($5, phone_number),
                address = COALESCE($6, address),
                emergency_contact_name = COALESCE($7, emergency_contact_name),
                emergency_contact_phone = COALESCE($8, emergency_contact_phone),
                emergency_contact_relationship = COALESCE($9, emergency_contact_relationship),
                classroom_section = COALESCE($10, classroom_section),
                status = COALESCE($11, status),
                gender = COALESCE($12, gender),
                updated_at = NOW()
            WHERE student_id = $1
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(student_id)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.middle_name)
        .bind(request.phone_number)
        .bind(request.address)
        .bind(request.emergency_contact_name)
        .bind(request.emergency_contact_phone)
        .bind(request.emergency_contact_relationship)
        .bind(request.classroom_section)
        .bind(request.status)
        .bind(request.gender)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| OpenAttendanceError::StudentNotFound {
            student_id: student_id.to_string(),
        })?;

        Ok(student)
    }

    /// Delete a student
    pub async fn delete(&self, student_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM students WHERE student_id = $1")
            .bind(student_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OpenAttendanceError::StudentNotFound {
                student_id: student_id.to_string(),
            });
        }

        Ok(())
    }

    /// List students with optional section/status filters and pagination
    pub async fn list(&self, query: &StudentListQuery) -> Result<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(&format!(
            r#"
            SELECT {STUDENT_COLUMNS} FROM students
            WHERE ($1::TEXT IS NULL OR classroom_section = $1)
              AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY last_name NULLS LAST, first_name
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(query.section.as_deref())
        .bind(query.status.as_deref())
        .bind(query.limit.unwrap_or(100).clamp(1, 1000))
        .bind(query.offset.unwrap_or(0).max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    /// List every active student together with their section's allowed days,
    /// used by the absence sweep
    pub async fn list_active_with_allowed_days(&self) -> Result<Vec<(Student, Option<String>)>> {
        let rows = sqlx::query_as::<_, StudentWithAllowedDays>(
            r#"
            SELECT st.*, s.allowed_days
            FROM students st
            LEFT JOIN sections s ON s.section_name = st.classroom_section
            WHERE st.status = 'Active'
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.student, row.allowed_days))
            .collect())
    }

    /// Replace the student's QR token
    pub async fn set_qr_token(&self, student_id: &str, token: &str) -> Result<Student> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "UPDATE students SET qr_code_token = $2, updated_at = NOW() WHERE student_id = $1 RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(student_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| OpenAttendanceError::StudentNotFound {
            student_id: student_id.to_string(),
        })?;

        Ok(student)
    }

    /// Record the stored path of an uploaded profile image
    pub async fn set_profile_image(&self, student_id: &str, path: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE students SET profile_image_path = $2, updated_at = NOW() WHERE student_id = $1")
                .bind(student_id)
                .bind(path)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(OpenAttendanceError::StudentNotFound {
                student_id: student_id.to_string(),
            });
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct StudentWithAllowedDays {
    #[sqlx(flatten)]
    student: Student,
    allowed_days: Option<String>,
}
