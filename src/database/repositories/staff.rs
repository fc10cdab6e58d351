//! Staff account and login repository implementation

use sqlx::PgPool;

use crate::models::staff::{CreateStaffRequest, Staff, StaffLogin, UpdateStaffRequest};
use crate::utils::errors::{OpenAttendanceError, Result};

const STAFF_COLUMNS: &str = "id, staff_id, name, phone_number, email_address, staff_type, \
     teacher_type, adviser_unit, profile_image_path, active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: PgPool,
}

impl StaffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a staff account, optionally with login credentials, in one transaction
    pub async fn create(
        &self,
        request: CreateStaffRequest,
        credentials: Option<LoginCredentials>,
    ) -> Result<Staff> {
        let mut tx = self.pool.begin().await?;

        let staff = sqlx::query_as::<_, Staff>(&format!(
            r#"
            INSERT INTO staff_accounts (staff_id, name, staff_type, phone_number, email_address, teacher_type, adviser_unit)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {STAFF_COLUMNS}
            "#
        ))
        .bind(&request.staff_id)
        .bind(&request.name)
        .bind(&request.staff_type)
        .bind(&request.phone_number)
        .bind(&request.email_address)
        .bind(&request.teacher_type)
        .bind(&request.adviser_unit)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(creds) = credentials {
            sqlx::query(
                r#"
                INSERT INTO staff_login (staff_id, username, password_hash, security_question, security_answer_hash, recovery_code_hash)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&staff.staff_id)
            .bind(creds.username)
            .bind(creds.password_hash)
            .bind(creds.security_question)
            .bind(creds.security_answer_hash)
            .bind(creds.recovery_code_hash)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(staff)
    }

    pub async fn find_by_staff_id(&self, staff_id: &str) -> Result<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff_accounts WHERE staff_id = $1"
        ))
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn update(&self, staff_id: &str, request: UpdateStaffRequest) -> Result<Staff> {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            r#"
            UPDATE staff_accounts
            SET name = COALESCE($2, name),
                phone_number = COALESCE($3, phone_number),
                email_address = COALESCE($4, email_address),
                staff_type = COALESCE($5, staff_type),
                teacher_type = COALESCE($6, teacher_type),
                adviser_unit = COALESCE($7, adviser_unit),
                active = COALESCE($8, active),
                updated_at = NOW()
            WHERE staff_id = $1
            RETURNING {STAFF_COLUMNS}
            "#
        ))
        .bind(staff_id)
        .bind(request.name)
        .bind(request.phone_number)
        .bind(request.email_address)
        .bind(request.staff_type)
        .bind(request.teacher_type)
        .bind(request.adviser_unit)
        .bind(request.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| OpenAttendanceError::StaffNotFound {
            staff_id: staff_id.to_string(),
        })?;

        Ok(staff)
    }

    /// Delete a staff account; login rows cascade
    pub async fn delete(&self, staff_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM staff_accounts WHERE staff_id = $1")
            .bind(staff_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OpenAttendanceError::StaffNotFound {
                staff_id: staff_id.to_string(),
            });
        }

        Ok(())
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {STAFF_COLUMNS} FROM staff_accounts ORDER BY name LIMIT $1 OFFSET $2"
        ))
        .bind(limit.clamp(1, 1000))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn set_profile_image(&self, staff_id: &str, path: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE staff_accounts SET profile_image_path = $2, updated_at = NOW() WHERE staff_id = $1")
                .bind(staff_id)
                .bind(path)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(OpenAttendanceError::StaffNotFound {
                staff_id: staff_id.to_string(),
            });
        }

        Ok(())
    }

    pub async fn find_login_by_username(&self, username: &str) -> Result<Option<StaffLogin>> {
        let login = sqlx::query_as::<_, StaffLogin>(
            "SELECT login_id, staff_id, username, password_hash, security_question, security_answer_hash, recovery_code_hash FROM staff_login WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(login)
    }

    pub async fn find_login_by_staff_id(&self, staff_id: &str) -> Result<Option<StaffLogin>> {
        let login = sqlx::query_as::<_, StaffLogin>(
            "SELECT login_id, staff_id, username, password_hash, security_question, security_answer_hash, recovery_code_hash FROM staff_login WHERE staff_id = $1",
        )
        .bind(staff_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(login)
    }

    pub async fn update_password_hash(&self, staff_id: &str, password_hash: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE staff_login SET password_hash = $2, updated_at = NOW() WHERE staff_id = $1")
                .bind(staff_id)
                .bind(password_hash)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(OpenAttendanceError::StaffNotFound {
                staff_id: staff_id.to_string(),
            });
        }

        Ok(())
    }

    /// Whether any admin login exists (used to gate first-run registration)
    pub async fn admin_login_exists(&self) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM staff_login l
            JOIN staff_accounts a ON a.staff_id = l.staff_id
            WHERE a.staff_type = 'admin'
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }
}

/// Pre-hashed credential payload handed down from the auth service
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password_hash: String,
    pub security_question: Option<String>,
    pub security_answer_hash: Option<String>,
    pub recovery_code_hash: Option<String>,
}
