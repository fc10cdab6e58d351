//! Section repository implementation

use sqlx::PgPool;

use crate::models::section::{CreateSectionRequest, Section, UpdateSectionRequest};
use crate::utils::errors::{OpenAttendanceError, Result};

#[derive(Debug, Clone)]
pub struct SectionRepository {
    pool: PgPool,
}

impl SectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, request: CreateSectionRequest) -> Result<Section> {
        let section = sqlx::query_as::<_, Section>(
            r#"
            INSERT INTO sections (section_name, adviser_staff_id, room_number, grade_level, strand, schedule_data, allowed_days)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(request.section_name)
        .bind(request.adviser_staff_id)
        .bind(request.room_number)
        .bind(request.grade_level)
        .bind(request.strand)
        .bind(request.schedule_data)
        .bind(request.allowed_days)
        .fetch_one(&self.pool)
        .await?;

        Ok(section)
    }

    pub async fn find_by_id(&self, section_id: i64) -> Result<Option<Section>> {
        let section = sqlx::query_as::<_, Section>("SELECT * FROM sections WHERE section_id = $1")
            .bind(section_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(section)
    }

    pub async fn find_by_name(&self, section_name: &str) -> Result<Option<Section>> {
        let section = sqlx::query_as::<_, Section>("SELECT * FROM sections WHERE section_name = $1")
            .bind(section_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(section)
    }

    pub async fn update(&self, section_id: i64, request: UpdateSectionRequest) -> Result<Section> {
        let section = sqlx::query_as::<_, Section>(
            r#"
            UPDATE sections
            SET section_name = COALESCE($2, section_name),
                adviser_staff_id = COALESCE($3, adviser_staff_id),
                room_number = COALESCE($4, room_number),
                grade_level = COALESCE($5, grade_level),
                strand = COALESCE($6, strand),
                schedule_data = COALESCE($7, schedule_data),
                allowed_days = COALESCE($8, allowed_days)
            WHERE section_id = $1
            RETURNING *
            "#,
        )
        .bind(section_id)
        .bind(request.section_name)
        .bind(request.adviser_staff_id)
        .bind(request.room_number)
        .bind(request.grade_level)
        .bind(request.strand)
        .bind(request.schedule_data)
        .bind(request.allowed_days)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(OpenAttendanceError::SectionNotFound { section_id })?;

        Ok(section)
    }

    pub async fn delete(&self, section_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM sections WHERE section_id = $1")
            .bind(section_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OpenAttendanceError::SectionNotFound { section_id });
        }

        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Section>> {
        let sections = sqlx::query_as::<_, Section>("SELECT * FROM sections ORDER BY section_name")
            .fetch_all(&self.pool)
            .await?;

        Ok(sections)
    }
}
