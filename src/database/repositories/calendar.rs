//! Calendar configuration and holiday repository

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::calendar::{
    CalendarConfig, CreateHolidayRequest, CustomHoliday, UpsertCalendarConfigRequest,
};
use crate::utils::errors::{OpenAttendanceError, Result};

#[derive(Debug, Clone)]
pub struct CalendarRepository {
    pool: PgPool,
}

impl CalendarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_config(&self) -> Result<Option<CalendarConfig>> {
        let config =
            sqlx::query_as::<_, CalendarConfig>("SELECT * FROM calendar_config WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(config)
    }

    pub async fn upsert_config(
        &self,
        request: UpsertCalendarConfigRequest,
    ) -> Result<CalendarConfig> {
        let config = sqlx::query_as::<_, CalendarConfig>(
            r#"
            INSERT INTO calendar_config (id, country, state, region)
            VALUES (1, $1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                country = EXCLUDED.country,
                state = EXCLUDED.state,
                region = EXCLUDED.region
            RETURNING *
            "#,
        )
        .bind(request.country)
        .bind(request.state)
        .bind(request.region)
        .fetch_one(&self.pool)
        .await?;

        Ok(config)
    }

    pub async fn create_holiday(&self, request: CreateHolidayRequest) -> Result<CustomHoliday> {
        let holiday = sqlx::query_as::<_, CustomHoliday>(
            r#"
            INSERT INTO calendar_custom_holidays (name, holiday_date, holiday_type)
            VALUES ($1, $2, COALESCE($3, 'event'))
            RETURNING *
            "#,
        )
        .bind(request.name)
        .bind(request.holiday_date)
        .bind(request.holiday_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(holiday)
    }

    pub async fn delete_holiday(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM calendar_custom_holidays WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(OpenAttendanceError::NotFound("holiday".to_string()));
        }

        Ok(())
    }

    pub async fn list_holidays(&self) -> Result<Vec<CustomHoliday>> {
        let holidays = sqlx::query_as::<_, CustomHoliday>(
            "SELECT * FROM calendar_custom_holidays ORDER BY holiday_date",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(holidays)
    }

    /// Whether the given date is a registered holiday
    pub async fn is_holiday(&self, date: NaiveDate) -> Result<bool> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM calendar_custom_holidays WHERE holiday_date = $1")
                .bind(date)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0 > 0)
    }
}
