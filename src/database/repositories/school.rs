//! School configuration repository (single-row table)

use sqlx::PgPool;

use crate::models::school::{SchoolConfig, UpsertSchoolConfigRequest};
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct SchoolConfigRepository {
    pool: PgPool,
}

impl SchoolConfigRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self) -> Result<Option<SchoolConfig>> {
        let config =
            sqlx::query_as::<_, SchoolConfig>("SELECT * FROM configurations WHERE config_id = 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(config)
    }

    /// Insert or update the singleton configuration row.
    ///
    /// COALESCE against column defaults keeps unspecified optional fields at
    /// their current (or default) value on both insert and update.
    pub async fn upsert(&self, request: UpsertSchoolConfigRequest) -> Result<SchoolConfig> {
        let config = sqlx::query_as::<_, SchoolConfig>(
            r#"
            INSERT INTO configurations (
                config_id, school_name, school_type, school_id, address, organization_hotline,
                country_code, principal_name, principal_title, school_year,
                fixed_weekday_schedule, strict_attendance_window, maintenance_mode,
                time_source, fallback_source, ntp_server, time_zone_offset,
                auto_time_zone, enable_utc_correction,
                time_in_start, time_late_threshold, time_out_target,
                feature_event_based, feature_id_generation, feature_sf2_generation
            )
            VALUES (
                1, $1, $2, $3, $4, $5,
                COALESCE($6, 'PH'), $7, COALESCE($8, 'School Principal'), COALESCE($9, '2026-2027'),
                COALESCE($10, TRUE), COALESCE($11, FALSE), COALESCE($12, FALSE),
                COALESCE($13, 'ntp'), COALESCE($14, 'server'), COALESCE($15, 'pool.ntp.org'), COALESCE($16, 0),
                COALESCE($17, TRUE), COALESCE($18, TRUE),
                COALESCE($19, TIME '06:00:00'), COALESCE($20, TIME '08:00:00'), COALESCE($21, TIME '16:00:00'),
                COALESCE($22, TRUE), COALESCE($23, TRUE), COALESCE($24, TRUE)
            )
            ON CONFLICT (config_id) DO UPDATE SET
                school_name = EXCLUDED.school_name,
                school_type = COALESCE($2, configurations.school_type),
                school_id = COALESCE($3, configurations.school_id),
                address = COALESCE($4, configurations.address),
                organization_hotline = COALESCE($5, configurations.organization_hotline),
                country_code = COALESCE($6, configurations.country_code),
                principal_name = COALESCE($7, configurations.principal_name),
                principal_title = COALESCE($8, configurations.principal_title),
                school_year = COALESCE($9, configurations.school_year),
                fixed_weekday_schedule = COALESCE($10, configurations.fixed_weekday_schedule),
                strict_attendance_window = COALESCE($11, configurations.strict_attendance_window),
                maintenance_mode = COALESCE($12, configurations.maintenance_mode),
                time_source = COALESCE($13, configurations.time_source),
                fallback_source = COALESCE($14, configurations.fallback_source),
                ntp_server = COALESCE($15, configurations.ntp_server),
                time_zone_offset = COALESCE($16, configurations.time_zone_offset),
                auto_time_zone = COALESCE($17, configurations.auto_time_zone),
                enable_utc_correction = COALESCE($18, configurations.enable_utc_correction),
                time_in_start = COALESCE($19, configurations.time_in_start),
                time_late_threshold = COALESCE($20, configurations.time_late_threshold),
                time_out_target = COALESCE($21, configurations.time_out_target),
                feature_event_based = COALESCE($22, configurations.feature_event_based),
                feature_id_generation = COALESCE($23, configurations.feature_id_generation),
                feature_sf2_generation = COALESCE($24, configurations.feature_sf2_generation),
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(request.school_name)
        .bind(request.school_type)
        .bind(request.school_id)
        .bind(request.address)
        .bind(request.organization_hotline)
        .bind(request.country_code)
        .bind(request.principal_name)
        .bind(request.principal_title)
        .bind(request.school_year)
        .bind(request.fixed_weekday_schedule)
        .bind(request.strict_attendance_window)
        .bind(request.maintenance_mode)
        .bind(request.time_source)
        .bind(request.fallback_source)
        .bind(request.ntp_server)
        .bind(request.time_zone_offset)
        .bind(request.auto_time_zone)
        .bind(request.enable_utc_correction)
        .bind(request.time_in_start)
        .bind(request.time_late_threshold)
        .bind(request.time_out_target)
        .bind(request.feature_event_based)
        .bind(request.feature_id_generation)
        .bind(request.feature_sf2_generation)
        .fetch_one(&self.pool)
        .await?;

        Ok(config)
    }

    pub async fn set_logo_path(&self, path: &str) -> Result<()> {
        sqlx::query("UPDATE configurations SET logo_path = $1, updated_at = NOW() WHERE config_id = 1")
            .bind(path)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Maintenance flag, false when the school is not yet configured
    pub async fn maintenance_mode(&self) -> Result<bool> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT maintenance_mode FROM configurations WHERE config_id = 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(enabled,)| enabled).unwrap_or(false))
    }
}
