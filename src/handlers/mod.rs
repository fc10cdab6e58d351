//! HTTP handlers module
//!
//! Route handlers grouped by resource, plus the router assembly.

pub mod attendance;
pub mod auth;
pub mod backup;
pub mod calendar;
pub mod events;
pub mod health;
pub mod school;
pub mod sections;
pub mod sms;
pub mod staff;
pub mod students;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{maintenance_gate, require_admin, require_auth};
use crate::state::AppState;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/registration-status", get(auth::registration_status))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/recover", post(auth::recover_password));

    // whole subtrees that only admins may touch
    let admin = Router::new()
        .route("/api/staff", get(staff::list).post(staff::create))
        .route(
            "/api/staff/:staff_id",
            get(staff::get).put(staff::update).delete(staff::delete),
        )
        .route("/api/staff/:staff_id/profile-image", post(staff::upload_profile_image))
        .route("/api/backups", get(backup::list).post(backup::create))
        .route("/api/backups/restore", post(backup::restore))
        .route(
            "/api/backups/:file_name",
            get(backup::download).delete(backup::delete),
        )
        .route_layer(middleware::from_fn(require_admin));

    let protected = Router::new()
        .route("/api/auth/change-password", post(auth::change_password))
        .route("/api/students", get(students::list).post(students::create))
        .route("/api/students/export/roster.csv", get(students::export_roster))
        .route("/api/students/export/qr-bundle.zip", get(students::export_qr_bundle))
        .route(
            "/api/students/:student_id",
            get(students::get).put(students::update).delete(students::delete),
        )
        .route("/api/students/:student_id/qr.svg", get(students::qr_badge))
        .route("/api/students/:student_id/qr/regenerate", post(students::regenerate_qr))
        .route(
            "/api/students/:student_id/profile-image",
            post(students::upload_profile_image),
        )
        .route("/api/sections", get(sections::list).post(sections::create))
        .route(
            "/api/sections/:section_id",
            get(sections::get).put(sections::update).delete(sections::delete),
        )
        .route("/api/attendance/scan", post(attendance::scan))
        .route("/api/attendance/records", get(attendance::records))
        .route("/api/attendance/day", get(attendance::day))
        .route("/api/attendance/absent", post(attendance::mark_absent))
        .route(
            "/api/attendance/excused",
            get(attendance::list_excused).post(attendance::create_excused),
        )
        .route("/api/attendance/excused/:excused_id", put(attendance::excused_verdict))
        .route("/api/attendance/export/sheet.csv", get(attendance::export_sheet))
        .route("/api/attendance/:student_id/slots", get(attendance::slot_logs))
        .route("/api/events", get(events::list).post(events::create))
        .route(
            "/api/events/:event_id",
            get(events::get).put(events::update).delete(events::delete),
        )
        .route("/api/events/:event_id/status", put(events::set_status))
        .route(
            "/api/events/:event_id/staff",
            get(events::list_staff).post(events::assign_staff),
        )
        .route("/api/events/:event_id/staff/:staff_id", delete(events::unassign_staff))
        .route("/api/events/:event_id/scan", post(events::scan))
        .route("/api/events/:event_id/attendance", get(events::list_attendance))
        .route(
            "/api/events/:event_id/notes",
            get(events::list_notes).post(events::add_note),
        )
        .route("/api/events/:event_id/notes/:note_id", delete(events::delete_note))
        .route("/api/school", get(school::get).put(school::upsert))
        .route("/api/school/logo", post(school::upload_logo))
        .route("/api/calendar", get(calendar::get_config).put(calendar::upsert_config))
        .route(
            "/api/calendar/holidays",
            get(calendar::list_holidays).post(calendar::create_holiday),
        )
        .route("/api/calendar/holidays/:id", delete(calendar::delete_holiday))
        .route("/api/sms/settings", get(sms::get_settings).put(sms::upsert_settings))
        .route("/api/sms/send", post(sms::send))
        .route("/api/sms/logs", get(sms::list_logs))
        .merge(admin)
        .layer(middleware::from_fn_with_state(state.clone(), maintenance_gate))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(state.settings.server.max_upload_bytes))
        .with_state(state)
}
