//! Router-level contract tests
//!
//! These exercise the HTTP surface without a live database: authentication
//! is enforced before any query runs, so the middleware behavior is
//! observable with a lazy (never-connected) pool.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use openattendance::config::Settings;
use openattendance::database::DatabaseService;
use openattendance::handlers;
use openattendance::models::staff::Staff;
use openattendance::state::AppState;

fn test_state() -> AppState {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = "router-test-secret-key".to_string();
    settings.auth.bcrypt_cost = 4;

    // never connects; DB-backed handlers fail fast instead of hanging
    let pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(100))
        .connect_lazy("postgresql://127.0.0.1:1/openattendance_test")
        .expect("lazy pool");

    AppState::new(settings, DatabaseService::new(pool))
}

fn test_token(state: &AppState, staff_type: &str) -> String {
    let staff = Staff {
        id: 1,
        staff_id: "T-100".into(),
        name: "Router Test".into(),
        phone_number: None,
        email_address: None,
        staff_type: staff_type.into(),
        teacher_type: None,
        adviser_unit: None,
        profile_image_path: None,
        active: true,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };
    state
        .services
        .auth_service
        .issue_token(&staff)
        .expect("token")
}

#[tokio::test]
async fn test_health_without_database_reports_degraded() {
    let state = test_state();
    let app = handlers::router(state);

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], false);
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let state = test_state();
    let app = handlers::router(state);

    let response = app
        .oneshot(Request::get("/api/students").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("bearer token"));
}

#[tokio::test]
async fn test_malformed_token_rejected() {
    let state = test_state();
    let app = handlers::router(state);

    let response = app
        .oneshot(
            Request::get("/api/students")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_passes_authentication() {
    let state = test_state();
    let token = test_token(&state, "teacher");
    let app = handlers::router(state);

    let response = app
        .oneshot(
            Request::get("/api/students")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // the request clears auth; only the (absent) database stops it
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let state = test_state();
    let app = handlers::router(state);

    let response = app
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_rejects_post() {
    let state = test_state();
    let app = handlers::router(state);

    let response = app
        .oneshot(Request::post("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
