//! Health check handler

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::database;
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database_healthy = database::health_check(&state.database.pool).await.is_ok();

    Json(json!({
        "status": if database_healthy { "ok" } else { "degraded" },
        "database": database_healthy,
        "version": crate::VERSION,
    }))
}
