//! Authentication middleware
//!
//! Extracts the bearer token from incoming requests, validates it, and
//! stores the resulting [`StaffContext`] in request extensions for handlers
//! to consume. Also hosts the admin guard and the maintenance-mode gate.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::services::StaffContext;
use crate::state::AppState;
use crate::utils::errors::{OpenAttendanceError, Result};

/// Pull the bearer token out of the Authorization header
fn bearer_token(request: &Request) -> Result<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| OpenAttendanceError::Authentication("missing bearer token".to_string()))
}

/// Require a valid staff session token
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(&request)?;
    let context = state.services.auth_service.verify_token(token)?;
    debug!(staff_id = %context.staff_id, "Authenticated request");
    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Require an authenticated admin; runs after [`require_auth`]
pub async fn require_admin(request: Request, next: Next) -> Result<Response> {
    let context = request
        .extensions()
        .get::<StaffContext>()
        .ok_or_else(|| OpenAttendanceError::Authentication("missing bearer token".to_string()))?;

    if !context.is_admin() {
        return Err(OpenAttendanceError::PermissionDenied(
            "admin access required".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Whether maintenance mode blocks this request.
///
/// Only mutating requests from non-admins are held back; reads stay
/// available so staff can still look at the data while maintenance is on.
fn maintenance_blocks(method: &Method, is_admin: bool) -> bool {
    if is_admin {
        return false;
    }
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Reject mutating requests while maintenance mode is enabled, except for
/// admins.
///
/// Runs after [`require_auth`] so the staff context is available.
pub async fn maintenance_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if state.database.school.maintenance_mode().await? {
        let is_admin = request
            .extensions()
            .get::<StaffContext>()
            .map(StaffContext::is_admin)
            .unwrap_or(false);
        if maintenance_blocks(request.method(), is_admin) {
            return Err(OpenAttendanceError::MaintenanceMode);
        }
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maintenance_blocks_only_mutations() {
        assert!(!maintenance_blocks(&Method::GET, false));
        assert!(!maintenance_blocks(&Method::HEAD, false));
        assert!(maintenance_blocks(&Method::POST, false));
        assert!(maintenance_blocks(&Method::PUT, false));
        assert!(maintenance_blocks(&Method::DELETE, false));
    }

    #[test]
    fn test_maintenance_never_blocks_admins() {
        assert!(!maintenance_blocks(&Method::POST, true));
        assert!(!maintenance_blocks(&Method::DELETE, true));
    }
}
