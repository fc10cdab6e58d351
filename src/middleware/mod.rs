//! Middleware module
//!
//! Request middleware: authentication, admin guard, maintenance gate, and
//! rate limiting.

pub mod auth;
pub mod rate_limit;

// Re-export commonly used middleware components
pub use auth::{maintenance_gate, require_admin, require_auth};
pub use rate_limit::{RateLimitConfig, RateLimitMiddleware};
