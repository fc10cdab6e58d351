//! Rate limiting middleware
//!
//! This module provides rate limiting for the kiosk scan endpoint so a
//! misbehaving reader cannot flood the attendance tables.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::utils::errors::{OpenAttendanceError, Result};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window_duration: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window_duration: Duration::from_secs(60),
        }
    }
}

/// Rate limit entry for tracking requests per key
#[derive(Debug, Clone)]
struct RateLimitEntry {
    requests: Vec<Instant>,
}

impl RateLimitEntry {
    fn new() -> Self {
        Self { requests: Vec::new() }
    }

    /// Clean up old requests outside the window
    fn cleanup(&mut self, window_duration: Duration) {
        let cutoff = Instant::now() - window_duration;
        self.requests.retain(|&time| time > cutoff);
    }

    fn is_allowed(&mut self, config: &RateLimitConfig) -> bool {
        self.cleanup(config.window_duration);
        (self.requests.len() as u32) < config.max_requests
    }

    fn record_request(&mut self) {
        self.requests.push(Instant::now());
    }
}

/// Rate limiting middleware keyed by an arbitrary string (client address
/// or kiosk identifier)
#[derive(Clone)]
pub struct RateLimitMiddleware {
    config: RateLimitConfig,
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
}

impl RateLimitMiddleware {
    /// Create a new RateLimitMiddleware instance
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check whether a request under `key` is allowed, recording it if so
    pub fn check_rate_limit(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| OpenAttendanceError::Config("rate limiter lock poisoned".to_string()))?;
        let entry = entries.entry(key.to_string()).or_insert_with(RateLimitEntry::new);

        if !entry.is_allowed(&self.config) {
            warn!(key = key, "Rate limit exceeded");
            return Err(OpenAttendanceError::RateLimitExceeded);
        }

        entry.record_request();
        debug!(key = key, requests = entry.requests.len(), "Request allowed");
        Ok(())
    }

    /// Drop stale entries so the map does not grow unbounded
    pub fn cleanup(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            let window = self.config.window_duration;
            entries.retain(|_, entry| {
                entry.cleanup(window);
                !entry.requests.is_empty()
            });
        }
    }
}

impl Default for RateLimitMiddleware {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight_limiter() -> RateLimitMiddleware {
        RateLimitMiddleware::new(RateLimitConfig {
            max_requests: 2,
            window_duration: Duration::from_secs(60),
        })
    }

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = tight_limiter();
        assert!(limiter.check_rate_limit("kiosk-1").is_ok());
        assert!(limiter.check_rate_limit("kiosk-1").is_ok());
        assert!(limiter.check_rate_limit("kiosk-1").is_err());
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = tight_limiter();
        assert!(limiter.check_rate_limit("kiosk-1").is_ok());
        assert!(limiter.check_rate_limit("kiosk-1").is_ok());
        assert!(limiter.check_rate_limit("kiosk-2").is_ok());
    }

    #[test]
    fn test_cleanup_removes_empty_entries() {
        let limiter = RateLimitMiddleware::new(RateLimitConfig {
            max_requests: 2,
            window_duration: Duration::from_millis(1),
        });
        limiter.check_rate_limit("kiosk-1").unwrap();
        std::thread::sleep(Duration::from_millis(5));
        limiter.cleanup();
        assert!(limiter.entries.lock().unwrap().is_empty());
    }
}
