//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{NaiveTime, Timelike, Weekday};
use rand::distributions::Alphanumeric;
use rand::Rng;
use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Generate an opaque QR code token for a student badge
pub fn generate_qr_token() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("OA-{}-{}", Uuid::new_v4().simple(), suffix)
}

/// Generate a one-time recovery code (shown once at account creation)
pub fn generate_recovery_code() -> String {
    let code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    code.to_uppercase()
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.contains('.') && email.len() > 5
}

/// Validate phone number format (basic validation)
pub fn is_valid_phone(phone: &str) -> bool {
    phone.chars().all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
        && phone.chars().filter(|c| c.is_ascii_digit()).count() >= 7
}

/// Parse a weekday name as stored in a section's `allowed_days` list
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Daily attendance log slot derived from the local wall-clock time.
///
/// Morning runs until noon, afternoon until 17:00, evening after that.
/// The `_in`/`_out` suffix follows the scan direction.
pub fn slot_for_time(time: NaiveTime, checking_in: bool) -> &'static str {
    let period = if time.hour() < 12 {
        "morning"
    } else if time.hour() < 17 {
        "afternoon"
    } else {
        "evening"
    };
    match (period, checking_in) {
        ("morning", true) => "morning_in",
        ("morning", false) => "morning_out",
        ("afternoon", true) => "afternoon_in",
        ("afternoon", false) => "afternoon_out",
        (_, true) => "evening_in",
        (_, false) => "evening_out",
    }
}

/// Sanitize a filename for storage under the upload directory
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_token_uniqueness() {
        let a = generate_qr_token();
        let b = generate_qr_token();
        assert_ne!(a, b);
        assert!(a.starts_with("OA-"));
    }

    #[test]
    fn test_phone_validation() {
        assert!(is_valid_phone("+63 912 345 6789"));
        assert!(is_valid_phone("09123456789"));
        assert!(!is_valid_phone("not-a-phone"));
        assert!(!is_valid_phone("123"));
    }

    #[test]
    fn test_weekday_parsing() {
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday(" tue "), Some(Weekday::Tue));
        assert_eq!(parse_weekday("Funday"), None);
    }

    #[test]
    fn test_slot_for_time() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(slot_for_time(t(7, 30), true), "morning_in");
        assert_eq!(slot_for_time(t(11, 59), false), "morning_out");
        assert_eq!(slot_for_time(t(13, 0), true), "afternoon_in");
        assert_eq!(slot_for_time(t(16, 59), false), "afternoon_out");
        assert_eq!(slot_for_time(t(18, 0), true), "evening_in");
        assert_eq!(slot_for_time(t(21, 0), false), "evening_out");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("photo 1.png"), "photo_1.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
    }
}
