//! Human-readable identifiers for persisted records
//!
//! Identifiers are plain decimal strings built from the UTC creation instant,
//! so they sort by creation time and can be read off a log line at a glance.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Number of characters in an identifier produced by [`human_uid`]
pub const HUMAN_UID_LENGTH: usize = 26;

/// Generates a new human-readable unique identifier
///
/// The layout is `YYYYMMDDhhmmss` + 9 digits of nanoseconds + 3 random digits,
/// 26 characters in total, which fits the 40 character id columns.
///
/// # Example
///
/// ```rust
/// use subscription_kernel::human_uid;
///
/// let id = human_uid();
/// assert_eq!(id.len(), 26);
/// assert!(id.chars().all(|c| c.is_ascii_digit()));
/// ```
pub fn human_uid() -> String {
    human_uid_at(Utc::now())
}

/// Generates an identifier for a specific instant
///
/// Only the last three digits are random, so two calls with the same instant
/// differ in their suffix alone.
pub fn human_uid_at(instant: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().as_u128() % 1000;
    format!("{}{:03}", instant.format("%Y%m%d%H%M%S%9f"), suffix)
}

/// Checks whether a string has the shape of a generated identifier
pub fn is_human_uid(candidate: &str) -> bool {
    candidate.len() == HUMAN_UID_LENGTH && candidate.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_human_uid_shape() {
        let id = human_uid();
        assert!(is_human_uid(&id), "unexpected id shape: {}", id);
    }

    #[test]
    fn test_human_uid_starts_with_timestamp() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let id = human_uid_at(instant);
        assert!(id.starts_with("20240309070501000000000"));
    }
}
