//! UTC timestamp handling
//!
//! Every timestamp the store persists is a UTC instant with whole-second
//! precision. Soft deletion uses a far-future sentinel to mean "never".

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use thiserror::Error;

/// Storage format for datetimes, portable across SQL backends
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// String form of [`max_datetime`]
pub const MAX_DATETIME: &str = "9999-12-31 23:59:59";

/// Errors related to temporal parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid datetime '{0}'")]
    InvalidDateTime(String),
}

/// Returns the current UTC instant truncated to whole seconds
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Returns the maximal sentinel instant (`9999-12-31 23:59:59` UTC)
///
/// Used as the soft-delete timestamp of live records and as the end of
/// open-ended subscription periods.
pub fn max_datetime() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(9999, 12, 31)
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Formats an instant in the storage format
pub fn format_datetime(instant: DateTime<Utc>) -> String {
    instant.format(DATETIME_FORMAT).to_string()
}

/// Parses a stored datetime string as a UTC instant
///
/// Accepts the storage format with or without fractional seconds, the
/// `T`-separated ISO form, RFC 3339 with any offset, and a bare date
/// (interpreted as midnight). Fractional seconds are discarded.
///
/// # Errors
///
/// Returns `TemporalError::InvalidDateTime` if no format matches
pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, TemporalError> {
    let trimmed = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc).trunc_subsecs(0));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc().trunc_subsecs(0));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TemporalError::InvalidDateTime(raw.to_string()))
}

/// Checks whether a soft-delete timestamp marks its record as deleted at `now`
///
/// A record is deleted once its timestamp is less than or equal to `now`.
pub fn is_deleted_at(soft_deleted_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    soft_deleted_at <= now
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_datetime_formats_as_sentinel() {
        assert_eq!(format_datetime(max_datetime()), MAX_DATETIME);
    }

    #[test]
    fn test_now_has_no_subseconds() {
        assert_eq!(now_utc().timestamp_subsec_nanos(), 0);
    }
}
