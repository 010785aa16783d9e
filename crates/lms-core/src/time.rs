//! Timestamp helpers.
//!
//! Timestamps are stored as RFC 3339 strings in the `Timestamp` column of
//! every table that has one.

use chrono::{SecondsFormat, Utc};

/// Length of the `YYYY-MM-DD` prefix of a stored timestamp.
const DATE_LEN: usize = 10;

/// Current UTC time as an RFC 3339 string with second precision.
#[must_use]
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// The calendar date portion of a stored timestamp.
///
/// Shorter values are returned unchanged.
#[must_use]
pub fn date_part(timestamp: &str) -> &str {
    timestamp.get(..DATE_LEN).unwrap_or(timestamp)
}
