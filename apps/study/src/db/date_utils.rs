//! Timestamp conversion between chrono and stored RFC 3339 text.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

/// Format a timestamp for storage.
///
/// Fixed precision with a `Z` suffix keeps stored values lexically ordered.
pub fn to_db_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp from column `idx`.
pub fn parse_db_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Conversion failure for a text column holding an unexpected value.
pub fn invalid_text(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, message.into())
}
