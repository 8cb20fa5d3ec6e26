//! Timestamp recovery from raw or encoded identifiers.
//!
//! These are thin wrappers over the identifier types for callers holding a
//! bare integer or string. All returned timestamps are absolute UNIX
//! milliseconds.

use crate::{
    Result, SnowflakeId64, SnowflakeId128, SnowflakeNilId64, TRIFLAKE_EPOCH_MILLIS,
    millis_to_datetime, parse_hex_u64,
};
use chrono::{DateTime, Utc};

/// Recovers the timestamp of a [`SnowflakeId64`].
///
/// ```
/// assert_eq!(triflake::extract_timestamp(83_886_100), 1_456_790_400_010);
/// ```
pub const fn extract_timestamp(id: u64) -> u64 {
    TRIFLAKE_EPOCH_MILLIS + (id >> SnowflakeId64::TIMESTAMP_SHIFT)
}

/// # Errors
///
/// Returns an error if `id_hex` is not well-formed 64-bit hex.
pub fn extract_timestamp_from_hex(id_hex: &str) -> Result<u64> {
    parse_hex_u64(id_hex).map(extract_timestamp)
}

/// # Errors
///
/// Returns an error if the timestamp is not a representable date.
pub fn extract_datetime(id: u64) -> Result<DateTime<Utc>> {
    millis_to_datetime(extract_timestamp(id))
}

/// # Errors
///
/// Returns an error if `id_hex` is malformed or its timestamp is not a
/// representable date.
pub fn extract_datetime_from_hex(id_hex: &str) -> Result<DateTime<Utc>> {
    extract_timestamp_from_hex(id_hex).and_then(millis_to_datetime)
}

/// Recovers the timestamp of a [`SnowflakeNilId64`].
pub const fn extract_timestamp_nil(id: u64) -> u64 {
    TRIFLAKE_EPOCH_MILLIS + (id >> SnowflakeNilId64::TIMESTAMP_SHIFT)
}

/// # Errors
///
/// Returns an error if `id_hex` is not well-formed 64-bit hex.
pub fn extract_timestamp_nil_from_hex(id_hex: &str) -> Result<u64> {
    parse_hex_u64(id_hex).map(extract_timestamp_nil)
}

/// # Errors
///
/// Returns an error if the timestamp is not a representable date.
pub fn extract_datetime_nil(id: u64) -> Result<DateTime<Utc>> {
    millis_to_datetime(extract_timestamp_nil(id))
}

/// # Errors
///
/// Returns an error if `id_hex` is malformed or its timestamp is not a
/// representable date.
pub fn extract_datetime_nil_from_hex(id_hex: &str) -> Result<DateTime<Utc>> {
    extract_timestamp_nil_from_hex(id_hex).and_then(millis_to_datetime)
}

/// Recovers the timestamp of a hex-encoded [`SnowflakeId128`] from every
/// character before the 16-digit low word.
///
/// # Errors
///
/// Returns an error if `id_hex` is malformed or has no timestamp prefix.
pub fn extract_timestamp128_hex(id_hex: &str) -> Result<u64> {
    SnowflakeId128::timestamp_from_hex(id_hex)
}

/// # Errors
///
/// Returns an error if `id_hex` is malformed or its timestamp is not a
/// representable date.
pub fn extract_datetime128_hex(id_hex: &str) -> Result<DateTime<Utc>> {
    extract_timestamp128_hex(id_hex).and_then(millis_to_datetime)
}
