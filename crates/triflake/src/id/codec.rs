use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Parses an unsigned 64-bit integer from lowercase or uppercase hex.
///
/// Unlike [`u64::from_str_radix`], a leading `+` is rejected: every byte must
/// be a hex digit.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if `input` is empty
/// - [`Error::InvalidHex`] on the first non-hex byte
/// - [`Error::HexOverflow`] if the value needs more than 64 bits
///
/// # Example
///
/// ```
/// use triflake::parse_hex_u64;
///
/// assert_eq!(parse_hex_u64("5000014").unwrap(), 83_886_100);
/// assert!(parse_hex_u64("+1").is_err());
/// ```
pub fn parse_hex_u64(input: &str) -> Result<u64> {
    validate_hex(input)?;
    u64::from_str_radix(input, 16).map_err(|_| Error::HexOverflow {
        input: input.to_owned(),
    })
}

pub(crate) fn validate_hex(input: &str) -> Result<()> {
    if input.is_empty() {
        return Err(Error::EmptyInput);
    }
    match input.bytes().position(|b| !b.is_ascii_hexdigit()) {
        Some(index) => Err(Error::InvalidHex {
            input: input.to_owned(),
            index,
        }),
        None => Ok(()),
    }
}

/// Converts UNIX milliseconds into a UTC calendar date and time.
///
/// # Errors
///
/// Returns [`Error::TimestampOutOfRange`] if `millis` is beyond what
/// [`DateTime<Utc>`] can represent.
pub fn millis_to_datetime(millis: u64) -> Result<DateTime<Utc>> {
    i64::try_from(millis)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .ok_or(Error::TimestampOutOfRange { millis })
}
