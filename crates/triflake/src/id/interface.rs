use crate::{Result, millis_to_datetime};
use chrono::{DateTime, Utc};
use core::{fmt, hash::Hash};

/// Behavior shared by the three identifier layouts.
///
/// Every layout orders its fields timestamp (most significant), node id,
/// sequence (least significant), so comparing two identifiers of the same
/// layout compares creation time first.
pub trait Snowflake:
    Sized + Copy + Clone + fmt::Display + fmt::Debug + PartialOrd + Ord + PartialEq + Eq + Hash
{
    /// Width of the node id field in bits.
    const NODE_ID_BITS: u32;

    /// Width of the sequence field in bits (`0` for layouts without one).
    const SEQUENCE_BITS: u32;

    /// Returns the embedded timestamp as absolute UNIX milliseconds.
    fn unix_millis(&self) -> u64;

    /// Returns the node id portion of the identifier.
    fn node_id(&self) -> u64;

    /// Returns the sequence portion of the identifier.
    fn sequence(&self) -> u64;

    /// Encodes the identifier as lowercase hex.
    fn to_hex(&self) -> String;

    /// Encodes the identifier as binary digits.
    fn to_bin(&self) -> String;

    /// Decodes an identifier from the format produced by
    /// [`Snowflake::to_hex`].
    ///
    /// # Errors
    ///
    /// Returns an error if `input` is not well-formed hex for this layout.
    fn from_hex(input: &str) -> Result<Self>;

    /// Largest node id that fits the layout. Larger ids are truncated.
    fn max_node_id() -> u64 {
        (1 << Self::NODE_ID_BITS) - 1
    }

    /// Largest sequence value issued within one millisecond.
    fn max_sequence() -> u64 {
        (1 << Self::SEQUENCE_BITS) - 1
    }

    /// Converts the embedded timestamp into a UTC date and time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOutOfRange`] if the timestamp is not a
    /// representable date.
    ///
    /// [`Error::TimestampOutOfRange`]: crate::Error::TimestampOutOfRange
    fn datetime(&self) -> Result<DateTime<Utc>> {
        millis_to_datetime(self.unix_millis())
    }
}
