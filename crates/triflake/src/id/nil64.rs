use crate::{Result, Snowflake, TRIFLAKE_EPOCH_MILLIS, id::id64::epoch_offset, parse_hex_u64};
use core::fmt;

/// A 64-bit Snowflake ID without a sequence field.
///
/// - 41 bits timestamp (ms since [`TRIFLAKE_EPOCH`])
/// - 23 bits node ID
///
/// ```text
///  Bit Index:  63             23 22              0
///              +----------------+----------------+
///  Field:      | timestamp (41) |  node ID (23)  |
///              +----------------+----------------+
///              |<--- MSB ----- 64 bits --- LSB ->|
/// ```
///
/// With no sequence, a node can mint at most one of these per millisecond.
/// The generator blocks until the next millisecond instead.
///
/// [`TRIFLAKE_EPOCH`]: crate::TRIFLAKE_EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeNilId64 {
    id: u64,
}

impl SnowflakeNilId64 {
    /// Bitmask for the 41-bit timestamp field. Occupies bits 23 through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for the 23-bit node ID field. Occupies bits 0 through 22.
    pub const NODE_ID_MASK: u64 = (1 << 23) - 1;

    /// Number of bits to shift the timestamp to its position (bit 23).
    pub const TIMESTAMP_SHIFT: u64 = 23;

    /// Packs an epoch-relative timestamp and node ID.
    pub const fn from(timestamp: u64, node_id: u64) -> Self {
        Self {
            id: ((timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT)
                | Self::node_template(node_id),
        }
    }

    /// Packs an absolute UNIX millisecond timestamp. Times before the epoch
    /// wrap modulo 2^41, as in [`SnowflakeId64::from_unix_millis`].
    ///
    /// [`SnowflakeId64::from_unix_millis`]: crate::SnowflakeId64::from_unix_millis
    pub const fn from_unix_millis(millis: u64, node_id: u64) -> Self {
        Self::from(epoch_offset(millis), node_id)
    }

    pub(crate) const fn node_template(node_id: u64) -> u64 {
        node_id & Self::NODE_ID_MASK
    }

    pub(crate) const fn from_template(millis: u64, template: u64) -> Self {
        let offset = epoch_offset(millis) & Self::TIMESTAMP_MASK;
        Self {
            id: (offset << Self::TIMESTAMP_SHIFT) | template,
        }
    }

    pub const fn from_raw(id: u64) -> Self {
        Self { id }
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the epoch-relative timestamp.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the timestamp as absolute UNIX milliseconds.
    pub const fn unix_millis(&self) -> u64 {
        TRIFLAKE_EPOCH_MILLIS + self.timestamp()
    }

    /// Extracts the node ID.
    pub const fn node_id(&self) -> u64 {
        self.id & Self::NODE_ID_MASK
    }

    pub fn to_hex(&self) -> String {
        format!("{:x}", self.id)
    }

    pub fn to_bin(&self) -> String {
        format!("{:b}", self.id)
    }

    /// Decodes an ID from hex.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` is empty, contains a non-hex byte, or does
    /// not fit in 64 bits.
    pub fn from_hex(input: &str) -> Result<Self> {
        parse_hex_u64(input).map(Self::from_raw)
    }
}

impl Snowflake for SnowflakeNilId64 {
    const NODE_ID_BITS: u32 = 23;
    const SEQUENCE_BITS: u32 = 0;

    fn unix_millis(&self) -> u64 {
        self.unix_millis()
    }

    fn node_id(&self) -> u64 {
        self.node_id()
    }

    fn sequence(&self) -> u64 {
        0
    }

    fn to_hex(&self) -> String {
        self.to_hex()
    }

    fn to_bin(&self) -> String {
        self.to_bin()
    }

    fn from_hex(input: &str) -> Result<Self> {
        Self::from_hex(input)
    }
}

impl From<SnowflakeNilId64> for u64 {
    fn from(id: SnowflakeNilId64) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SnowflakeNilId64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeNilId64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeNilId64")
            .field("raw", &format_args!("{:#018x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("node_id", &self.node_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_fills_low_bits() {
        let id = SnowflakeNilId64::from_unix_millis(TRIFLAKE_EPOCH_MILLIS + 10, 5);
        assert_eq!(id.to_raw(), (10 << 23) | 5);
        assert_eq!(id.to_hex(), "5000005");
        assert_eq!(id.node_id(), 5);
        assert_eq!(id.unix_millis(), TRIFLAKE_EPOCH_MILLIS + 10);
    }

    #[test]
    fn node_id_is_truncated_to_23_bits() {
        let id = SnowflakeNilId64::from(0, (1 << 23) | 7);
        assert_eq!(id.node_id(), 7);
        assert_eq!(id.timestamp(), 0);
        assert_eq!(SnowflakeNilId64::max_node_id(), SnowflakeNilId64::NODE_ID_MASK);
        assert_eq!(SnowflakeNilId64::max_sequence(), 0);
    }

    #[test]
    fn hex_round_trip_preserves_timestamp() {
        let id = SnowflakeNilId64::from(0x1_2345_6789, 0x7f_ffff);
        let decoded = SnowflakeNilId64::from_hex(&id.to_hex()).unwrap();
        assert_eq!(decoded, id);
        assert_eq!(decoded.timestamp(), 0x1_2345_6789);
    }

    #[test]
    fn pre_epoch_timestamps_stay_distinct() {
        let a = SnowflakeNilId64::from_unix_millis(1_000, 1);
        let b = SnowflakeNilId64::from_unix_millis(1_001, 1);
        assert_ne!(a, b);
        assert_eq!(b.timestamp(), a.timestamp() + 1);
        assert_eq!(SnowflakeNilId64::from_template(1_001, SnowflakeNilId64::node_template(1)), b);
    }
}
