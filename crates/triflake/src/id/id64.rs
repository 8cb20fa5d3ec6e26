use crate::{Result, Snowflake, TRIFLAKE_EPOCH_MILLIS, parse_hex_u64};
use core::fmt;

/// A 64-bit sequenced Snowflake ID.
///
/// - 41 bits timestamp (ms since [`TRIFLAKE_EPOCH`])
/// - 21 bits node ID
/// - 2 bits sequence (up to 4 IDs per millisecond per node)
///
/// ```text
///  Bit Index:  63             23 22            2 1             0
///              +----------------+---------------+--------------+
///  Field:      | timestamp (41) | node ID (21)  | sequence (2) |
///              +----------------+---------------+--------------+
///              |<----- MSB ---------- 64 bits -------- LSB --->|
/// ```
///
/// [`TRIFLAKE_EPOCH`]: crate::TRIFLAKE_EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId64 {
    id: u64,
}

impl SnowflakeId64 {
    /// Bitmask for the 41-bit timestamp field. Occupies bits 23 through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << 41) - 1;

    /// Bitmask for the 21-bit node ID field. Occupies bits 2 through 22.
    pub const NODE_ID_MASK: u64 = (1 << 21) - 1;

    /// Bitmask for the 2-bit sequence field. Occupies bits 0 through 1.
    pub const SEQUENCE_MASK: u64 = (1 << 2) - 1;

    /// Number of bits to shift the timestamp to its position (bit 23).
    pub const TIMESTAMP_SHIFT: u64 = 23;

    /// Number of bits to shift the node ID to its position (bit 2).
    pub const NODE_ID_SHIFT: u64 = 2;

    /// Packs an epoch-relative timestamp, node ID and sequence. Each component
    /// is truncated to its field width.
    pub const fn from(timestamp: u64, node_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        Self {
            id: timestamp | Self::node_template(node_id) | (sequence & Self::SEQUENCE_MASK),
        }
    }

    /// Packs an absolute UNIX millisecond timestamp.
    ///
    /// The epoch offset is taken modulo 2^41, so times before the epoch wrap
    /// into the top of the timestamp field instead of collapsing onto one
    /// value. Distinct milliseconds always yield distinct timestamp fields
    /// within a 2^41 ms window.
    pub const fn from_unix_millis(millis: u64, node_id: u64, sequence: u64) -> Self {
        Self::from(epoch_offset(millis), node_id, sequence)
    }

    /// The node ID bits shifted into position, ready to be OR-ed with a
    /// timestamp and sequence.
    pub(crate) const fn node_template(node_id: u64) -> u64 {
        (node_id & Self::NODE_ID_MASK) << Self::NODE_ID_SHIFT
    }

    /// Assembles an ID from a precomputed [`Self::node_template`].
    pub(crate) const fn from_template(millis: u64, template: u64, sequence: u64) -> Self {
        let offset = epoch_offset(millis) & Self::TIMESTAMP_MASK;
        Self {
            id: (offset << Self::TIMESTAMP_SHIFT) | template | sequence,
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
        (self.id >> Self::NODE_ID_SHIFT) & Self::NODE_ID_MASK
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u64 {
        self.id & Self::SEQUENCE_MASK
    }

    /// Lowercase hex without padding.
    pub fn to_hex(&self) -> String {
        format!("{:x}", self.id)
    }

    /// Binary digits without padding.
    pub fn to_bin(&self) -> String {
        format!("{:b}", self.id)
    }

    /// Decodes an ID from hex (any width up to 16 digits, either case).
    ///
    /// # Errors
    ///
    /// Returns an error if `input` is empty, contains a non-hex byte, or does
    /// not fit in 64 bits.
    pub fn from_hex(input: &str) -> Result<Self> {
        parse_hex_u64(input).map(Self::from_raw)
    }
}

/// Offset of `millis` from [`TRIFLAKE_EPOCH_MILLIS`], wrapping below it.
pub(crate) const fn epoch_offset(millis: u64) -> u64 {
    millis.wrapping_sub(TRIFLAKE_EPOCH_MILLIS)
}

impl Snowflake for SnowflakeId64 {
    const NODE_ID_BITS: u32 = 21;
    const SEQUENCE_BITS: u32 = 2;

    fn unix_millis(&self) -> u64 {
        self.unix_millis()
    }

    fn node_id(&self) -> u64 {
        self.node_id()
    }

    fn sequence(&self) -> u64 {
        self.sequence()
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

impl From<SnowflakeId64> for u64 {
    fn from(id: SnowflakeId64) -> Self {
        id.to_raw()
    }
}

impl fmt::Display for SnowflakeId64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId64")
            .field("raw", &format_args!("{:#018x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("node_id", &self.node_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_reference_example() {
        let id = SnowflakeId64::from_unix_millis(TRIFLAKE_EPOCH_MILLIS + 10, 5, 0);
        assert_eq!(id.to_raw(), 83_886_100);
        assert_eq!(id.to_hex(), "5000014");
        assert_eq!(id.timestamp(), 10);
        assert_eq!(id.unix_millis(), 1_456_790_400_010);
        assert_eq!(id.node_id(), 5);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    fn fields_are_masked_to_their_width() {
        let id = SnowflakeId64::from(
            SnowflakeId64::TIMESTAMP_MASK,
            SnowflakeId64::NODE_ID_MASK,
            SnowflakeId64::SEQUENCE_MASK,
        );
        assert_eq!(id.to_raw(), u64::MAX);

        let id = SnowflakeId64::from(1, SnowflakeId64::NODE_ID_MASK + 2, 7);
        assert_eq!(id.node_id(), 1);
        assert_eq!(id.sequence(), 3);
        assert_eq!(id.timestamp(), 1);
    }

    #[test]
    fn template_assembly_matches_from() {
        let millis = TRIFLAKE_EPOCH_MILLIS + 123_456;
        let template = SnowflakeId64::node_template(999);
        assert_eq!(
            SnowflakeId64::from_template(millis, template, 2),
            SnowflakeId64::from_unix_millis(millis, 999, 2)
        );
    }

    #[test]
    fn pre_epoch_timestamps_stay_distinct() {
        let a = SnowflakeId64::from_unix_millis(1_000, 1, 0);
        let b = SnowflakeId64::from_unix_millis(1_001, 1, 0);
        assert_ne!(a, b);
        assert_eq!(b.timestamp(), a.timestamp() + 1);
        assert_eq!(
            a.timestamp(),
            1_000u64.wrapping_sub(TRIFLAKE_EPOCH_MILLIS) & SnowflakeId64::TIMESTAMP_MASK
        );
        assert_eq!(SnowflakeId64::from_template(1_000, SnowflakeId64::node_template(1), 0), a);
    }

    #[test]
    fn binary_encoding_is_unpadded() {
        let id = SnowflakeId64::from_raw(0b1011);
        assert_eq!(id.to_bin(), "1011");
        assert_eq!(SnowflakeId64::from_raw(0).to_hex(), "0");
    }

    #[test]
    fn hex_decodes_uppercase() {
        let id = SnowflakeId64::from_hex("a00002f").unwrap();
        assert_eq!(SnowflakeId64::from_hex("A00002F").unwrap(), id);
        assert_eq!(id.timestamp(), 20);
        assert_eq!(id.node_id(), 11);
        assert_eq!(id.sequence(), 3);
    }

    #[test]
    fn ordering_follows_timestamp() {
        let earlier = SnowflakeId64::from(10, SnowflakeId64::NODE_ID_MASK, 3);
        let later = SnowflakeId64::from(11, 0, 0);
        assert!(earlier < later);
    }

    #[test]
    fn debug_shows_fields() {
        let id = SnowflakeId64::from(10, 5, 1);
        let debug = format!("{id:?}");
        assert!(debug.contains("timestamp: 10"));
        assert!(debug.contains("node_id: 5"));
        assert!(debug.contains("sequence: 1"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_bare_integer() {
        let id = SnowflakeId64::from(10, 5, 0);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "83886100");
        let back: SnowflakeId64 = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
