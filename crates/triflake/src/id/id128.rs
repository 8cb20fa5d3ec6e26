use crate::{Error, Result, Snowflake, id::codec::validate_hex, parse_hex_u64};
use core::fmt;

/// A 128-bit sequenced Snowflake ID, stored as two 64-bit words.
///
/// - 64 bits timestamp (absolute UNIX milliseconds, no epoch offset)
/// - 48 bits node ID
/// - 16 bits sequence (up to 65536 IDs per millisecond per node)
///
/// ```text
///  Bit Index:  127            64 63            16 15             0
///              +----------------+----------------+---------------+
///  Field:      | timestamp (64) |  node ID (48)  | sequence (16) |
///              +----------------+----------------+---------------+
///              |<------ hi ---->|<------------- lo ------------->|
/// ```
///
/// The hex encoding concatenates the unpadded high word with the low word
/// zero-padded to 16 digits, so the last 16 characters are always the low
/// word and everything before them is the timestamp.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId128 {
    hi: u64,
    lo: u64,
}

impl SnowflakeId128 {
    /// Bitmask for the 48-bit node ID field of the low word. Occupies bits 16
    /// through 63.
    pub const NODE_ID_MASK: u64 = (1 << 48) - 1;

    /// Bitmask for the 16-bit sequence field. Occupies bits 0 through 15.
    pub const SEQUENCE_MASK: u64 = (1 << 16) - 1;

    /// Number of bits to shift the node ID within the low word (bit 16).
    pub const NODE_ID_SHIFT: u64 = 16;

    /// Number of hex digits the low word always occupies when encoded.
    pub const LO_HEX_WIDTH: usize = 16;

    /// Number of binary digits the low word always occupies when encoded.
    pub const LO_BIN_WIDTH: usize = 64;

    /// Packs an absolute millisecond timestamp, node ID and sequence.
    pub const fn from(timestamp: u64, node_id: u64, sequence: u64) -> Self {
        Self {
            hi: timestamp,
            lo: Self::node_template(node_id) | (sequence & Self::SEQUENCE_MASK),
        }
    }

    pub(crate) const fn node_template(node_id: u64) -> u64 {
        (node_id & Self::NODE_ID_MASK) << Self::NODE_ID_SHIFT
    }

    /// Builds an ID from its raw `(hi, lo)` words.
    pub const fn from_parts(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    /// Returns the raw `(hi, lo)` words.
    pub const fn to_parts(&self) -> (u64, u64) {
        (self.hi, self.lo)
    }

    pub const fn from_u128(raw: u128) -> Self {
        Self {
            hi: (raw >> 64) as u64,
            lo: raw as u64,
        }
    }

    pub const fn to_u128(&self) -> u128 {
        ((self.hi as u128) << 64) | self.lo as u128
    }

    /// The timestamp word, in UNIX milliseconds.
    pub const fn timestamp(&self) -> u64 {
        self.hi
    }

    pub const fn node_id(&self) -> u64 {
        (self.lo >> Self::NODE_ID_SHIFT) & Self::NODE_ID_MASK
    }

    pub const fn sequence(&self) -> u64 {
        self.lo & Self::SEQUENCE_MASK
    }

    /// Unpadded hex of the high word followed by the low word padded to 16
    /// digits.
    ///
    /// ```
    /// use triflake::SnowflakeId128;
    ///
    /// let id = SnowflakeId128::from_parts(0xabc, 0);
    /// assert_eq!(id.to_hex(), "abc0000000000000000");
    /// ```
    pub fn to_hex(&self) -> String {
        format!("{:x}{:016x}", self.hi, self.lo)
    }

    /// Unpadded binary of the high word followed by the low word padded to 64
    /// digits.
    pub fn to_bin(&self) -> String {
        format!("{:b}{:064b}", self.hi, self.lo)
    }

    /// Decodes the format produced by [`Self::to_hex`].
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] / [`Error::InvalidHex`] for malformed input
    /// - [`Error::InvalidLength`] if there is no timestamp prefix before the
    ///   16-digit low word
    /// - [`Error::HexOverflow`] if the prefix does not fit in 64 bits
    pub fn from_hex(input: &str) -> Result<Self> {
        let (hi, lo) = split_hex(input)?;
        Ok(Self {
            hi: parse_hex_u64(hi)?,
            lo: parse_hex_u64(lo)?,
        })
    }

    /// Recovers only the timestamp word from an encoded ID, leaving the low
    /// word unparsed beyond validation.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_hex`].
    pub fn timestamp_from_hex(input: &str) -> Result<u64> {
        let (hi, _) = split_hex(input)?;
        parse_hex_u64(hi)
    }
}

/// Splits an encoded 128-bit ID into its timestamp prefix and fixed-width low
/// word. The whole input is validated as ASCII hex first, so the split always
/// lands on a character boundary.
fn split_hex(input: &str) -> Result<(&str, &str)> {
    validate_hex(input)?;
    if input.len() <= SnowflakeId128::LO_HEX_WIDTH {
        return Err(Error::InvalidLength {
            len: input.len(),
            min: SnowflakeId128::LO_HEX_WIDTH,
        });
    }
    Ok(input.split_at(input.len() - SnowflakeId128::LO_HEX_WIDTH))
}

impl Snowflake for SnowflakeId128 {
    const NODE_ID_BITS: u32 = 48;
    const SEQUENCE_BITS: u32 = 16;

    fn unix_millis(&self) -> u64 {
        self.timestamp()
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

impl From<SnowflakeId128> for u128 {
    fn from(id: SnowflakeId128) -> Self {
        id.to_u128()
    }
}

impl From<SnowflakeId128> for (u64, u64) {
    fn from(id: SnowflakeId128) -> Self {
        id.to_parts()
    }
}

impl fmt::Display for SnowflakeId128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}{:016x}", self.hi, self.lo)
    }
}

impl fmt::Debug for SnowflakeId128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId128")
            .field("hi", &format_args!("{:#018x}", self.hi))
            .field("lo", &format_args!("{:#018x}", self.lo))
            .field("timestamp", &self.timestamp())
            .field("node_id", &self.node_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
