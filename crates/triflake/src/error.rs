/// A result type defaulting to the crate's [`enum@Error`].
///
/// Identifier generation is infallible. Only decoding previously encoded
/// identifiers (and converting their timestamps to calendar time) can fail.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `triflake` can produce.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input string was empty.
    #[error("cannot decode an empty string")]
    EmptyInput,

    /// The input contained a byte that is not an ASCII hexadecimal digit.
    #[error("invalid hex digit at index {index} in {input:?}")]
    InvalidHex {
        /// The offending input.
        input: String,
        /// Byte offset of the first invalid character.
        index: usize,
    },

    /// The input is valid hex but does not fit in 64 bits.
    #[error("hex value {input:?} does not fit in 64 bits")]
    HexOverflow {
        /// The offending input.
        input: String,
    },

    /// A 128-bit encoding was too short to hold a timestamp prefix and the
    /// fixed-width low word.
    #[error("encoded id has length {len}, expected more than {min}")]
    InvalidLength {
        /// Length of the input.
        len: usize,
        /// Minimum length (exclusive).
        min: usize,
    },

    /// The timestamp cannot be represented as a calendar date.
    #[error("timestamp {millis}ms is outside the representable date range")]
    TimestampOutOfRange {
        /// The UNIX timestamp in milliseconds.
        millis: u64,
    },
}
