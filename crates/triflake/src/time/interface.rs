use core::time::Duration;

/// Reference point for the 64-bit layouts: Tuesday, March 1, 2016 00:00:00
/// UTC.
pub const TRIFLAKE_EPOCH: Duration = Duration::from_millis(TRIFLAKE_EPOCH_MILLIS);

/// [`TRIFLAKE_EPOCH`] expressed in milliseconds since the UNIX epoch.
pub const TRIFLAKE_EPOCH_MILLIS: u64 = 1_456_790_400_000;

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC.
pub const UNIX_EPOCH: Duration = Duration::from_millis(0);

/// A trait for time sources that return a monotonic or wall-clock timestamp.
///
/// This abstraction allows you to plug in a real system clock, a monotonic
/// timer, or a mocked time source in tests.
///
/// Generators in this crate consume `TimeSource<u64>` and expect **absolute**
/// UNIX milliseconds; the epoch offset of the 64-bit layouts is applied when
/// the identifier is assembled.
///
/// # Example
///
/// ```
/// use triflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> T;
}

impl<T, S> TimeSource<T> for &S
where
    S: TimeSource<T> + ?Sized,
{
    fn current_millis(&self) -> T {
        (**self).current_millis()
    }
}
