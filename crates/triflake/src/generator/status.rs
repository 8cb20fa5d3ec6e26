/// The result of a non-blocking generation attempt.
///
/// Returned by the `poll_*` methods of [`Generator`]. The blocking `next_*`
/// methods are built on the same logic and handle [`IdGenStatus::Pending`]
/// themselves by waiting while still holding the generator's lock.
///
/// # Example
///
/// ```
/// use triflake::{Generator, IdGenStatus, SpinWait, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_700_000_000_000
///     }
/// }
///
/// let generator = Generator::new(1, FixedTime, SpinWait);
/// for _ in 0..4 {
///     assert!(matches!(generator.poll_id64(), IdGenStatus::Ready { .. }));
/// }
/// match generator.poll_id64() {
///     IdGenStatus::Ready { id } => unreachable!("sequence exhausted, got {id}"),
///     IdGenStatus::Pending { wait_past } => assert_eq!(wait_past, 1_700_000_000_000),
/// }
/// ```
///
/// [`Generator`]: crate::Generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus<T> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: T,
    },
    /// No ID could be generated in the current millisecond, either because
    /// its capacity is exhausted or because the clock is behind the last
    /// issued ID.
    ///
    /// Retry once the clock reports a value strictly greater than
    /// `wait_past`.
    Pending {
        /// The millisecond (UNIX time) the clock must move past.
        wait_past: u64,
    },
}

impl<T> IdGenStatus<T> {
    /// Returns the ID if one was generated.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready { id } => Some(id),
            Self::Pending { .. } => None,
        }
    }
}
