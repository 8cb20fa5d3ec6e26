use crate::{
    IdGenStatus, NodeIdProvider, SnowflakeId64, SnowflakeId128, SnowflakeNilId64, SpinWait,
    SystemClock, TickWait, TimeSource,
};
use core::cmp::Ordering;
use parking_lot::Mutex;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Largest Layout-A sequence value (2-bit field).
const MAX_SEQUENCE_64: u64 = SnowflakeId64::SEQUENCE_MASK;

/// Largest Layout-C sequence value (16-bit field).
const MAX_SEQUENCE_128: u64 = SnowflakeId128::SEQUENCE_MASK;

/// Mutable generator state, shared by all three layouts.
#[derive(Debug)]
struct State {
    /// Absolute UNIX millisecond of the most recently issued ID.
    last_timestamp: u64,
    /// Last sequence number issued within `last_timestamp`.
    sequence: u64,
}

/// Outcome of claiming a slot in the current millisecond.
enum Claim<T> {
    Ready(T),
    WaitPast(u64),
}

impl State {
    /// Claims the next sequence number at `now` for a layout whose sequence
    /// field holds at most `max_sequence`.
    fn claim_sequence(&mut self, now: u64, max_sequence: u64) -> Claim<u64> {
        match now.cmp(&self.last_timestamp) {
            Ordering::Equal => {
                if self.sequence < max_sequence {
                    self.sequence += 1;
                    Claim::Ready(self.sequence)
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(now, max_sequence, "sequence exhausted");
                    Claim::WaitPast(now)
                }
            }
            Ordering::Greater => {
                self.last_timestamp = now;
                self.sequence = 0;
                Claim::Ready(0)
            }
            // Catching up to `last_timestamp` is enough, the sequence then
            // continues from where it left off.
            Ordering::Less => self.cold_clock_behind(now, self.last_timestamp - 1),
        }
    }

    /// Claims the whole millisecond `now` for a layout without a sequence.
    fn claim_millisecond(&mut self, now: u64) -> Claim<()> {
        match now.cmp(&self.last_timestamp) {
            Ordering::Greater => {
                self.last_timestamp = now;
                Claim::Ready(())
            }
            Ordering::Equal => Claim::WaitPast(now),
            Ordering::Less => self.cold_clock_behind(now, self.last_timestamp),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind<T>(&self, _now: u64, wait_past: u64) -> Claim<T> {
        #[cfg(feature = "tracing")]
        tracing::warn!(
            now = _now,
            last_timestamp = self.last_timestamp,
            "clock moved backwards, waiting for it to catch up"
        );
        Claim::WaitPast(wait_past)
    }
}

/// A lock-based Snowflake ID generator issuing three identifier layouts.
///
/// - [`SnowflakeId64`]: 41-bit timestamp, 21-bit node ID, 2-bit sequence.
/// - [`SnowflakeNilId64`]: 41-bit timestamp, 23-bit node ID, no sequence.
/// - [`SnowflakeId128`]: 64-bit timestamp, 48-bit node ID, 16-bit sequence.
///
/// All layouts share one [`parking_lot::Mutex`] guarding the last issued
/// timestamp and the sequence counter. The sequenced layouts share the
/// counter, so interleaving them within one millisecond spends the same
/// capacity.
///
/// When a millisecond is exhausted (or the clock reads earlier than the last
/// issued ID) the blocking `next_*` methods call the [`TickWait`] strategy
/// **while holding the lock**, so no other thread can issue in the exhausted
/// millisecond. The `poll_*` methods return [`IdGenStatus::Pending`] instead.
///
/// Cloning a generator yields another handle to the same state.
///
/// # Example
///
/// ```
/// use triflake::{Generator, extract_timestamp};
///
/// let generator = Generator::with_node_id(5);
/// let id = generator.next_id64();
/// assert_eq!(id.node_id(), 5);
/// assert_eq!(extract_timestamp(id.to_raw()), id.unix_millis());
/// ```
#[derive(Debug)]
pub struct Generator<T = SystemClock, W = SpinWait>
where
    T: TimeSource<u64>,
    W: TickWait,
{
    node_id: u64,
    template64: u64,
    template64_nil: u64,
    template128: u64,
    state: Arc<Mutex<State>>,
    clock: T,
    wait: W,
}

impl Generator<SystemClock, SpinWait> {
    /// Creates a generator reading the system wall clock and spinning at
    /// millisecond boundaries.
    pub fn with_node_id(node_id: u64) -> Self {
        Self::new(node_id, SystemClock, SpinWait)
    }
}

impl<T, W> Generator<T, W>
where
    T: TimeSource<u64>,
    W: TickWait,
{
    /// Creates a generator for `node_id`.
    ///
    /// The node ID is truncated independently to each layout's field width
    /// (21, 23 and 48 bits). It must be unique among generators sharing a
    /// layout, or their IDs may collide. Zero is accepted.
    ///
    /// # Parameters
    ///
    /// - `node_id`: identity of this generator.
    /// - `clock`: a [`TimeSource`] reporting absolute UNIX milliseconds.
    /// - `wait`: how to block until the next millisecond.
    pub fn new(node_id: u64, clock: T, wait: W) -> Self {
        Self::from_components(node_id, 0, 0, clock, wait)
    }

    /// Creates a generator whose node ID comes from `provider`.
    pub fn from_provider(provider: &impl NodeIdProvider, clock: T, wait: W) -> Self {
        Self::new(provider.node_id(), clock, wait)
    }

    /// Creates a generator from explicit state.
    ///
    /// `last_timestamp` is the absolute UNIX millisecond of the most recently
    /// issued ID and `sequence` the last sequence number issued in it. In
    /// typical use cases, prefer [`Self::new`].
    pub fn from_components(
        node_id: u64,
        last_timestamp: u64,
        sequence: u64,
        clock: T,
        wait: W,
    ) -> Self {
        Self {
            node_id,
            template64: SnowflakeId64::node_template(node_id),
            template64_nil: SnowflakeNilId64::node_template(node_id),
            template128: SnowflakeId128::node_template(node_id),
            state: Arc::new(Mutex::new(State {
                last_timestamp,
                sequence,
            })),
            clock,
            wait,
        }
    }

    /// The node ID this generator was created with, before truncation.
    pub fn node_id(&self) -> u64 {
        self.node_id
    }

    /// The time source this generator reads. Useful to check a mock clock
    /// or to timestamp related events on the same clock.
    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// Generates a [`SnowflakeId64`], blocking until the next millisecond if
    /// the current one has already issued four.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id64(&self) -> SnowflakeId64 {
        let mut state = self.state.lock();
        loop {
            let now = self.clock.current_millis();
            match state.claim_sequence(now, MAX_SEQUENCE_64) {
                Claim::Ready(sequence) => {
                    return SnowflakeId64::from_template(now, self.template64, sequence);
                }
                Claim::WaitPast(millis) => self.wait.wait_past(&self.clock, millis),
            }
        }
    }

    /// Non-blocking counterpart of [`Self::next_id64`].
    pub fn poll_id64(&self) -> IdGenStatus<SnowflakeId64> {
        let (now, claim) = {
            let mut state = self.state.lock();
            let now = self.clock.current_millis();
            (now, state.claim_sequence(now, MAX_SEQUENCE_64))
        };
        match claim {
            Claim::Ready(sequence) => IdGenStatus::Ready {
                id: SnowflakeId64::from_template(now, self.template64, sequence),
            },
            Claim::WaitPast(wait_past) => IdGenStatus::Pending { wait_past },
        }
    }

    /// [`Self::next_id64`] as unpadded lowercase hex.
    pub fn next_id64_hex(&self) -> String {
        self.next_id64().to_hex()
    }

    /// [`Self::next_id64`] as unpadded binary.
    pub fn next_id64_bin(&self) -> String {
        self.next_id64().to_bin()
    }

    /// Generates a [`SnowflakeNilId64`]. Without a sequence field each
    /// millisecond holds a single ID, so back-to-back calls block until the
    /// next millisecond.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_nil_id64(&self) -> SnowflakeNilId64 {
        let mut state = self.state.lock();
        loop {
            let now = self.clock.current_millis();
            match state.claim_millisecond(now) {
                Claim::Ready(()) => {
                    return SnowflakeNilId64::from_template(now, self.template64_nil);
                }
                Claim::WaitPast(millis) => self.wait.wait_past(&self.clock, millis),
            }
        }
    }

    /// Non-blocking counterpart of [`Self::next_nil_id64`].
    pub fn poll_nil_id64(&self) -> IdGenStatus<SnowflakeNilId64> {
        let (now, claim) = {
            let mut state = self.state.lock();
            let now = self.clock.current_millis();
            (now, state.claim_millisecond(now))
        };
        match claim {
            Claim::Ready(()) => IdGenStatus::Ready {
                id: SnowflakeNilId64::from_template(now, self.template64_nil),
            },
            Claim::WaitPast(wait_past) => IdGenStatus::Pending { wait_past },
        }
    }

    pub fn next_nil_id64_hex(&self) -> String {
        self.next_nil_id64().to_hex()
    }

    pub fn next_nil_id64_bin(&self) -> String {
        self.next_nil_id64().to_bin()
    }

    /// Generates a [`SnowflakeId128`], blocking until the next millisecond if
    /// the current one has already issued 65536.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id128(&self) -> SnowflakeId128 {
        let mut state = self.state.lock();
        loop {
            let now = self.clock.current_millis();
            match state.claim_sequence(now, MAX_SEQUENCE_128) {
                Claim::Ready(sequence) => {
                    return SnowflakeId128::from_parts(now, self.template128 | sequence);
                }
                Claim::WaitPast(millis) => self.wait.wait_past(&self.clock, millis),
            }
        }
    }

    /// Non-blocking counterpart of [`Self::next_id128`].
    pub fn poll_id128(&self) -> IdGenStatus<SnowflakeId128> {
        let (now, claim) = {
            let mut state = self.state.lock();
            let now = self.clock.current_millis();
            (now, state.claim_sequence(now, MAX_SEQUENCE_128))
        };
        match claim {
            Claim::Ready(sequence) => IdGenStatus::Ready {
                id: SnowflakeId128::from_parts(now, self.template128 | sequence),
            },
            Claim::WaitPast(wait_past) => IdGenStatus::Pending { wait_past },
        }
    }

    /// [`Self::next_id128`] as hex, low word zero-padded to 16 digits.
    pub fn next_id128_hex(&self) -> String {
        self.next_id128().to_hex()
    }

    /// [`Self::next_id128`] as binary, low word zero-padded to 64 digits.
    pub fn next_id128_bin(&self) -> String {
        self.next_id128().to_bin()
    }
}

impl<T, W> Clone for Generator<T, W>
where
    T: TimeSource<u64> + Clone,
    W: TickWait + Clone,
{
    fn clone(&self) -> Self {
        Self {
            node_id: self.node_id,
            template64: self.template64,
            template64_nil: self.template64_nil,
            template128: self.template128,
            state: Arc::clone(&self.state),
            clock: self.clock.clone(),
            wait: self.wait.clone(),
        }
    }
}
