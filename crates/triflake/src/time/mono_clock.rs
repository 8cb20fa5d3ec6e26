use crate::{TimeSource, UNIX_EPOCH};
use core::time::Duration;
use std::{
    sync::{
        Arc, Weak,
        atomic::{AtomicU64, Ordering},
    },
    thread,
    time::{Instant, SystemTime},
};

#[derive(Debug)]
struct Ticker {
    /// Whole milliseconds elapsed since the clock was anchored.
    elapsed: AtomicU64,
}

/// A time source that never goes backward.
///
/// At construction the clock samples the wall clock once to compute its
/// offset from `epoch`; after that it only advances with a monotonic timer
/// ([`Instant`]). A background thread publishes the elapsed milliseconds into
/// a shared atomic so reads on the hot path are a single load.
///
/// The ticker thread exits once every handle to the clock has been dropped.
///
/// Because generators compare timestamps for equality, a clock that cannot
/// regress keeps them from ever blocking on a clock step.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    ticker: Arc<Ticker>,
    offset: u64,
}

impl Default for MonotonicClock {
    /// Constructs a clock reporting absolute UNIX milliseconds, which is what
    /// [`Generator`] expects.
    ///
    /// [`Generator`]: crate::Generator
    fn default() -> Self {
        Self::with_epoch(UNIX_EPOCH)
    }
}

impl MonotonicClock {
    /// Constructs a monotonic clock whose zero point is `epoch` (a duration
    /// since 1970-01-01 UTC).
    ///
    /// [`Generator`] expects absolute UNIX milliseconds, so a clock built
    /// with any epoch other than [`UNIX_EPOCH`] is for callers measuring time
    /// on their own; use [`MonotonicClock::default`] for generators.
    ///
    /// [`Generator`]: crate::Generator
    ///
    /// # Panics
    ///
    /// Panics if the system clock reads earlier than `epoch`.
    ///
    /// # Example
    ///
    /// ```
    /// use triflake::{Generator, MonotonicClock, SpinWait, TimeSource, TRIFLAKE_EPOCH};
    ///
    /// // Milliseconds since the 64-bit layouts' epoch, for display only.
    /// let since_epoch = MonotonicClock::with_epoch(TRIFLAKE_EPOCH);
    /// let a: u64 = since_epoch.current_millis();
    /// std::thread::sleep(std::time::Duration::from_millis(3));
    /// assert!(since_epoch.current_millis() >= a);
    ///
    /// // Generators take a UNIX-epoch clock.
    /// let generator = Generator::new(1, MonotonicClock::default(), SpinWait);
    /// assert!(generator.next_id64().unix_millis() > a);
    /// ```
    pub fn with_epoch(epoch: Duration) -> Self {
        let anchor = Instant::now();
        let since_unix = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .expect("system clock before UNIX epoch");
        let offset = since_unix
            .checked_sub(epoch)
            .expect("system clock before requested epoch")
            .as_millis() as u64;

        let ticker = Arc::new(Ticker {
            elapsed: AtomicU64::new(0),
        });
        let weak = Arc::downgrade(&ticker);
        thread::Builder::new()
            .name("triflake-ticker".into())
            .spawn(move || run_ticker(&weak, anchor))
            .expect("failed to spawn clock ticker thread");

        Self { ticker, offset }
    }
}

fn run_ticker(ticker: &Weak<Ticker>, anchor: Instant) {
    let mut next_tick = 1;
    loop {
        let deadline = anchor + Duration::from_millis(next_tick);
        let now = Instant::now();
        if deadline > now {
            thread::sleep(deadline - now);
        }

        let Some(ticker) = ticker.upgrade() else {
            return;
        };
        let elapsed = anchor.elapsed().as_millis() as u64;
        // fetch_max keeps the published value monotonic even if the store
        // races a slow wakeup
        ticker.elapsed.fetch_max(elapsed, Ordering::Release);
        next_tick = elapsed + 1;
    }
}

impl TimeSource<u64> for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.offset + self.ticker.elapsed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SystemClock, TRIFLAKE_EPOCH};

    #[test]
    fn default_clock_tracks_unix_time() {
        let wall = SystemClock.current_millis();
        let mono = MonotonicClock::default().current_millis();
        assert!(mono.abs_diff(wall) < 1_000);
    }

    #[test]
    fn clock_never_goes_backward() {
        let clock = MonotonicClock::with_epoch(TRIFLAKE_EPOCH);
        let mut last = clock.current_millis();
        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn clock_advances() {
        let clock = MonotonicClock::default();
        let start = clock.current_millis();
        thread::sleep(Duration::from_millis(20));
        assert!(clock.current_millis() > start);
    }
}
