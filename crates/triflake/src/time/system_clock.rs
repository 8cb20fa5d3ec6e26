use crate::TimeSource;
use std::time::{SystemTime, UNIX_EPOCH};

/// A wall-clock time source reading [`SystemTime::now`] on every call.
///
/// This reflects adjustments made to the system clock (NTP steps, manual
/// changes), so it can go backward. Generators tolerate that by blocking until
/// the clock catches up; use [`MonotonicClock`] to avoid it entirely.
///
/// A system clock set before 1970 reads as `0`.
///
/// [`MonotonicClock`]: crate::MonotonicClock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource<u64> for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}
