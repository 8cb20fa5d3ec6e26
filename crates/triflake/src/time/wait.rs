use crate::TimeSource;
use core::time::Duration;
use std::thread;

/// Blocks the calling thread until a clock moves past a given millisecond.
///
/// Generators call this while holding their lock when a millisecond's
/// capacity is exhausted or the clock reports a time earlier than the last
/// issued identifier. Implementations may busy-poll or sleep, but must not
/// return before `clock.current_millis() > millis`.
pub trait TickWait {
    /// Blocks until `clock` reports a value strictly greater than `millis`.
    fn wait_past<T: TimeSource<u64>>(&self, clock: &T, millis: u64);
}

impl<W> TickWait for &W
where
    W: TickWait + ?Sized,
{
    fn wait_past<T: TimeSource<u64>>(&self, clock: &T, millis: u64) {
        (**self).wait_past(clock, millis);
    }
}

/// Busy-polls the clock, yielding the thread after a short burst of spins.
///
/// This gives the lowest latency at a millisecond boundary and is the default
/// for [`Generator::with_node_id`].
///
/// [`Generator::with_node_id`]: crate::Generator::with_node_id
#[derive(Clone, Copy, Debug, Default)]
pub struct SpinWait;

impl SpinWait {
    const SPINS_BEFORE_YIELD: u32 = 64;
}

impl TickWait for SpinWait {
    fn wait_past<T: TimeSource<u64>>(&self, clock: &T, millis: u64) {
        let mut spins = 0;
        while clock.current_millis() <= millis {
            if spins < Self::SPINS_BEFORE_YIELD {
                core::hint::spin_loop();
                spins += 1;
            } else {
                thread::yield_now();
            }
        }
    }
}

/// Sleeps for the remaining whole milliseconds and re-checks the clock.
///
/// Cheaper on CPU than [`SpinWait`] at the cost of overshooting the boundary
/// by up to the scheduler's sleep granularity. Under sustained overflow this
/// trades throughput for idle cores.
#[derive(Clone, Copy, Debug, Default)]
pub struct SleepWait;

impl TickWait for SleepWait {
    fn wait_past<T: TimeSource<u64>>(&self, clock: &T, millis: u64) {
        loop {
            let now = clock.current_millis();
            if now > millis {
                return;
            }
            thread::sleep(Duration::from_millis(millis - now + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SystemClock;
    use std::time::Instant;

    fn assert_waits_past<W: TickWait>(wait: W) {
        let clock = SystemClock;
        for _ in 0..5 {
            let now = clock.current_millis();
            wait.wait_past(&clock, now);
            assert!(clock.current_millis() > now);
        }
    }

    #[test]
    fn spin_wait_returns_after_boundary() {
        assert_waits_past(SpinWait);
    }

    #[test]
    fn sleep_wait_returns_after_boundary() {
        assert_waits_past(SleepWait);
    }

    #[test]
    fn wait_past_earlier_millisecond_returns_immediately() {
        let clock = SystemClock;
        let start = Instant::now();
        SleepWait.wait_past(&clock, 0);
        SpinWait.wait_past(&clock, 0);
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
