//! Pluggable wait behavior for reader and writer spin points.
//!
//! The core's wait points (a reader with nothing new to consume, a writer
//! with no free capacity) never block on a condition variable — only
//! spin/yield/sleep-with-backoff strategies are offered here. A strategy
//! is told how many consecutive empty iterations have occurred so it can
//! escalate; it is reset to zero the moment real work is found.

use std::thread;
use std::time::Duration;

/// A wait strategy for a single spin point.
///
/// `idle(n)` is called once per empty iteration, where `n` is the count
/// of consecutive empty iterations observed so far at this call site
/// (starting at `0`). Implementations must not block indefinitely in a
/// way that cannot be interrupted by the caller's own loop condition —
/// each call should return in bounded time.
pub trait IdleStrategy: Send + Sync {
    fn idle(&self, consecutive_idle_count: u64);
}

/// Never yields the CPU. Lowest latency, highest CPU usage; the default
/// for both readers and writers, matching the spin-only behavior the
/// core's algorithms were originally specified against.
#[derive(Debug, Default, Clone, Copy)]
pub struct BusySpinIdleStrategy;

impl IdleStrategy for BusySpinIdleStrategy {
    #[inline]
    fn idle(&self, _consecutive_idle_count: u64) {
        std::hint::spin_loop();
    }
}

/// Yields to the scheduler every iteration. Lower CPU usage than
/// busy-spin at the cost of scheduler-latency jitter.
#[derive(Debug, Default, Clone, Copy)]
pub struct YieldingIdleStrategy;

impl IdleStrategy for YieldingIdleStrategy {
    #[inline]
    fn idle(&self, _consecutive_idle_count: u64) {
        thread::yield_now();
    }
}

/// Spins briefly, then yields, then sleeps with a capped linear backoff.
/// Intended for background or low-priority pipeline stages where latency
/// matters less than leaving CPU for other work.
#[derive(Debug, Clone, Copy)]
pub struct SleepingIdleStrategy {
    spin_threshold: u64,
    yield_threshold: u64,
    max_sleep: Duration,
}

impl Default for SleepingIdleStrategy {
    fn default() -> Self {
        Self {
            spin_threshold: 100,
            yield_threshold: 200,
            max_sleep: Duration::from_micros(500),
        }
    }
}

impl IdleStrategy for SleepingIdleStrategy {
    fn idle(&self, consecutive_idle_count: u64) {
        if consecutive_idle_count < self.spin_threshold {
            std::hint::spin_loop();
        } else if consecutive_idle_count < self.yield_threshold {
            thread::yield_now();
        } else {
            let backoff = consecutive_idle_count - self.yield_threshold + 1;
            let sleep = Duration::from_nanos(backoff.saturating_mul(1_000)).min(self.max_sleep);
            thread::sleep(sleep);
        }
    }
}
