//! Monotonic millisecond clocks.
//!
//! All timing in the engine is polled against a [`Clock`]. Production uses
//! [`MonotonicClock`]; tests drive a [`ManualClock`] by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{Duration, Local, NaiveDateTime};

pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin. Never decreases.
    fn now_ms(&self) -> u64;

    /// Local wall-clock time, used only for time-of-day scheduling.
    fn wall_time(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Shared hand-driven clock. Clones observe the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    /// Midnight, 1970-01-01 plus the current reading.
    fn wall_time(&self) -> NaiveDateTime {
        NaiveDateTime::default()
            .checked_add_signed(Duration::milliseconds(self.now_ms() as i64))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(10);
        let other = clock.clone();
        clock.advance(15);
        assert_eq!(other.now_ms(), 25);
        other.set(100);
        assert_eq!(clock.now_ms(), 100);
        clock.set(3_600_000 * 26 + 60_000 * 5);
        let wall = clock.wall_time();
        assert_eq!(wall.format("%Y-%m-%d %H:%M").to_string(), "1970-01-02 02:05");
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }

    #[test]
    fn monotonic_wall_time_is_local() {
        let clock = MonotonicClock::new();
        let drift = clock.wall_time() - Local::now().naive_local();
        assert!(drift.num_seconds().abs() < 5);
    }
}
