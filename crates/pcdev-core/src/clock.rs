//! Clock abstraction for injectable time.
//!
//! The `Clock` trait decouples the harness and driver from wall-clock time
//! so that pacing and timer behavior stay testable without real delays. The
//! production implementation is a thin shim over `std::time`; tests use
//! [`ManualClock`] and advance time explicitly.
//!
//! # Invariants
//!
//! - Monotonicity: `now()` never goes backwards within one clock instance.
//! - Isolation: implementations share no global state.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// Source of monotonic time and blocking sleeps.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Current monotonic time.
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`.
    ///
    /// Only pacing code should call this; anything that must remain
    /// cancelable waits on a stop token instead.
    fn sleep(&self, duration: Duration);
}

/// Production clock over `std::time::Instant` and `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Test clock advanced by hand; `sleep` advances it instead of blocking.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Create a manual clock anchored at the current instant.
    pub fn new() -> Self {
        Self { inner: Arc::new(Mutex::new(Instant::now())) }
    }

    /// Advance the clock by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        *now += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sleep(&self, duration: Duration) {
        // Virtual time: a sleep completes instantly by advancing the clock.
        self.advance(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_advances() {
        let clock = SystemClock::new();
        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.now() > t1);
    }

    #[test]
    fn manual_clock_only_moves_when_advanced() {
        let clock = ManualClock::new();
        let t1 = clock.now();
        assert_eq!(clock.now(), t1);

        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now() - t1, Duration::from_secs(5));
    }

    #[test]
    fn manual_sleep_is_instant_virtual_time() {
        let clock = ManualClock::new();
        let t1 = clock.now();
        let wall = Instant::now();
        clock.sleep(Duration::from_secs(60));
        assert!(wall.elapsed() < Duration::from_secs(1));
        assert_eq!(clock.now() - t1, Duration::from_secs(60));
    }
}
