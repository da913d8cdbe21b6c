//! Cooperative stop signaling.
//!
//! Workers check the token at the top of every loop iteration and exit
//! cleanly within one iteration of the signal being raised, never while
//! holding a lock. Pauses between iterations go through
//! [`StopToken::pause`], which a stop request wakes immediately, so no
//! worker is ever stuck in an uninterruptible sleep.

use std::{
    sync::{Arc, Condvar, Mutex, PoisonError},
    time::{Duration, Instant},
};

#[derive(Debug, Default)]
struct StopShared {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

/// Owning side of a stop signal.
#[derive(Debug, Default)]
pub struct StopSource {
    shared: Arc<StopShared>,
}

impl StopSource {
    /// Create an unraised stop signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token workers poll and pause on.
    pub fn token(&self) -> StopToken {
        StopToken { shared: Arc::clone(&self.shared) }
    }

    /// Raise the signal, waking every paused worker.
    pub fn request_stop(&self) {
        let mut stopped = self.shared.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        drop(stopped);
        self.shared.condvar.notify_all();
    }

    /// Whether the signal has been raised.
    pub fn is_stopped(&self) -> bool {
        *self.shared.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Worker-side view of a stop signal.
#[derive(Debug, Clone)]
pub struct StopToken {
    shared: Arc<StopShared>,
}

impl StopToken {
    /// Whether stop has been requested.
    pub fn should_stop(&self) -> bool {
        *self.shared.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pause for `interval` or until stop is requested, whichever comes
    /// first. Returns `true` when stop was requested.
    pub fn pause(&self, interval: Duration) -> bool {
        let mut stopped = self.shared.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        if *stopped {
            return true;
        }
        if interval.is_zero() {
            return false;
        }

        let deadline = Instant::now() + interval;
        while !*stopped {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (next, _timeout) = self
                .shared
                .condvar
                .wait_timeout(stopped, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            stopped = next;
        }
        true
    }
}
