//! Event gate: predicate wait/signal with cancellation.
//!
//! A waiter blocks until the signal flag is set, then clears it before
//! returning; one signal releases one waiter. The flag latches: a signal
//! sent with no waiter present is consumed by the next `wait`. Spurious
//! wake-ups are tolerated by re-checking the flag after every wake; the
//! contract is "wake implies check", never "wake implies true".

use std::{
    sync::{Condvar, Mutex, PoisonError},
    time::Duration,
};

use crate::error::WaitError;

#[derive(Debug, Default)]
struct GateState {
    signaled: bool,
    cancelled: bool,
}

/// Latched condition gate over shared state.
#[derive(Debug, Default)]
pub struct EventGate {
    state: Mutex<GateState>,
    condvar: Condvar,
}

impl EventGate {
    /// Create an unsignaled gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch the signal and wake one waiter.
    ///
    /// Not an error when no waiter is present; the latch holds the signal
    /// for the next `wait`.
    pub fn signal(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.signaled = true;
        drop(state);
        self.condvar.notify_one();
    }

    /// Cancel the gate, waking every waiter with [`WaitError::Cancelled`].
    ///
    /// Cancellation does not require a signal to arrive first and is
    /// permanent: later waits fail immediately.
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.cancelled = true;
        drop(state);
        self.condvar.notify_all();
    }

    /// Whether the gate has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).cancelled
    }

    /// Block until signaled, clearing the signal before returning.
    pub fn wait(&self) -> Result<(), WaitError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if state.cancelled {
                return Err(WaitError::Cancelled);
            }
            if state.signaled {
                state.signaled = false;
                return Ok(());
            }
            state = self.condvar.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Like [`wait`](Self::wait) with an upper bound on blocking.
    ///
    /// Returns `Ok(true)` when signaled, `Ok(false)` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> Result<bool, WaitError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let mut remaining = timeout;
        loop {
            if state.cancelled {
                return Err(WaitError::Cancelled);
            }
            if state.signaled {
                state.signaled = false;
                return Ok(true);
            }
            if remaining.is_zero() {
                return Ok(false);
            }

            let start = std::time::Instant::now();
            let (next, result) = self
                .condvar
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner);
            state = next;
            if result.timed_out() {
                remaining = Duration::ZERO;
            } else {
                remaining = remaining.saturating_sub(start.elapsed());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread, time::Instant};

    use super::*;

    #[test]
    fn signal_releases_one_waiter() {
        let gate = Arc::new(EventGate::new());
        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait())
        };

        // Give the waiter a moment to block, then release it.
        thread::sleep(Duration::from_millis(20));
        gate.signal();
        assert_eq!(waiter.join().unwrap(), Ok(()));
    }

    #[test]
    fn signal_latches_without_waiter() {
        let gate = EventGate::new();
        gate.signal();
        // The latched signal satisfies the next wait immediately.
        assert_eq!(gate.wait(), Ok(()));
        // And is consumed by it.
        assert_eq!(gate.wait_timeout(Duration::from_millis(10)), Ok(false));
    }

    #[test]
    fn cancel_wakes_blocked_waiter_without_signal() {
        let gate = Arc::new(EventGate::new());
        let waiter = {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait())
        };

        thread::sleep(Duration::from_millis(20));
        let cancelled_at = Instant::now();
        gate.cancel();

        assert_eq!(waiter.join().unwrap(), Err(WaitError::Cancelled));
        // The waiter exits promptly, not after some unrelated timeout.
        assert!(cancelled_at.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn cancellation_is_permanent() {
        let gate = EventGate::new();
        gate.cancel();
        assert_eq!(gate.wait(), Err(WaitError::Cancelled));
        assert!(gate.is_cancelled());
    }

    #[test]
    fn wait_timeout_expires_without_signal() {
        let gate = EventGate::new();
        assert_eq!(gate.wait_timeout(Duration::from_millis(10)), Ok(false));
    }
}
