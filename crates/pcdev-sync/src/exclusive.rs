//! Exclusive-lock strategy: all operations serialize.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mutex strategy: at most one holder at a time for read or write.
///
/// Fairness is whatever the platform mutex provides; no waiter is starved
/// indefinitely. Nested acquisition from the same thread is prevented by
/// construction: the guard borrows the lock and there is no re-entrant
/// entry point.
#[derive(Debug, Default)]
pub struct ExclusiveLock<T> {
    inner: Mutex<T>,
}

impl<T> ExclusiveLock<T> {
    /// Wrap `value` in an exclusive lock.
    pub fn new(value: T) -> Self {
        Self { inner: Mutex::new(value) }
    }

    /// Acquire the lock, blocking until it is free.
    ///
    /// A poisoned lock is recovered rather than propagated: the protected
    /// state stays usable and panics never cascade across workers.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// Consume the lock, returning the inner value.
    pub fn into_inner(self) -> T {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
