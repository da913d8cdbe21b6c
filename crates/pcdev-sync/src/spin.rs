//! Busy-polling lock strategy for very short critical sections.
//!
//! Acquisition polls `try_lock` instead of descheduling the thread. The
//! backoff policy is explicit so tests can bound worst-case spinning; the
//! unbounded [`SpinLock::lock`] still yields periodically rather than
//! degrading into a hot loop on a hosted scheduler.

use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use crate::error::WaitError;

/// Backoff policy for spin acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinPolicy {
    /// Spin budget for [`SpinLock::try_lock_bounded`].
    pub max_spins: u32,
    /// Iterations of pure spinning before each `yield_now`.
    pub yield_after: u32,
}

impl Default for SpinPolicy {
    fn default() -> Self {
        Self { max_spins: 100_000, yield_after: 64 }
    }
}

/// Mutual exclusion with busy-polling acquisition.
///
/// Correctness matches [`ExclusiveLock`](crate::ExclusiveLock); only the
/// waiting discipline differs. Holding it across a long critical section is
/// a performance hazard, not a correctness one. No ordering guarantee is
/// made beyond mutual exclusion.
#[derive(Debug, Default)]
pub struct SpinLock<T> {
    inner: Mutex<T>,
    policy: SpinPolicy,
}

impl<T> SpinLock<T> {
    /// Wrap `value` with the default backoff policy.
    pub fn new(value: T) -> Self {
        Self::with_policy(value, SpinPolicy::default())
    }

    /// Wrap `value` with an explicit backoff policy.
    pub fn with_policy(value: T, policy: SpinPolicy) -> Self {
        Self { inner: Mutex::new(value), policy }
    }

    /// The configured backoff policy.
    pub fn policy(&self) -> SpinPolicy {
        self.policy
    }

    /// Acquire by polling until the lock frees up.
    pub fn lock(&self) -> MutexGuard<'_, T> {
        let mut spins: u32 = 0;
        loop {
            match self.inner.try_lock() {
                Ok(guard) => return guard,
                Err(TryLockError::Poisoned(poisoned)) => return poisoned.into_inner(),
                Err(TryLockError::WouldBlock) => {}
            }

            spins = spins.wrapping_add(1);
            if self.policy.yield_after > 0 && spins % self.policy.yield_after == 0 {
                std::thread::yield_now();
            } else {
                std::hint::spin_loop();
            }
        }
    }

    /// Acquire within the policy's spin budget or give up.
    pub fn try_lock_bounded(&self) -> Result<MutexGuard<'_, T>, WaitError> {
        for spins in 0..self.policy.max_spins {
            match self.inner.try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::Poisoned(poisoned)) => return Ok(poisoned.into_inner()),
                Err(TryLockError::WouldBlock) => {}
            }

            if self.policy.yield_after > 0 && spins % self.policy.yield_after == 0 {
                std::thread::yield_now();
            } else {
                std::hint::spin_loop();
            }
        }

        tracing::debug!(max_spins = self.policy.max_spins, "spin budget exhausted");
        Err(WaitError::Contended)
    }

    /// Run `f` under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    #[test]
    fn mutual_exclusion_holds() {
        let lock = Arc::new(SpinLock::new(0u64));
        let mut handles = Vec::new();

        for _ in 0..4 {
            let lock = Arc::clone(&lock);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    lock.with(|v| *v += 1);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*lock.lock(), 4000);
    }

    #[test]
    fn bounded_acquisition_gives_up_under_contention() {
        let lock = Arc::new(SpinLock::with_policy(
            0u64,
            SpinPolicy { max_spins: 100, yield_after: 10 },
        ));

        let held = lock.lock();
        let contender = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || lock.try_lock_bounded().map(|_| ()))
        };

        assert_eq!(contender.join().unwrap(), Err(WaitError::Contended));
        drop(held);
    }

    #[test]
    fn bounded_acquisition_succeeds_when_free() {
        let lock = SpinLock::new(5u64);
        let guard = lock.try_lock_bounded().unwrap();
        assert_eq!(*guard, 5);
    }
}
