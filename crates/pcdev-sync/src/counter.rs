//! The shared counter contended by harness workers.
//!
//! One mutable integer, guarded by whichever strategy a demonstration
//! picks. The invariant is the same under every strategy: after `W`
//! writers commit `I` increments each, the counter reads `W * I`: no
//! lost updates, no torn observations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{ExclusiveLock, ReaderWriterLock, SequenceLock, SpinLock};

/// Counter-guarding capability shared by the lock strategies.
pub trait SharedCounter: Send + Sync + 'static {
    /// Commit an increment of `n`, returning the new value.
    fn add(&self, n: u64) -> u64;

    /// Observe the current committed value.
    fn load(&self) -> u64;
}

impl SharedCounter for ExclusiveLock<u64> {
    fn add(&self, n: u64) -> u64 {
        self.with(|v| {
            *v += n;
            *v
        })
    }

    fn load(&self) -> u64 {
        *self.lock()
    }
}

impl SharedCounter for ReaderWriterLock<u64> {
    fn add(&self, n: u64) -> u64 {
        self.with_write(|v| {
            *v += n;
            *v
        })
    }

    fn load(&self) -> u64 {
        self.with_read(|v| *v)
    }
}

impl SharedCounter for SpinLock<u64> {
    fn add(&self, n: u64) -> u64 {
        self.with(|v| {
            *v += n;
            *v
        })
    }

    fn load(&self) -> u64 {
        *self.lock()
    }
}

impl SharedCounter for SequenceLock {
    fn add(&self, n: u64) -> u64 {
        // Stamp tracks the commit count so readers can audit consistency.
        self.modify(|value, stamp| (value + n, stamp + 1)).0
    }

    fn load(&self) -> u64 {
        self.read().0
    }
}

/// Which strategy guards the shared counter in a demonstration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CounterStrategyKind {
    /// [`ExclusiveLock`].
    Exclusive,
    /// [`ReaderWriterLock`].
    ReaderWriter,
    /// [`SequenceLock`].
    Sequence,
    /// [`SpinLock`].
    Spin,
}

/// Construct a zeroed counter guarded by the requested strategy.
pub fn counter_for(kind: CounterStrategyKind) -> Arc<dyn SharedCounter> {
    match kind {
        CounterStrategyKind::Exclusive => Arc::new(ExclusiveLock::new(0)),
        CounterStrategyKind::ReaderWriter => Arc::new(ReaderWriterLock::new(0)),
        CounterStrategyKind::Sequence => Arc::new(SequenceLock::default()),
        CounterStrategyKind::Spin => Arc::new(SpinLock::new(0)),
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn every_strategy_counts_exactly() {
        for kind in [
            CounterStrategyKind::Exclusive,
            CounterStrategyKind::ReaderWriter,
            CounterStrategyKind::Sequence,
            CounterStrategyKind::Spin,
        ] {
            let counter = counter_for(kind);
            let mut handles = Vec::new();
            for _ in 0..3 {
                let counter = Arc::clone(&counter);
                handles.push(thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.add(1);
                    }
                }));
            }
            for handle in handles {
                handle.join().unwrap();
            }
            assert_eq!(counter.load(), 3000, "lost updates under {kind:?}");
        }
    }
}
