//! Sequence-lock strategy: optimistic non-blocking readers.
//!
//! Writers take exclusive access and bump a generation counter to odd
//! before and back to even after mutating; readers snapshot the payload
//! without blocking and retry whenever a write overlapped their read. A
//! reader can spin unboundedly under a pathological constant-writer
//! workload. That is an accepted limitation of the strategy, not a bug;
//! [`SequenceLock::try_read`] exists for callers that need a bound.
//!
//! The payload is a pair of atomic words. Each word is individually
//! atomic, so no single load can tear; what the generation bracket adds is
//! pair consistency: a reader never observes one word from before a write
//! and the other from after it.

use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicU64, Ordering},
};

/// Word-pair payload guarded by a generation counter.
#[derive(Debug)]
pub struct SequenceLock {
    /// Odd while a write is in flight, even otherwise.
    seq: AtomicU64,
    value: AtomicU64,
    stamp: AtomicU64,
    /// Serializes writers; readers never touch this.
    writer: Mutex<()>,
}

impl SequenceLock {
    /// Create a sequence lock holding `(value, stamp)`.
    pub fn new(value: u64, stamp: u64) -> Self {
        Self {
            seq: AtomicU64::new(0),
            value: AtomicU64::new(value),
            stamp: AtomicU64::new(stamp),
            writer: Mutex::new(()),
        }
    }

    /// Publish a new `(value, stamp)` pair.
    pub fn write(&self, value: u64, stamp: u64) {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        self.seq.fetch_add(1, Ordering::Release); // now odd: write in flight
        self.value.store(value, Ordering::Release);
        self.stamp.store(stamp, Ordering::Release);
        self.seq.fetch_add(1, Ordering::Release); // even again: committed
    }

    /// Read-modify-write under the writer lock.
    ///
    /// The closure sees the committed pair and returns the replacement; the
    /// whole update is bracketed by a single generation bump, so readers
    /// either see the old pair or the new one.
    pub fn modify(&self, f: impl FnOnce(u64, u64) -> (u64, u64)) -> (u64, u64) {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = (self.value.load(Ordering::Acquire), self.stamp.load(Ordering::Acquire));
        let (value, stamp) = f(current.0, current.1);

        self.seq.fetch_add(1, Ordering::Release);
        self.value.store(value, Ordering::Release);
        self.stamp.store(stamp, Ordering::Release);
        self.seq.fetch_add(1, Ordering::Release);

        (value, stamp)
    }

    /// Snapshot the pair, retrying until a read brackets no writer activity.
    pub fn read(&self) -> (u64, u64) {
        loop {
            if let Some(pair) = self.try_read() {
                return pair;
            }
            std::hint::spin_loop();
        }
    }

    /// Single bracket attempt: `None` if a write overlapped the read.
    pub fn try_read(&self) -> Option<(u64, u64)> {
        let before = self.seq.load(Ordering::Acquire);
        if before & 1 == 1 {
            return None; // write in flight
        }

        let pair = (self.value.load(Ordering::Acquire), self.stamp.load(Ordering::Acquire));

        let after = self.seq.load(Ordering::Acquire);
        (before == after).then_some(pair)
    }

    /// Number of committed writes so far.
    pub fn generation(&self) -> u64 {
        self.seq.load(Ordering::Acquire) / 2
    }
}

impl Default for SequenceLock {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
