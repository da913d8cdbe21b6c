//! The reference device: a byte vector and a cursor.

use pcdev_core::Whence;

use super::operation::{OpOutcome, Operation, OutcomeError};

/// Obviously-correct device the real driver is compared against.
///
/// Holds the full backing store and one cursor, exactly the state a
/// single session over a freshly registered device observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDevice {
    data: Vec<u8>,
    cursor: u64,
}

impl ModelDevice {
    /// Create a zero-filled model of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self { data: vec![0u8; capacity], cursor: 0 }
    }

    /// Fixed capacity in bytes.
    pub fn capacity(&self) -> u64 {
        self.data.len() as u64
    }

    /// Current cursor position.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Full backing store contents.
    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    /// Apply one operation and report its observable outcome.
    pub fn apply(&mut self, op: &Operation) -> OpOutcome {
        match *op {
            Operation::Read { len } => self.read(len),
            Operation::Write { seed, len } => self.write(&Operation::payload(seed, len)),
            Operation::Seek { delta, whence } => self.seek(delta, whence),
        }
    }

    fn read(&mut self, len: usize) -> OpOutcome {
        if self.cursor > self.capacity() {
            return OpOutcome::Failed(OutcomeError::OutOfRange);
        }
        let start = self.cursor as usize;
        let actual = len.min(self.data.len() - start);
        let bytes = self.data[start..start + actual].to_vec();
        self.cursor += actual as u64;
        OpOutcome::Read(bytes)
    }

    fn write(&mut self, payload: &[u8]) -> OpOutcome {
        if payload.is_empty() {
            return OpOutcome::Wrote(0);
        }
        if self.cursor >= self.capacity() {
            return OpOutcome::Failed(OutcomeError::NoSpace);
        }
        let start = self.cursor as usize;
        let actual = payload.len().min(self.data.len() - start);
        self.data[start..start + actual].copy_from_slice(&payload[..actual]);
        self.cursor += actual as u64;
        OpOutcome::Wrote(actual)
    }

    fn seek(&mut self, delta: i64, whence: Whence) -> OpOutcome {
        let base: i128 = match whence {
            Whence::Start => 0,
            Whence::Current => i128::from(self.cursor),
            Whence::End => i128::from(self.capacity()),
        };
        let position = base + i128::from(delta);
        if position < 0 {
            // Cursor stays where it was.
            return OpOutcome::Failed(OutcomeError::InvalidSeek);
        }
        self.cursor = u64::try_from(position).unwrap_or(u64::MAX);
        OpOutcome::Sought(self.cursor)
    }
}
