//! Operations for model-based testing.
//!
//! A sequence of operations is generated from a seed and applied to both
//! the model device and a real driver session; the observable outcomes
//! must match step for step.

use pcdev_core::{DeviceError, Whence};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One step against a device handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Read up to `len` bytes at the current cursor.
    Read {
        /// Requested transfer length.
        len: usize,
    },

    /// Write a deterministic payload at the current cursor.
    Write {
        /// Seed byte the payload is expanded from.
        seed: u8,
        /// Payload length.
        len: usize,
    },

    /// Move the cursor.
    Seek {
        /// Signed displacement from the reference point.
        delta: i64,
        /// Reference point for the displacement.
        whence: Whence,
    },
}

impl Operation {
    /// Expand a `Write` seed into its payload bytes.
    ///
    /// Content is deterministic from the seed so the model and the real
    /// device write identical data without the sequence carrying it.
    pub fn payload(seed: u8, len: usize) -> Vec<u8> {
        (0..len).map(|i| seed.wrapping_add(i as u8)).collect()
    }
}

/// Observable result of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome {
    /// Bytes a read returned.
    Read(Vec<u8>),
    /// Length a write actually placed.
    Wrote(usize),
    /// Cursor position after a seek.
    Sought(u64),
    /// The operation was rejected.
    Failed(OutcomeError),
}

/// Error classes the model distinguishes.
///
/// Structured error fields (offsets, capacities) are deliberately dropped
/// here: the oracle compares error classes, not message payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeError {
    /// Offset beyond end of buffer.
    OutOfRange,
    /// No room left for a non-empty write.
    NoSpace,
    /// Seek resolved to a negative position.
    InvalidSeek,
    /// Access or lookup rejection outside the data path.
    Denied,
}

impl From<&DeviceError> for OutcomeError {
    fn from(err: &DeviceError) -> Self {
        match err {
            DeviceError::OutOfRange { .. } => Self::OutOfRange,
            DeviceError::NoSpace { .. } => Self::NoSpace,
            DeviceError::InvalidSeek { .. } => Self::InvalidSeek,
            DeviceError::PermissionDenied { .. }
            | DeviceError::NotFound { .. }
            | DeviceError::DuplicateKey { .. } => Self::Denied,
        }
    }
}

/// Generate a deterministic operation sequence.
///
/// Lengths and displacements are sized around `capacity` so sequences hit
/// the interesting edges: clamped transfers, cursors parked exactly at
/// end-of-buffer, seeks past the end, and seeks that would go negative.
pub fn random_operations(seed: u64, count: usize, capacity: u64) -> Vec<Operation> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let span = capacity.max(1);
    let mut ops = Vec::with_capacity(count);

    for _ in 0..count {
        let op = match rng.gen_range(0..10u8) {
            0..=3 => Operation::Read { len: rng.gen_range(0..=span as usize + 8) },
            4..=7 => Operation::Write {
                seed: rng.r#gen(),
                len: rng.gen_range(0..=span as usize + 8),
            },
            _ => {
                let whence = match rng.gen_range(0..3u8) {
                    0 => Whence::Start,
                    1 => Whence::Current,
                    _ => Whence::End,
                };
                let reach = span as i64 + 8;
                Operation::Seek { delta: rng.gen_range(-reach..=reach), whence }
            }
        };
        ops.push(op);
    }

    ops
}
