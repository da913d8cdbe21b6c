//! Fixed-capacity in-memory device buffer.
//!
//! The buffer is pure storage: it owns a byte array of fixed capacity and
//! clamps every access to `[0, capacity)`. It does not own a cursor; the
//! driver session tracks the file position and advances it by whatever
//! length these operations actually transfer.

use bytes::Bytes;

use crate::error::DeviceError;

/// Reference point for a seek computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Absolute position from the start of the buffer.
    Start,
    /// Relative to the current session cursor.
    Current,
    /// Relative to the end of the buffer (its capacity).
    End,
}

/// Byte store of fixed capacity with end-of-file clamp semantics.
///
/// Created when a device is registered and dropped when it is unregistered.
/// Contents persist across open/close of driver sessions, mirroring a
/// character device whose backing memory outlives any one file handle.
#[derive(Debug)]
pub struct DeviceBuffer {
    storage: Box<[u8]>,
}

impl DeviceBuffer {
    /// Allocate a zero-filled buffer of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self { storage: vec![0u8; capacity].into_boxed_slice() }
    }

    /// Fixed capacity in bytes.
    pub fn capacity(&self) -> u64 {
        self.storage.len() as u64
    }

    /// Read up to `len` bytes starting at `offset`.
    ///
    /// The transfer length is clamped to `capacity - offset`. A read exactly
    /// at end-of-buffer returns zero bytes and is a success, not an error;
    /// only an offset strictly beyond capacity is `OutOfRange`.
    pub fn read_at(&self, offset: u64, len: usize) -> Result<Bytes, DeviceError> {
        let capacity = self.capacity();
        if offset > capacity {
            return Err(DeviceError::OutOfRange { offset, capacity });
        }

        let start = usize::try_from(offset)
            .map_err(|_| DeviceError::OutOfRange { offset, capacity })?;
        let actual = len.min(self.storage.len() - start);

        tracing::trace!(offset, requested = len, actual, "buffer read");
        Ok(Bytes::copy_from_slice(&self.storage[start..start + actual]))
    }

    /// Write `data` starting at `offset`, returning the length placed.
    ///
    /// A zero-length `data` is a deliberate no-op and succeeds with 0. A
    /// non-empty payload that the clamp would reduce to zero bytes fails
    /// with `NoSpace`; anything in between is truncated silently to
    /// `capacity - offset` bytes.
    pub fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<usize, DeviceError> {
        if data.is_empty() {
            return Ok(0);
        }

        let capacity = self.capacity();
        if offset >= capacity {
            return Err(DeviceError::NoSpace { offset, requested: data.len() as u64 });
        }

        let start = usize::try_from(offset)
            .map_err(|_| DeviceError::NoSpace { offset, requested: data.len() as u64 })?;
        let actual = data.len().min(self.storage.len() - start);
        self.storage[start..start + actual].copy_from_slice(&data[..actual]);

        tracing::trace!(offset, requested = data.len(), actual, "buffer write");
        Ok(actual)
    }

    /// Compute a new cursor position without applying it.
    ///
    /// A position beyond capacity is permitted (a later read or write will
    /// clamp to a zero-byte transfer, end-of-stream style); only a negative
    /// result is rejected. The caller keeps its prior cursor on failure.
    pub fn seek_from(&self, current: u64, delta: i64, whence: Whence) -> Result<u64, DeviceError> {
        let base: i128 = match whence {
            Whence::Start => 0,
            Whence::Current => i128::from(current),
            Whence::End => i128::from(self.capacity()),
        };
        let position = base + i128::from(delta);

        if position < 0 {
            return Err(DeviceError::InvalidSeek {
                position: i64::try_from(position).unwrap_or(i64::MIN),
            });
        }

        Ok(u64::try_from(position).unwrap_or(u64::MAX))
    }
}
