//! Strategy binding for one device buffer.
//!
//! Exactly one `BufferStrategy` instance owns the right to serialize a
//! given buffer for its lifetime; the registry creates it at registration
//! and drops it at unregistration. Word-sized strategies (sequence lock,
//! event gate) do not guard buffers; they carry no byte-range payload.

use bytes::Bytes;
use pcdev_core::{DeviceBuffer, DeviceError, Whence};
use serde::{Deserialize, Serialize};

use crate::{ExclusiveLock, ReaderWriterLock, SpinLock};

/// Which lock discipline serializes a device buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BufferStrategyKind {
    /// All operations serialize behind one mutex.
    #[default]
    Exclusive,
    /// Concurrent readers, exclusive writers.
    ReaderWriter,
    /// Busy-polling mutual exclusion for very short transfers.
    Spin,
}

/// A device buffer bound to its serialization strategy.
#[derive(Debug)]
pub enum BufferStrategy {
    /// Guarded by an [`ExclusiveLock`].
    Exclusive(ExclusiveLock<DeviceBuffer>),
    /// Guarded by a [`ReaderWriterLock`]; reads take shared access.
    ReaderWriter(ReaderWriterLock<DeviceBuffer>),
    /// Guarded by a [`SpinLock`].
    Spin(SpinLock<DeviceBuffer>),
}

impl BufferStrategy {
    /// Bind `buffer` to the requested strategy.
    pub fn new(kind: BufferStrategyKind, buffer: DeviceBuffer) -> Self {
        match kind {
            BufferStrategyKind::Exclusive => Self::Exclusive(ExclusiveLock::new(buffer)),
            BufferStrategyKind::ReaderWriter => Self::ReaderWriter(ReaderWriterLock::new(buffer)),
            BufferStrategyKind::Spin => Self::Spin(SpinLock::new(buffer)),
        }
    }

    /// Which strategy kind guards this buffer.
    pub fn kind(&self) -> BufferStrategyKind {
        match self {
            Self::Exclusive(_) => BufferStrategyKind::Exclusive,
            Self::ReaderWriter(_) => BufferStrategyKind::ReaderWriter,
            Self::Spin(_) => BufferStrategyKind::Spin,
        }
    }

    /// Capacity of the guarded buffer.
    pub fn capacity(&self) -> u64 {
        match self {
            Self::Exclusive(lock) => lock.with(|b| b.capacity()),
            Self::ReaderWriter(lock) => lock.with_read(DeviceBuffer::capacity),
            Self::Spin(lock) => lock.with(|b| b.capacity()),
        }
    }

    /// Serialized read; shared access under the reader/writer strategy.
    pub fn read_at(&self, offset: u64, len: usize) -> Result<Bytes, DeviceError> {
        match self {
            Self::Exclusive(lock) => lock.with(|b| b.read_at(offset, len)),
            Self::ReaderWriter(lock) => lock.with_read(|b| b.read_at(offset, len)),
            Self::Spin(lock) => lock.with(|b| b.read_at(offset, len)),
        }
    }

    /// Serialized write.
    pub fn write_at(&self, offset: u64, data: &[u8]) -> Result<usize, DeviceError> {
        match self {
            Self::Exclusive(lock) => lock.with(|b| b.write_at(offset, data)),
            Self::ReaderWriter(lock) => lock.with_write(|b| b.write_at(offset, data)),
            Self::Spin(lock) => lock.with(|b| b.write_at(offset, data)),
        }
    }

    /// Seek arithmetic against the guarded buffer's capacity.
    pub fn seek_from(&self, current: u64, delta: i64, whence: Whence) -> Result<u64, DeviceError> {
        match self {
            Self::Exclusive(lock) => lock.with(|b| b.seek_from(current, delta, whence)),
            Self::ReaderWriter(lock) => lock.with_read(|b| b.seek_from(current, delta, whence)),
            Self::Spin(lock) => lock.with(|b| b.seek_from(current, delta, whence)),
        }
    }
}
