//! Device error types.

use thiserror::Error;

/// Errors from device buffer, registry, and driver operations.
///
/// These are data-model errors returned to the immediate caller as typed
/// results; nothing here is retried automatically. Synchronization failures
/// (cancellation while waiting) are a separate taxonomy in `pcdev-sync`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// Read or write offset lies beyond the buffer capacity.
    #[error("offset out of range: {offset} > capacity {capacity}")]
    OutOfRange {
        /// The offending offset.
        offset: u64,
        /// Capacity of the buffer.
        capacity: u64,
    },

    /// A non-empty write could not place a single byte.
    #[error("no space left: {requested} bytes requested at offset {offset}")]
    NoSpace {
        /// Offset at which the write was attempted.
        offset: u64,
        /// Number of bytes the caller supplied.
        requested: u64,
    },

    /// A seek computed a negative offset.
    #[error("invalid seek: resulting position {position} is negative")]
    InvalidSeek {
        /// The (negative) position the seek would have produced.
        position: i64,
    },

    /// The descriptor's permission forbids the requested access mode.
    #[error("permission denied on {name}.{instance_id}")]
    PermissionDenied {
        /// Device name.
        name: String,
        /// Instance index within that name.
        instance_id: u32,
    },

    /// Registry lookup miss.
    #[error("device not found: {name}.{instance_id}")]
    NotFound {
        /// Device name.
        name: String,
        /// Instance index within that name.
        instance_id: u32,
    },

    /// Registration collision on `(name, instance_id)`.
    #[error("device already registered: {name}.{instance_id}")]
    DuplicateKey {
        /// Device name.
        name: String,
        /// Instance index within that name.
        instance_id: u32,
    },
}

impl DeviceError {
    /// Negated errno-style code for the file-operations boundary.
    ///
    /// Callers speaking the byte-count-or-negative-code convention map a
    /// failed operation to one of these instead of a byte count.
    pub fn code(&self) -> i64 {
        match self {
            Self::OutOfRange { .. } => -34,        // ERANGE
            Self::NoSpace { .. } => -28,           // ENOSPC
            Self::InvalidSeek { .. } => -22,       // EINVAL
            Self::PermissionDenied { .. } => -13,  // EACCES
            Self::NotFound { .. } => -19,          // ENODEV
            Self::DuplicateKey { .. } => -17,      // EEXIST
        }
    }
}
