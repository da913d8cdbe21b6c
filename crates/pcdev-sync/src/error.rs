//! Strategy wait errors.

use thiserror::Error;

/// Failure to acquire or keep waiting on a strategy.
///
/// Deliberately disjoint from the device data-model errors: a strategy
/// never raises a domain error, and a cancellation while waiting is not a
/// device fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WaitError {
    /// The wait was cancelled before the condition or lock arrived.
    #[error("wait cancelled")]
    Cancelled,

    /// A bounded acquisition exhausted its spin budget.
    #[error("lock contended beyond spin budget")]
    Contended,
}
