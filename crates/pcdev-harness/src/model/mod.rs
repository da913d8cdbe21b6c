//! Reference device for model-based testing.
//!
//! The model is a deliberately simple device: a `Vec<u8>` plus a cursor,
//! with the clamp and error rules written out in the most obvious way.
//! It is the oracle against which the real driver session is verified.
//!
//! # Design Principles
//!
//! - Simplicity: the model should be obviously correct
//! - Deterministic: same seed produces the same operation sequence
//! - Observable: outcomes carry everything needed for comparison

mod device;
mod operation;

pub use device::ModelDevice;
pub use operation::{OpOutcome, Operation, OutcomeError, random_operations};
