//! Data model for the pcdev pseudo character device.
//!
//! This crate holds the pure, offset-agnostic pieces: the fixed-capacity
//! [`DeviceBuffer`], the per-instance [`DeviceDescriptor`] metadata, the
//! [`DevicePermission`] access policy, the [`DeviceError`] taxonomy, and the
//! [`Clock`] abstraction used to keep timing injectable in tests.
//!
//! Cursor ownership deliberately lives one layer up, in the driver session:
//! the buffer itself never tracks a read/write position.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod clock;
pub mod descriptor;
pub mod error;
pub mod permission;

pub use buffer::{DeviceBuffer, Whence};
pub use clock::{Clock, ManualClock, SystemClock};
pub use descriptor::{DeviceDescriptor, DeviceKey};
pub use error::DeviceError;
pub use permission::{AccessMode, DevicePermission};
