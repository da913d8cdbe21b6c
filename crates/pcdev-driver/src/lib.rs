//! Device registry, driver façade, and platform boundary for pcdev.
//!
//! ## Architecture
//!
//! ```text
//! pcdev-driver
//!   ├─ PlatformBus      (device/driver matching, probe + remove)
//!   ├─ DeviceRegistry   (descriptors + strategy-bound buffers)
//!   ├─ Driver           (attach/open/read/write/seek/close/detach)
//!   ├─ Session          (per-open cursor, permission-checked transfers)
//!   └─ FileOps          (byte-count-or-negated-errno boundary adapter)
//! ```
//!
//! The registry owns one strategy-bound buffer per registered descriptor;
//! the driver façade claims entries by name (first registration-order match
//! wins, mirroring probe-by-name) and hands out sessions whose cursor is
//! reset on every open.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod driver;
pub mod platform;
pub mod registry;

pub use config::{ConfigError, DeviceConfig, DeviceTable};
pub use driver::{DeviceHandle, Driver, Session};
pub use platform::{FileOps, PlatformBus, PlatformDriver};
pub use registry::{DeviceEntry, DeviceRegistry, SharedRegistry};
