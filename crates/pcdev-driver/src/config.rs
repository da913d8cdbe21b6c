//! Device-table configuration.
//!
//! The table mirrors the original platform setup: a static list of device
//! instances, each with a capacity, permission, and serial number. It can
//! be loaded from TOML or fall back to the built-in two-instance default.
//!
//! ```toml
//! [[device]]
//! name = "pcd-char-device"
//! instance_id = 0
//! capacity = 512
//! permission = "read-write"
//! serial_number = "PCDEV0011AA"
//! strategy = "exclusive"
//! ```

use std::path::Path;

use pcdev_core::{DeviceDescriptor, DeviceError, DevicePermission};
use pcdev_sync::BufferStrategyKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::PlatformBus;

/// Errors loading or parsing a device table.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the table file failed.
    #[error("failed to read device table: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid device table.
    #[error("failed to parse device table: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One configured device instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device type name drivers match against.
    pub name: String,
    /// Instance index within that name.
    pub instance_id: u32,
    /// Buffer capacity in bytes.
    pub capacity: usize,
    /// Access policy.
    pub permission: DevicePermission,
    /// Serial identifier.
    pub serial_number: String,
    /// Which strategy guards the buffer (exclusive when omitted).
    #[serde(default)]
    pub strategy: BufferStrategyKind,
}

impl DeviceConfig {
    /// Descriptor for registration.
    pub fn descriptor(&self) -> DeviceDescriptor {
        DeviceDescriptor {
            name: self.name.clone(),
            instance_id: self.instance_id,
            capacity: self.capacity,
            permission: self.permission,
            serial_number: self.serial_number.clone(),
        }
    }
}

/// Ordered list of device instances to register at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTable {
    /// Devices in registration order.
    #[serde(rename = "device")]
    pub devices: Vec<DeviceConfig>,
}

impl Default for DeviceTable {
    /// The original two-instance setup: same name, distinct capacities and
    /// serials, both read-write.
    fn default() -> Self {
        Self {
            devices: vec![
                DeviceConfig {
                    name: "pcd-char-device".into(),
                    instance_id: 0,
                    capacity: 512,
                    permission: DevicePermission::ReadWrite,
                    serial_number: "PCDEV0011AA".into(),
                    strategy: BufferStrategyKind::Exclusive,
                },
                DeviceConfig {
                    name: "pcd-char-device".into(),
                    instance_id: 1,
                    capacity: 1024,
                    permission: DevicePermission::ReadWrite,
                    serial_number: "PCDEV0022BB".into(),
                    strategy: BufferStrategyKind::Exclusive,
                },
            ],
        }
    }
}

impl DeviceTable {
    /// Parse a table from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Register every configured device on `bus`, in table order.
    pub fn apply(&self, bus: &mut PlatformBus) -> Result<(), DeviceError> {
        for device in &self.devices {
            bus.add_device(device.descriptor(), device.strategy)?;
        }
        Ok(())
    }
}
