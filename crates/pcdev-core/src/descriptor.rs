//! Per-instance device metadata.

use serde::{Deserialize, Serialize};

use crate::permission::DevicePermission;

/// Registry key: device name plus instance index within that name.
pub type DeviceKey = (String, u32);

/// Identity and configuration of one device instance.
///
/// Several instances may share a name (the probe target) while carrying
/// distinct serial numbers and capacities. Immutable after creation; only
/// the buffer contents behind it ever change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Device type name drivers match against, e.g. `pcd-char-device`.
    pub name: String,
    /// Instance index distinguishing same-named devices.
    pub instance_id: u32,
    /// Buffer capacity in bytes.
    pub capacity: usize,
    /// Access policy.
    pub permission: DevicePermission,
    /// Manufacturer-style serial identifier.
    pub serial_number: String,
}

impl DeviceDescriptor {
    /// Registry key for this descriptor.
    pub fn key(&self) -> DeviceKey {
        (self.name.clone(), self.instance_id)
    }

    /// `name.instance` label used in logs.
    pub fn label(&self) -> String {
        format!("{}.{}", self.name, self.instance_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> DeviceDescriptor {
        DeviceDescriptor {
            name: "pcd-char-device".into(),
            instance_id: 1,
            capacity: 1024,
            permission: DevicePermission::ReadWrite,
            serial_number: "PCDEV0022BB".into(),
        }
    }

    #[test]
    fn key_combines_name_and_instance() {
        assert_eq!(descriptor().key(), ("pcd-char-device".to_string(), 1));
    }

    #[test]
    fn label_is_dotted() {
        assert_eq!(descriptor().label(), "pcd-char-device.1");
    }
}
