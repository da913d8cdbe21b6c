//! Device registry: descriptors plus their strategy-bound buffers.
//!
//! Entries are kept in registration order and keyed by
//! `(name, instance_id)`. Lookup by name alone returns every matching
//! instance in that order; the driver's attach step takes the first,
//! mirroring probe-by-name matching.

use std::sync::Arc;

use pcdev_core::{DeviceBuffer, DeviceDescriptor, DeviceError};
use pcdev_sync::{BufferStrategy, BufferStrategyKind, ExclusiveLock};

/// Registry handle shared between the platform bus and driver façades.
pub type SharedRegistry = Arc<ExclusiveLock<DeviceRegistry>>;

/// One registered device: immutable descriptor plus its guarded buffer.
#[derive(Debug)]
pub struct DeviceEntry {
    descriptor: DeviceDescriptor,
    buffer: BufferStrategy,
}

impl DeviceEntry {
    /// The descriptor this entry was registered with.
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    /// The strategy-bound buffer.
    pub fn buffer(&self) -> &BufferStrategy {
        &self.buffer
    }
}

/// Ordered mapping from `(name, instance_id)` to device entries.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    entries: Vec<Arc<DeviceEntry>>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry behind the shared handle the façades use.
    pub fn shared() -> SharedRegistry {
        Arc::new(ExclusiveLock::new(Self::new()))
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no devices are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a device, allocating its buffer under `kind`.
    ///
    /// # Errors
    ///
    /// `DuplicateKey` when `(name, instance_id)` is already present.
    pub fn register(
        &mut self,
        descriptor: DeviceDescriptor,
        kind: BufferStrategyKind,
    ) -> Result<Arc<DeviceEntry>, DeviceError> {
        if self.find(&descriptor.name, descriptor.instance_id).is_some() {
            return Err(DeviceError::DuplicateKey {
                name: descriptor.name.clone(),
                instance_id: descriptor.instance_id,
            });
        }

        tracing::info!(
            device = %descriptor.label(),
            serial = %descriptor.serial_number,
            capacity = descriptor.capacity,
            ?kind,
            "device registered"
        );

        let buffer = BufferStrategy::new(kind, DeviceBuffer::new(descriptor.capacity));
        let entry = Arc::new(DeviceEntry { descriptor, buffer });
        self.entries.push(Arc::clone(&entry));
        Ok(entry)
    }

    /// Unregister a device, releasing its buffer.
    ///
    /// # Errors
    ///
    /// `NotFound` when the key is absent.
    pub fn unregister(&mut self, name: &str, instance_id: u32) -> Result<(), DeviceError> {
        let position = self
            .entries
            .iter()
            .position(|e| e.descriptor.name == name && e.descriptor.instance_id == instance_id)
            .ok_or_else(|| DeviceError::NotFound {
                name: name.to_owned(),
                instance_id,
            })?;

        let entry = self.entries.remove(position);
        tracing::info!(device = %entry.descriptor.label(), "device unregistered");
        Ok(())
    }

    /// Every entry whose name matches, in registration order.
    ///
    /// An empty result is not an error; the caller decides whether a
    /// missing device is fatal.
    pub fn match_by_name(&self, name: &str) -> Vec<Arc<DeviceEntry>> {
        self.entries.iter().filter(|e| e.descriptor.name == name).cloned().collect()
    }

    /// Entry for an exact `(name, instance_id)` key.
    pub fn find(&self, name: &str, instance_id: u32) -> Option<Arc<DeviceEntry>> {
        self.entries
            .iter()
            .find(|e| e.descriptor.name == name && e.descriptor.instance_id == instance_id)
            .cloned()
    }

    /// Like [`find`](Self::find) but a miss is an error.
    pub fn claim(&self, name: &str, instance_id: u32) -> Result<Arc<DeviceEntry>, DeviceError> {
        self.find(name, instance_id).ok_or_else(|| DeviceError::NotFound {
            name: name.to_owned(),
            instance_id,
        })
    }

    /// Descriptors of every registered device, in registration order.
    pub fn descriptors(&self) -> Vec<DeviceDescriptor> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use pcdev_core::DevicePermission;

    use super::*;

    fn descriptor(name: &str, instance_id: u32, capacity: usize) -> DeviceDescriptor {
        DeviceDescriptor {
            name: name.into(),
            instance_id,
            capacity,
            permission: DevicePermission::ReadWrite,
            serial_number: format!("SER{instance_id:04}"),
        }
    }

    #[test]
    fn register_then_find() {
        let mut registry = DeviceRegistry::new();
        registry.register(descriptor("pcd-char-device", 0, 512), BufferStrategyKind::Exclusive)
            .unwrap();

        let entry = registry.find("pcd-char-device", 0).unwrap();
        assert_eq!(entry.buffer().capacity(), 512);
        assert!(registry.find("pcd-char-device", 1).is_none());
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut registry = DeviceRegistry::new();
        registry.register(descriptor("pcd-char-device", 0, 512), BufferStrategyKind::Exclusive)
            .unwrap();

        let err = registry
            .register(descriptor("pcd-char-device", 0, 1024), BufferStrategyKind::Exclusive)
            .unwrap_err();
        assert!(matches!(err, DeviceError::DuplicateKey { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_unknown_is_not_found() {
        let mut registry = DeviceRegistry::new();
        let err = registry.unregister("pcd-char-device", 7).unwrap_err();
        assert_eq!(
            err,
            DeviceError::NotFound { name: "pcd-char-device".into(), instance_id: 7 }
        );
    }

    #[test]
    fn match_by_name_preserves_registration_order() {
        let mut registry = DeviceRegistry::new();
        registry.register(descriptor("pcd-char-device", 0, 512), BufferStrategyKind::Exclusive)
            .unwrap();
        registry.register(descriptor("other-device", 0, 64), BufferStrategyKind::Exclusive)
            .unwrap();
        registry.register(descriptor("pcd-char-device", 1, 1024), BufferStrategyKind::Exclusive)
            .unwrap();

        let matches = registry.match_by_name("pcd-char-device");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].descriptor().instance_id, 0);
        assert_eq!(matches[0].descriptor().capacity, 512);
        assert_eq!(matches[1].descriptor().instance_id, 1);
        assert_eq!(matches[1].descriptor().capacity, 1024);

        assert!(registry.match_by_name("missing").is_empty());
    }
}
