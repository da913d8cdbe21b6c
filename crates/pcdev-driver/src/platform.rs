//! Platform boundary: device/driver matching and the file-operations
//! adapter.
//!
//! This models the OS-integration collaborator at its seam and nothing
//! more: devices are added with descriptors, drivers register for a name,
//! and the bus probes every matching device in registration order through
//! an explicit callback, with no hidden dispatch table. `FileOps` speaks the
//! conventional byte-count-or-negated-error-code contract over a session.

use pcdev_core::{DeviceError, Whence};
use pcdev_sync::BufferStrategyKind;

use crate::{
    driver::Session,
    registry::{DeviceEntry, DeviceRegistry, SharedRegistry},
};

/// Callbacks a driver registers with the bus.
///
/// `probe` is the spec's `on_attach` notification; `remove` its
/// `on_detach` counterpart. Matching is purely by name.
pub trait PlatformDriver: Send {
    /// Device name this driver matches, e.g. `pcd-char-device`.
    fn match_name(&self) -> &str;

    /// Called once per matching device, in registration order.
    fn probe(&mut self, entry: &DeviceEntry) -> Result<(), DeviceError>;

    /// Called when a matching device is removed or the driver unregisters.
    fn remove(&mut self, entry: &DeviceEntry);
}

/// Owns the registry and dispatches probe/remove on match.
pub struct PlatformBus {
    registry: SharedRegistry,
    drivers: Vec<Box<dyn PlatformDriver>>,
}

impl std::fmt::Debug for PlatformBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformBus")
            .field("devices", &self.registry.with(|r| r.len()))
            .field("drivers", &self.drivers.len())
            .finish()
    }
}

impl PlatformBus {
    /// Create a bus with an empty registry.
    pub fn new() -> Self {
        Self { registry: DeviceRegistry::shared(), drivers: Vec::new() }
    }

    /// Shared registry handle for driver façades.
    pub fn registry(&self) -> SharedRegistry {
        SharedRegistry::clone(&self.registry)
    }

    /// Register a device and probe every driver matching its name.
    pub fn add_device(
        &mut self,
        descriptor: pcdev_core::DeviceDescriptor,
        kind: BufferStrategyKind,
    ) -> Result<(), DeviceError> {
        let entry = self.registry.with(|r| r.register(descriptor, kind))?;

        for driver in &mut self.drivers {
            if driver.match_name() == entry.descriptor().name {
                tracing::info!(device = %entry.descriptor().label(), "probe");
                driver.probe(&entry)?;
            }
        }
        Ok(())
    }

    /// Remove a device, notifying matching drivers first.
    pub fn remove_device(&mut self, name: &str, instance_id: u32) -> Result<(), DeviceError> {
        let entry = self.registry.with(|r| r.claim(name, instance_id))?;

        for driver in &mut self.drivers {
            if driver.match_name() == name {
                tracing::info!(device = %entry.descriptor().label(), "remove");
                driver.remove(&entry);
            }
        }
        self.registry.with(|r| r.unregister(name, instance_id))
    }

    /// Register a driver, probing already-present matching devices in
    /// registration order. Returns how many devices were probed.
    pub fn register_driver(
        &mut self,
        mut driver: Box<dyn PlatformDriver>,
    ) -> Result<usize, DeviceError> {
        let matches = self.registry.with(|r| r.match_by_name(driver.match_name()));
        for entry in &matches {
            tracing::info!(device = %entry.descriptor().label(), "probe");
            driver.probe(entry)?;
        }

        let probed = matches.len();
        self.drivers.push(driver);
        Ok(probed)
    }

    /// Unregister every driver matching `name`, delivering `remove` for
    /// each device it was bound to.
    pub fn unregister_driver(&mut self, name: &str) {
        let matches = self.registry.with(|r| r.match_by_name(name));
        for driver in self.drivers.iter_mut().filter(|d| d.match_name() == name) {
            for entry in &matches {
                driver.remove(entry);
            }
        }
        self.drivers.retain(|d| d.match_name() != name);
    }
}

impl Default for PlatformBus {
    fn default() -> Self {
        Self::new()
    }
}

/// File-operations adapter: byte count on success, negated errno-style
/// code on failure, exactly the boundary contract a VFS-style caller
/// expects.
#[derive(Debug)]
pub struct FileOps {
    session: Session,
}

impl FileOps {
    /// Wrap an open session.
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Read into `buf`, returning bytes transferred or a negative code.
    pub fn read(&mut self, buf: &mut [u8]) -> i64 {
        match self.session.read(buf.len()) {
            Ok(bytes) => {
                buf[..bytes.len()].copy_from_slice(&bytes);
                bytes.len() as i64
            }
            Err(err) => err.code(),
        }
    }

    /// Write `data`, returning bytes placed or a negative code.
    pub fn write(&mut self, data: &[u8]) -> i64 {
        match self.session.write(data) {
            Ok(written) => written as i64,
            Err(err) => err.code(),
        }
    }

    /// Seek, returning the new position or a negative code.
    pub fn llseek(&mut self, delta: i64, whence: Whence) -> i64 {
        match self.session.seek(delta, whence) {
            Ok(position) => i64::try_from(position).unwrap_or(i64::MAX),
            Err(err) => err.code(),
        }
    }

    /// Release the adapter, recovering the session.
    pub fn into_session(self) -> Session {
        self.session
    }
}

#[cfg(test)]
mod tests {
    use pcdev_core::{AccessMode, DeviceDescriptor, DevicePermission};

    use super::*;
    use crate::driver::Driver;

    fn descriptor(instance_id: u32, capacity: usize) -> DeviceDescriptor {
        DeviceDescriptor {
            name: "pcd-char-device".into(),
            instance_id,
            capacity,
            permission: DevicePermission::ReadWrite,
            serial_number: format!("PCDEV{instance_id:04}"),
        }
    }

    struct RecordingDriver {
        probed: Vec<String>,
        removed: Vec<String>,
    }

    impl RecordingDriver {
        fn new() -> Self {
            Self { probed: Vec::new(), removed: Vec::new() }
        }
    }

    impl PlatformDriver for RecordingDriver {
        fn match_name(&self) -> &str {
            "pcd-char-device"
        }

        fn probe(&mut self, entry: &DeviceEntry) -> Result<(), DeviceError> {
            self.probed.push(entry.descriptor().label());
            Ok(())
        }

        fn remove(&mut self, entry: &DeviceEntry) {
            self.removed.push(entry.descriptor().label());
        }
    }

    #[test]
    fn driver_probes_existing_devices_in_order() {
        let mut bus = PlatformBus::new();
        bus.add_device(descriptor(0, 512), BufferStrategyKind::Exclusive).unwrap();
        bus.add_device(descriptor(1, 1024), BufferStrategyKind::Exclusive).unwrap();

        let probed = bus.register_driver(Box::new(RecordingDriver::new())).unwrap();
        assert_eq!(probed, 2);
    }

    #[test]
    fn late_device_addition_probes_registered_driver() {
        let mut bus = PlatformBus::new();
        bus.register_driver(Box::new(RecordingDriver::new())).unwrap();
        bus.add_device(descriptor(0, 512), BufferStrategyKind::Exclusive).unwrap();

        // The device is claimable through the façade after probe.
        let driver = Driver::new(bus.registry());
        assert!(driver.attach("pcd-char-device").is_ok());
    }

    #[test]
    fn remove_device_unregisters_entry() {
        let mut bus = PlatformBus::new();
        bus.add_device(descriptor(0, 512), BufferStrategyKind::Exclusive).unwrap();
        bus.remove_device("pcd-char-device", 0).unwrap();

        assert!(bus.registry().with(|r| r.is_empty()));
        assert!(matches!(
            bus.remove_device("pcd-char-device", 0),
            Err(DeviceError::NotFound { .. })
        ));
    }

    #[test]
    fn fileops_speaks_negated_codes() {
        let mut bus = PlatformBus::new();
        bus.add_device(descriptor(0, 8), BufferStrategyKind::Exclusive).unwrap();

        let driver = Driver::new(bus.registry());
        let handle = driver.attach("pcd-char-device").unwrap();
        let session = driver.open(&handle, AccessMode::ReadWrite).unwrap();
        let mut fops = FileOps::new(session);

        assert_eq!(fops.write(b"12345678XX"), 8); // truncated to capacity
        assert!(fops.write(b"more") < 0); // ENOSPC territory
        assert_eq!(fops.llseek(0, Whence::Start), 0);

        let mut buf = [0u8; 8];
        assert_eq!(fops.read(&mut buf), 8);
        assert_eq!(&buf, b"12345678");

        assert!(fops.llseek(-1, Whence::Start) < 0); // EINVAL territory
    }
}
