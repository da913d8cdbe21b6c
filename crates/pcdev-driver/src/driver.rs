//! Driver façade: attach, open, read/write/seek, close, detach.
//!
//! The façade is the only path user-facing code takes to a device buffer.
//! Each open produces a [`Session`] owning the file cursor (the buffer
//! itself is offset-agnostic), and every transfer goes through the entry's
//! [`BufferStrategy`](pcdev_sync::BufferStrategy), so serialization is
//! whatever discipline the device was registered with.

use std::sync::Arc;

use bytes::Bytes;
use pcdev_core::{AccessMode, DeviceDescriptor, DeviceError, Whence};

use crate::registry::{DeviceEntry, SharedRegistry};

/// A claimed device, valid from attach to detach.
#[derive(Debug, Clone)]
pub struct DeviceHandle {
    entry: Arc<DeviceEntry>,
}

impl DeviceHandle {
    /// Descriptor of the attached device.
    pub fn descriptor(&self) -> &DeviceDescriptor {
        self.entry.descriptor()
    }
}

/// One open of a device: access mode plus the session-owned cursor.
#[derive(Debug)]
pub struct Session {
    entry: Arc<DeviceEntry>,
    mode: AccessMode,
    cursor: u64,
}

/// Orchestrating façade over the shared registry.
#[derive(Debug, Clone)]
pub struct Driver {
    registry: SharedRegistry,
}

impl Driver {
    /// Create a façade over `registry`.
    pub fn new(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    /// Claim the first registered device matching `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` when no device of that name is registered. A name-only
    /// lookup has no instance to report, so the error carries the
    /// placeholder `instance_id` 0.
    pub fn attach(&self, name: &str) -> Result<DeviceHandle, DeviceError> {
        let matches = self.registry.with(|r| r.match_by_name(name));
        let entry = matches.into_iter().next().ok_or_else(|| DeviceError::NotFound {
            name: name.to_owned(),
            instance_id: 0,
        })?;

        tracing::debug!(device = %entry.descriptor().label(), "attached");
        Ok(DeviceHandle { entry })
    }

    /// Claim an exact `(name, instance_id)` device.
    pub fn attach_instance(
        &self,
        name: &str,
        instance_id: u32,
    ) -> Result<DeviceHandle, DeviceError> {
        let entry = self.registry.with(|r| r.claim(name, instance_id))?;
        tracing::debug!(device = %entry.descriptor().label(), "attached");
        Ok(DeviceHandle { entry })
    }

    /// Open a session on an attached device, cursor reset to zero.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` when the descriptor's permission forbids `mode`.
    pub fn open(&self, handle: &DeviceHandle, mode: AccessMode) -> Result<Session, DeviceError> {
        let descriptor = handle.entry.descriptor();
        if !descriptor.permission.allows(mode) {
            return Err(DeviceError::PermissionDenied {
                name: descriptor.name.clone(),
                instance_id: descriptor.instance_id,
            });
        }

        tracing::debug!(device = %descriptor.label(), ?mode, "session opened");
        Ok(Session { entry: Arc::clone(&handle.entry), mode, cursor: 0 })
    }

    /// Close a session. Buffer contents persist for the next open.
    pub fn close(&self, session: Session) {
        tracing::debug!(
            device = %session.entry.descriptor().label(),
            cursor = session.cursor,
            "session closed"
        );
    }

    /// Release an attached device back to the registry.
    pub fn detach(&self, handle: DeviceHandle) {
        tracing::debug!(device = %handle.entry.descriptor().label(), "detached");
    }
}

impl Session {
    /// Descriptor of the device behind this session.
    pub fn descriptor(&self) -> &DeviceDescriptor {
        self.entry.descriptor()
    }

    /// The mode this session was opened with.
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Current cursor position.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Read up to `len` bytes at the cursor, advancing it by the actual
    /// transfer length. Zero bytes at end-of-buffer is success.
    pub fn read(&mut self, len: usize) -> Result<Bytes, DeviceError> {
        self.check_access(AccessMode::Read)?;
        let bytes = self.entry.buffer().read_at(self.cursor, len)?;
        self.cursor += bytes.len() as u64;
        Ok(bytes)
    }

    /// Write `data` at the cursor, advancing it by the bytes placed.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, DeviceError> {
        self.check_access(AccessMode::Write)?;
        let written = self.entry.buffer().write_at(self.cursor, data)?;
        self.cursor += written as u64;
        Ok(written)
    }

    /// Move the cursor. A failed seek leaves it unchanged; a position
    /// beyond capacity is allowed and clamps later transfers to zero.
    pub fn seek(&mut self, delta: i64, whence: Whence) -> Result<u64, DeviceError> {
        let position = self.entry.buffer().seek_from(self.cursor, delta, whence)?;
        self.cursor = position;
        Ok(position)
    }

    fn check_access(&self, wanted: AccessMode) -> Result<(), DeviceError> {
        let allowed = match wanted {
            AccessMode::Read => matches!(self.mode, AccessMode::Read | AccessMode::ReadWrite),
            AccessMode::Write => matches!(self.mode, AccessMode::Write | AccessMode::ReadWrite),
            AccessMode::ReadWrite => matches!(self.mode, AccessMode::ReadWrite),
        };
        if allowed {
            Ok(())
        } else {
            let descriptor = self.entry.descriptor();
            Err(DeviceError::PermissionDenied {
                name: descriptor.name.clone(),
                instance_id: descriptor.instance_id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use pcdev_core::{DeviceDescriptor, DevicePermission};
    use pcdev_sync::BufferStrategyKind;

    use super::*;
    use crate::registry::DeviceRegistry;

    fn driver_with(descriptors: Vec<DeviceDescriptor>) -> Driver {
        let registry = DeviceRegistry::shared();
        registry.with(|r| {
            for descriptor in descriptors {
                r.register(descriptor, BufferStrategyKind::Exclusive).unwrap();
            }
        });
        Driver::new(registry)
    }

    fn rw_descriptor(instance_id: u32, capacity: usize) -> DeviceDescriptor {
        DeviceDescriptor {
            name: "pcd-char-device".into(),
            instance_id,
            capacity,
            permission: DevicePermission::ReadWrite,
            serial_number: format!("PCDEV{instance_id:04}"),
        }
    }

    #[test]
    fn attach_by_name_takes_first_registered() {
        let driver = driver_with(vec![rw_descriptor(0, 512), rw_descriptor(1, 1024)]);
        let handle = driver.attach("pcd-char-device").unwrap();
        assert_eq!(handle.descriptor().instance_id, 0);
        assert_eq!(handle.descriptor().capacity, 512);
    }

    #[test]
    fn attach_unknown_name_is_not_found() {
        let driver = driver_with(vec![]);
        let err = driver.attach("pcd-char-device").unwrap_err();
        // Name-only miss: the error names the device and the documented
        // placeholder instance 0.
        assert_eq!(
            err,
            DeviceError::NotFound { name: "pcd-char-device".into(), instance_id: 0 }
        );
    }

    #[test]
    fn open_resets_cursor() {
        let driver = driver_with(vec![rw_descriptor(0, 512)]);
        let handle = driver.attach("pcd-char-device").unwrap();

        let mut session = driver.open(&handle, AccessMode::ReadWrite).unwrap();
        session.write(b"abc").unwrap();
        assert_eq!(session.cursor(), 3);
        driver.close(session);

        let session = driver.open(&handle, AccessMode::ReadWrite).unwrap();
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn open_checks_descriptor_permission() {
        let mut descriptor = rw_descriptor(0, 512);
        descriptor.permission = DevicePermission::ReadOnly;
        let driver = driver_with(vec![descriptor]);
        let handle = driver.attach("pcd-char-device").unwrap();

        assert!(driver.open(&handle, AccessMode::Read).is_ok());
        assert!(matches!(
            driver.open(&handle, AccessMode::Write),
            Err(DeviceError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn session_mode_gates_direction() {
        let driver = driver_with(vec![rw_descriptor(0, 512)]);
        let handle = driver.attach("pcd-char-device").unwrap();

        let mut reader = driver.open(&handle, AccessMode::Read).unwrap();
        assert!(matches!(reader.write(b"x"), Err(DeviceError::PermissionDenied { .. })));

        let mut writer = driver.open(&handle, AccessMode::Write).unwrap();
        assert!(matches!(writer.read(1), Err(DeviceError::PermissionDenied { .. })));
    }

    #[test]
    fn failed_seek_leaves_cursor_unchanged() {
        let driver = driver_with(vec![rw_descriptor(0, 512)]);
        let handle = driver.attach("pcd-char-device").unwrap();
        let mut session = driver.open(&handle, AccessMode::ReadWrite).unwrap();

        session.seek(10, Whence::Start).unwrap();
        let err = session.seek(-11, Whence::Current).unwrap_err();
        assert!(matches!(err, DeviceError::InvalidSeek { .. }));
        assert_eq!(session.cursor(), 10);
    }

    #[test]
    fn contents_persist_across_sessions() {
        let driver = driver_with(vec![rw_descriptor(0, 512)]);
        let handle = driver.attach("pcd-char-device").unwrap();

        let mut writer = driver.open(&handle, AccessMode::Write).unwrap();
        writer.write(b"persisted").unwrap();
        driver.close(writer);

        let mut reader = driver.open(&handle, AccessMode::Read).unwrap();
        assert_eq!(&reader.read(9).unwrap()[..], b"persisted");
    }
}
