//! Access policy attached to a device instance.

use serde::{Deserialize, Serialize};

/// Access policy fixed at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DevicePermission {
    /// Reads allowed, writes rejected.
    ReadOnly,
    /// Writes allowed, reads rejected.
    WriteOnly,
    /// Both directions allowed.
    ReadWrite,
}

/// Access mode requested when opening a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Open for reading only.
    Read,
    /// Open for writing only.
    Write,
    /// Open for reading and writing.
    ReadWrite,
}

impl DevicePermission {
    /// Whether a session opened with `mode` is allowed under this policy.
    pub fn allows(self, mode: AccessMode) -> bool {
        match (self, mode) {
            (Self::ReadWrite, _) => true,
            (Self::ReadOnly, AccessMode::Read) => true,
            (Self::WriteOnly, AccessMode::Write) => true,
            _ => false,
        }
    }

    /// Whether this policy permits reads at all.
    pub fn readable(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    /// Whether this policy permits writes at all.
    pub fn writable(self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_allows_everything() {
        for mode in [AccessMode::Read, AccessMode::Write, AccessMode::ReadWrite] {
            assert!(DevicePermission::ReadWrite.allows(mode));
        }
    }

    #[test]
    fn read_only_rejects_write_modes() {
        assert!(DevicePermission::ReadOnly.allows(AccessMode::Read));
        assert!(!DevicePermission::ReadOnly.allows(AccessMode::Write));
        assert!(!DevicePermission::ReadOnly.allows(AccessMode::ReadWrite));
    }

    #[test]
    fn write_only_rejects_read_modes() {
        assert!(DevicePermission::WriteOnly.allows(AccessMode::Write));
        assert!(!DevicePermission::WriteOnly.allows(AccessMode::Read));
        assert!(!DevicePermission::WriteOnly.allows(AccessMode::ReadWrite));
    }
}
