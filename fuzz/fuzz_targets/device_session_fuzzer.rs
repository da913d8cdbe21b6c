//! Fuzz target for device sessions
//!
//! Drive arbitrary read/write/seek sequences through a session and check
//! the clamp contract never breaks.
//!
//! # Strategy
//!
//! - Operation sequences: Arbitrary reads, writes, and seeks
//! - Capacity probing: Tiny and zero-capacity devices
//! - Cursor abuse: Seeks far past the end, negative displacements
//! - Strategy coverage: Exclusive, reader-writer, and spin bindings
//!
//! # Invariants
//!
//! - NEVER panic, whatever the sequence
//! - A read never returns more bytes than requested or than capacity
//! - A write never reports more bytes placed than were supplied
//! - The cursor only advances by the reported transfer length
//! - A failed operation leaves the cursor untouched

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pcdev_core::{AccessMode, DeviceDescriptor, DevicePermission, Whence};
use pcdev_driver::{Driver, registry::DeviceRegistry};
use pcdev_sync::BufferStrategyKind;

#[derive(Debug, Arbitrary)]
enum SessionOp {
    Read { len: u16 },
    Write { seed: u8, len: u16 },
    Seek { delta: i32, whence: FuzzWhence },
}

#[derive(Debug, Arbitrary)]
enum FuzzWhence {
    Start,
    Current,
    End,
}

impl From<&FuzzWhence> for Whence {
    fn from(w: &FuzzWhence) -> Self {
        match w {
            FuzzWhence::Start => Whence::Start,
            FuzzWhence::Current => Whence::Current,
            FuzzWhence::End => Whence::End,
        }
    }
}

#[derive(Debug, Arbitrary)]
enum FuzzStrategy {
    Exclusive,
    ReaderWriter,
    Spin,
}

#[derive(Debug, Arbitrary)]
struct FuzzCase {
    capacity: u16,
    strategy: FuzzStrategy,
    ops: Vec<SessionOp>,
}

fuzz_target!(|case: FuzzCase| {
    let kind = match case.strategy {
        FuzzStrategy::Exclusive => BufferStrategyKind::Exclusive,
        FuzzStrategy::ReaderWriter => BufferStrategyKind::ReaderWriter,
        FuzzStrategy::Spin => BufferStrategyKind::Spin,
    };

    let registry = DeviceRegistry::shared();
    let registered = registry.with(|r| {
        r.register(
            DeviceDescriptor {
                name: "pcd-char-device".into(),
                instance_id: 0,
                capacity: case.capacity as usize,
                permission: DevicePermission::ReadWrite,
                serial_number: "PCDEV-FUZZ".into(),
            },
            kind,
        )
        .is_ok()
    });
    assert!(registered);

    let driver = Driver::new(registry);
    let handle = driver.attach("pcd-char-device").expect("device just registered");
    let mut session = driver.open(&handle, AccessMode::ReadWrite).expect("read-write device");

    let capacity = case.capacity as u64;
    for op in &case.ops {
        let before = session.cursor();
        match op {
            SessionOp::Read { len } => match session.read(*len as usize) {
                Ok(bytes) => {
                    assert!(bytes.len() <= *len as usize);
                    assert!(bytes.len() as u64 <= capacity);
                    assert_eq!(session.cursor(), before + bytes.len() as u64);
                }
                Err(_) => assert_eq!(session.cursor(), before),
            },
            SessionOp::Write { seed, len } => {
                let payload: Vec<u8> =
                    (0..*len).map(|i| seed.wrapping_add(i as u8)).collect();
                match session.write(&payload) {
                    Ok(written) => {
                        assert!(written <= payload.len());
                        assert_eq!(session.cursor(), before + written as u64);
                    }
                    Err(_) => assert_eq!(session.cursor(), before),
                }
            }
            SessionOp::Seek { delta, whence } => {
                match session.seek(i64::from(*delta), Whence::from(whence)) {
                    Ok(position) => assert_eq!(session.cursor(), position),
                    Err(_) => assert_eq!(session.cursor(), before),
                }
            }
        }
    }
});
