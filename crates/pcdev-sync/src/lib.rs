//! Synchronization strategies for pcdev shared state.
//!
//! Each strategy serializes access to one shared resource: the contended
//! counter the demonstrations hammer on, or one [`DeviceBuffer`] behind the
//! driver façade. Exactly one strategy instance owns a given resource for
//! its lifetime; the variants are interchangeable policies, not stackable
//! layers.
//!
//! | Variant              | Contract                                        |
//! |----------------------|-------------------------------------------------|
//! | [`ExclusiveLock`]    | one holder at a time, read or write             |
//! | [`ReaderWriterLock`] | many readers xor one writer                     |
//! | [`SequenceLock`]     | non-blocking optimistic readers, retry on write |
//! | [`SpinLock`]         | mutual exclusion with busy-polling acquisition  |
//! | [`EventGate`]        | predicate wait/signal with cancellation         |
//!
//! [`DeviceBuffer`]: pcdev_core::DeviceBuffer

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer_strategy;
pub mod counter;
pub mod error;
pub mod exclusive;
pub mod gate;
pub mod rw;
pub mod seqlock;
pub mod spin;

pub use buffer_strategy::{BufferStrategy, BufferStrategyKind};
pub use counter::{CounterStrategyKind, SharedCounter, counter_for};
pub use error::WaitError;
pub use exclusive::ExclusiveLock;
pub use gate::EventGate;
pub use rw::ReaderWriterLock;
pub use seqlock::SequenceLock;
pub use spin::{SpinLock, SpinPolicy};
