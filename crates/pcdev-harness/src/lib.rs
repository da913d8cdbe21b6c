//! Worker harness for exercising pcdev synchronization strategies.
//!
//! Each demonstration spawns a small fixed set of worker threads (writers,
//! readers, or a dispatcher/handler pair) that hammer one shared resource
//! through a chosen strategy until a cooperative stop signal. Nothing here
//! is a process-wide singleton: every demonstration owns its counter, its
//! gate, and its stop source, and tears them down when the workers join.
//!
//! # Model-Based Testing
//!
//! The `model` module provides a reference device implementation for
//! model-based testing. Operations are applied to both the model and the
//! real driver façade, and their observable outcomes are compared.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
pub mod scenario;
pub mod stop;
pub mod ticker;
pub mod worker;

pub use model::{ModelDevice, OpOutcome, Operation, OutcomeError, random_operations};
pub use scenario::{Scenario, ScenarioConfig, ScenarioReport, run, run_with_clock};
pub use stop::{StopSource, StopToken};
pub use ticker::Ticker;
pub use worker::{HarnessError, WorkerHarness, WorkerReport};
