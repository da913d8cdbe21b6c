//! Demonstration scenarios, one per synchronization strategy.
//!
//! Every scenario spawns its fixed worker set, lets each worker run to its
//! iteration budget, joins them, and reports what was committed against
//! what was observed. Pacing is configurable down to zero so the test
//! suite runs without wall-clock delays.

use std::{
    ops::ControlFlow,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use pcdev_core::{Clock, SystemClock};
use pcdev_sync::{CounterStrategyKind, EventGate, SequenceLock, counter_for};

use crate::worker::{HarnessError, WorkerHarness, WorkerReport};

/// Which demonstration to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Two writers increment one counter under an exclusive lock.
    MutexCounter,
    /// One writer and two readers share a counter under a rw lock.
    RwCounter,
    /// One writer publishes stamped pairs; one reader snapshots them
    /// optimistically.
    SeqlockCounter,
    /// Two writers increment one counter under a busy-polling lock.
    SpinCounter,
    /// A dispatcher signals an event gate; a handler consumes the events.
    EventRelay,
}

impl Scenario {
    /// Every scenario, in demonstration order.
    pub fn all() -> [Self; 5] {
        [
            Self::MutexCounter,
            Self::RwCounter,
            Self::SeqlockCounter,
            Self::SpinCounter,
            Self::EventRelay,
        ]
    }

    /// Stable name used in logs and CLI arguments.
    pub fn name(self) -> &'static str {
        match self {
            Self::MutexCounter => "mutex",
            Self::RwCounter => "rwlock",
            Self::SeqlockCounter => "seqlock",
            Self::SpinCounter => "spinlock",
            Self::EventRelay => "waitqueue",
        }
    }
}

/// Worker pacing and budget.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioConfig {
    /// Units of work per worker.
    pub iterations: u64,
    /// Pause between units.
    pub interval: Duration,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self { iterations: 1_000, interval: Duration::ZERO }
    }
}

/// What a scenario run accomplished.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// Scenario that ran.
    pub scenario: Scenario,
    /// Wall (or injected) clock time the run took.
    pub elapsed: Duration,
    /// Per-worker iteration counts.
    pub workers: Vec<WorkerReport>,
    /// Units committed by writers (increments, or signals sent).
    pub committed: u64,
    /// Final observed state (counter value, or events received).
    pub observed: u64,
}

/// Run a scenario against the system clock.
pub fn run(scenario: Scenario, config: ScenarioConfig) -> Result<ScenarioReport, HarnessError> {
    run_with_clock(scenario, config, &SystemClock::new())
}

/// Run a scenario, timing it with the supplied clock.
pub fn run_with_clock<C: Clock>(
    scenario: Scenario,
    config: ScenarioConfig,
    clock: &C,
) -> Result<ScenarioReport, HarnessError> {
    tracing::info!(scenario = scenario.name(), iterations = config.iterations, "scenario start");
    let started = clock.now();

    let (workers, committed, observed) = match scenario {
        Scenario::MutexCounter => {
            run_counter(CounterStrategyKind::Exclusive, 2, 0, config)?
        }
        Scenario::RwCounter => run_counter(CounterStrategyKind::ReaderWriter, 1, 2, config)?,
        Scenario::SeqlockCounter => run_seqlock(config)?,
        Scenario::SpinCounter => run_counter(CounterStrategyKind::Spin, 2, 0, config)?,
        Scenario::EventRelay => run_event_relay(config)?,
    };

    let report = ScenarioReport {
        scenario,
        elapsed: clock.now() - started,
        workers,
        committed,
        observed,
    };
    tracing::info!(
        scenario = scenario.name(),
        committed = report.committed,
        observed = report.observed,
        "scenario done"
    );
    Ok(report)
}

/// Writers increment the strategy-guarded counter; readers poll it.
fn run_counter(
    kind: CounterStrategyKind,
    writers: u32,
    readers: u32,
    config: ScenarioConfig,
) -> Result<(Vec<WorkerReport>, u64, u64), HarnessError> {
    let counter = counter_for(kind);
    let mut harness = WorkerHarness::new();

    for i in 0..writers {
        let counter = Arc::clone(&counter);
        let mut remaining = config.iterations;
        harness.spawn(&format!("pcd-writer-{i}"), config.interval, move || {
            if remaining == 0 {
                return ControlFlow::Break(());
            }
            counter.add(1);
            remaining -= 1;
            ControlFlow::Continue(())
        })?;
    }

    for i in 0..readers {
        let counter = Arc::clone(&counter);
        let mut remaining = config.iterations;
        let mut last_seen = 0u64;
        harness.spawn(&format!("pcd-reader-{i}"), config.interval, move || {
            if remaining == 0 {
                return ControlFlow::Break(());
            }
            let seen = counter.load();
            debug_assert!(seen >= last_seen, "counter moved backwards");
            last_seen = seen;
            remaining -= 1;
            ControlFlow::Continue(())
        })?;
    }

    let reports = harness.join();
    let committed = u64::from(writers) * config.iterations;
    let observed = counter.load();
    Ok((reports, committed, observed))
}

/// One writer publishes `(value, stamp)` pairs; one optimistic reader
/// verifies the stamp always belongs to the value it rode in with.
fn run_seqlock(config: ScenarioConfig) -> Result<(Vec<WorkerReport>, u64, u64), HarnessError> {
    const SEAL: u64 = 0x9E37_79B9_7F4A_7C15;

    let lock = Arc::new(SequenceLock::new(0, 0));
    let torn_reads = Arc::new(AtomicU64::new(0));
    let mut harness = WorkerHarness::new();

    {
        let lock = Arc::clone(&lock);
        let mut remaining = config.iterations;
        harness.spawn("pcd-seq-writer", config.interval, move || {
            if remaining == 0 {
                return ControlFlow::Break(());
            }
            lock.modify(|value, _| (value + 1, (value + 1).wrapping_mul(SEAL)));
            remaining -= 1;
            ControlFlow::Continue(())
        })?;
    }

    {
        let lock = Arc::clone(&lock);
        let torn = Arc::clone(&torn_reads);
        let mut remaining = config.iterations;
        harness.spawn("pcd-seq-reader", config.interval, move || {
            if remaining == 0 {
                return ControlFlow::Break(());
            }
            let (value, stamp) = lock.read();
            let expected = if value == 0 { 0 } else { value.wrapping_mul(SEAL) };
            if stamp != expected {
                torn.fetch_add(1, Ordering::Relaxed);
            }
            remaining -= 1;
            ControlFlow::Continue(())
        })?;
    }

    let reports = harness.join();
    // `observed` doubles as the torn-read count: it must stay zero.
    Ok((reports, lock.read().0, torn_reads.load(Ordering::Relaxed)))
}

/// Dispatcher raises the gate; handler consumes events until canceled.
fn run_event_relay(config: ScenarioConfig) -> Result<(Vec<WorkerReport>, u64, u64), HarnessError> {
    let gate = Arc::new(EventGate::new());
    let received = Arc::new(AtomicU64::new(0));

    let mut handler = WorkerHarness::new();
    {
        let gate = Arc::clone(&gate);
        let received = Arc::clone(&received);
        handler.spawn("pcd-handler", Duration::ZERO, move || match gate.wait() {
            Ok(()) => {
                received.fetch_add(1, Ordering::Relaxed);
                ControlFlow::Continue(())
            }
            Err(_) => ControlFlow::Break(()),
        })?;
    }

    let mut dispatcher = WorkerHarness::new();
    {
        let gate = Arc::clone(&gate);
        let mut remaining = config.iterations;
        dispatcher.spawn("pcd-dispatcher", config.interval, move || {
            if remaining == 0 {
                return ControlFlow::Break(());
            }
            gate.signal();
            remaining -= 1;
            ControlFlow::Continue(())
        })?;
    }

    let mut reports = dispatcher.join();
    // All signals sent; release the handler without requiring one more.
    gate.cancel();
    reports.extend(handler.join());

    Ok((reports, config.iterations, received.load(Ordering::Relaxed)))
}
