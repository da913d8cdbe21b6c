//! Worker thread supervision.
//!
//! A harness spawns a small fixed set of named worker threads. Each worker
//! loops: one unit of work, then a cancelable pause. Workers either break
//! themselves (iteration budget exhausted) or exit when the harness
//! requests stop; either way they complete any in-progress critical
//! section before leaving the loop.

use std::{ops::ControlFlow, thread, time::Duration};

use thiserror::Error;

use crate::stop::{StopSource, StopToken};

/// Harness failures.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker {name}")]
    Spawn {
        /// Name the worker would have carried.
        name: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },
}

/// What one worker accomplished before exiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    /// Thread name the worker ran under.
    pub name: String,
    /// Units of work completed.
    pub iterations: u64,
}

/// Spawns and supervises a fixed set of worker threads.
#[derive(Debug, Default)]
pub struct WorkerHarness {
    stop: StopSource,
    workers: Vec<thread::JoinHandle<WorkerReport>>,
}

impl WorkerHarness {
    /// Create an empty harness.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token sharing this harness's stop signal.
    pub fn token(&self) -> StopToken {
        self.stop.token()
    }

    /// Spawn a named worker.
    ///
    /// `unit` performs one unit of work; returning `Break` retires the
    /// worker. Between units the worker pauses for `interval`, which a
    /// stop request interrupts.
    pub fn spawn<F>(
        &mut self,
        name: &str,
        interval: Duration,
        mut unit: F,
    ) -> Result<(), HarnessError>
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let token = self.stop.token();
        let worker_name = name.to_owned();
        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                tracing::debug!(worker = %worker_name, "worker started");
                let mut iterations = 0u64;
                loop {
                    if token.should_stop() {
                        break;
                    }
                    match unit() {
                        ControlFlow::Break(()) => break,
                        ControlFlow::Continue(()) => iterations += 1,
                    }
                    if token.pause(interval) {
                        break;
                    }
                }
                tracing::debug!(worker = %worker_name, iterations, "worker exited");
                WorkerReport { name: worker_name, iterations }
            })
            .map_err(|source| HarnessError::Spawn { name: name.to_owned(), source })?;

        self.workers.push(handle);
        Ok(())
    }

    /// Request stop and join every worker.
    pub fn shutdown(self) -> Vec<WorkerReport> {
        self.stop.request_stop();
        Self::join_all(self.workers)
    }

    /// Join workers that retire themselves, without raising stop.
    pub fn join(self) -> Vec<WorkerReport> {
        Self::join_all(self.workers)
    }

    fn join_all(workers: Vec<thread::JoinHandle<WorkerReport>>) -> Vec<WorkerReport> {
        workers
            .into_iter()
            .filter_map(|handle| match handle.join() {
                Ok(report) => Some(report),
                Err(_) => {
                    tracing::error!("worker panicked");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    use super::*;

    #[test]
    fn budgeted_worker_retires_itself() {
        let mut harness = WorkerHarness::new();
        let count = Arc::new(AtomicU64::new(0));
        let mut remaining = 10u64;

        let counted = Arc::clone(&count);
        harness
            .spawn("budget-worker", Duration::ZERO, move || {
                if remaining == 0 {
                    return ControlFlow::Break(());
                }
                remaining -= 1;
                counted.fetch_add(1, Ordering::Relaxed);
                ControlFlow::Continue(())
            })
            .unwrap();

        let reports = harness.join();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].iterations, 10);
        assert_eq!(count.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn shutdown_stops_unbounded_workers() {
        let mut harness = WorkerHarness::new();
        for i in 0..3 {
            harness
                .spawn(&format!("spinner-{i}"), Duration::from_millis(1), || {
                    ControlFlow::Continue(())
                })
                .unwrap();
        }

        std::thread::sleep(Duration::from_millis(20));
        let reports = harness.shutdown();
        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.iterations > 0));
    }

    #[test]
    fn worker_blocked_in_pause_exits_on_stop() {
        let mut harness = WorkerHarness::new();
        harness
            .spawn("sleeper", Duration::from_secs(60), || ControlFlow::Continue(()))
            .unwrap();

        std::thread::sleep(Duration::from_millis(20));
        let start = std::time::Instant::now();
        let reports = harness.shutdown();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(reports.len(), 1);
    }
}
