//! Periodic task with explicit cancellation.
//!
//! The classic re-arming kernel timer expressed as an interval loop on a
//! dedicated thread: fire the callback every `interval` until canceled.
//! The pause between firings rides the stop condvar, so cancellation never
//! waits out a full interval.

use std::{thread, time::Duration};

use crate::{
    stop::StopSource,
    worker::HarnessError,
};

/// Repeating timer firing a callback until canceled.
#[derive(Debug)]
pub struct Ticker {
    stop: StopSource,
    handle: thread::JoinHandle<u64>,
}

impl Ticker {
    /// Start a ticker firing `tick` every `interval`.
    pub fn spawn<F>(name: &str, interval: Duration, mut tick: F) -> Result<Self, HarnessError>
    where
        F: FnMut() + Send + 'static,
    {
        let stop = StopSource::new();
        let token = stop.token();
        let handle = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || {
                let mut fired = 0u64;
                while !token.pause(interval) {
                    tick();
                    fired += 1;
                }
                fired
            })
            .map_err(|source| HarnessError::Spawn { name: name.to_owned(), source })?;

        Ok(Self { stop, handle })
    }

    /// Cancel the ticker and wait for it, returning how often it fired.
    pub fn cancel(self) -> u64 {
        self.stop.request_stop();
        self.handle.join().unwrap_or(0)
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
    fn ticker_fires_until_canceled() {
        let count = Arc::new(AtomicU64::new(0));
        let counted = Arc::clone(&count);
        let ticker = Ticker::spawn("test-ticker", Duration::from_millis(1), move || {
            counted.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();

        thread::sleep(Duration::from_millis(30));
        let fired = ticker.cancel();

        assert!(fired > 0);
        assert_eq!(fired, count.load(Ordering::Relaxed));
    }

    #[test]
    fn cancel_does_not_wait_out_the_interval() {
        let ticker =
            Ticker::spawn("slow-ticker", Duration::from_secs(60), || {}).unwrap();

        let start = std::time::Instant::now();
        let fired = ticker.cancel();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(fired, 0);
    }
}
