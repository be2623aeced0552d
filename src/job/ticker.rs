//! Wait abstraction used between status queries.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use super::cancel::{CancelToken, Wait};

/// Something that can block for an interval, subject to cancellation.
pub trait Ticker: Send + Sync {
    /// Wait for `interval`, returning early with [`Wait::Cancelled`] when the
    /// token fires.
    fn wait(&self, interval: Duration, cancel: &CancelToken) -> Wait;
}

impl<T: Ticker + ?Sized> Ticker for &T {
    fn wait(&self, interval: Duration, cancel: &CancelToken) -> Wait {
        (**self).wait(interval, cancel)
    }
}

/// Wall-clock ticker.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTicker;

impl Ticker for SystemTicker {
    fn wait(&self, interval: Duration, cancel: &CancelToken) -> Wait {
        cancel.wait(interval)
    }
}

/// Ticker that never sleeps.
///
/// Records how many waits were requested and the virtual time they add up
/// to. Honours cancellation that has already happened.
#[derive(Debug, Default)]
pub struct InstantTicker {
    waits: AtomicUsize,
    elapsed_nanos: AtomicU64,
}

impl InstantTicker {
    /// Create a new ticker with no recorded waits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of waits that ran to completion.
    pub fn waits(&self) -> usize {
        self.waits.load(Ordering::SeqCst)
    }

    /// Sum of completed wait intervals.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }
}

impl Ticker for InstantTicker {
    fn wait(&self, interval: Duration, cancel: &CancelToken) -> Wait {
        if cancel.is_cancelled() {
            return Wait::Cancelled;
        }
        let nanos = u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX);
        self.waits.fetch_add(1, Ordering::SeqCst);
        self.elapsed_nanos.fetch_add(nanos, Ordering::SeqCst);
        Wait::Elapsed
    }
}
