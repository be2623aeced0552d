//! Cancellation of poll loops.
//!
//! A [`CancelSource`] hands out [`CancelToken`]s. Cancelling the source, or
//! dropping it, wakes every token at once, including tokens currently blocked
//! in [`CancelToken::wait`]. Cancellation is signalled by disconnecting a
//! zero-capacity channel, so it needs no polling and no extra thread.

use std::sync::Mutex;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

/// Result of a cancellable wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// The full interval passed
    Elapsed,
    /// The token was cancelled before the interval passed
    Cancelled,
}

/// Owner side of a cancellation signal.
#[derive(Debug)]
pub struct CancelSource {
    sender: Mutex<Option<Sender<()>>>,
    receiver: Receiver<()>,
}

impl CancelSource {
    /// Create a new, uncancelled source.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::bounded(0);
        Self {
            sender: Mutex::new(Some(sender)),
            receiver,
        }
    }

    /// Get a token observing this source.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            receiver: self.receiver.clone(),
        }
    }

    /// Cancel every token handed out by this source. Idempotent.
    pub fn cancel(&self) {
        let mut sender = match self.sender.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if sender.take().is_some() {
            log::debug!("CancelSource: cancelled");
        }
    }

    /// Check whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.token().is_cancelled()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer side of a cancellation signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelToken {
    receiver: Receiver<()>,
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        Self {
            receiver: crossbeam_channel::never(),
        }
    }

    /// Check whether the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        !matches!(self.receiver.try_recv(), Err(TryRecvError::Empty))
    }

    /// Block for `interval` or until cancelled, whichever comes first.
    pub fn wait(&self, interval: Duration) -> Wait {
        match self.receiver.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => Wait::Elapsed,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => Wait::Cancelled,
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::never()
    }
}
