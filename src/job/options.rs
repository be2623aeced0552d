//! Polling options and configuration.

use std::time::Duration;

use crate::error::{Error, Result};

/// Number of final attempts during which a failed status query aborts the
/// loop instead of being retried.
pub const NEAR_DEADLINE_ATTEMPTS: u32 = 5;

/// Options for waiting on an analysis job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    /// Wait before every status query
    pub poll_interval: Duration,

    /// Maximum number of status queries
    pub max_attempts: u32,
}

impl PollOptions {
    /// Create new poll options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wait between status queries.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the maximum number of status queries.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Upper bound on time spent waiting between queries.
    pub fn timeout(&self) -> Duration {
        self.poll_interval.saturating_mul(self.max_attempts)
    }

    /// Whether a failure on the given 0-based attempt should end the loop.
    ///
    /// True for the last [`NEAR_DEADLINE_ATTEMPTS`] attempts, and therefore
    /// for every attempt when `max_attempts` is that small.
    pub fn is_near_deadline(&self, attempt_index: u32) -> bool {
        attempt_index >= self.max_attempts.saturating_sub(NEAR_DEADLINE_ATTEMPTS)
    }

    /// Check that the options describe a loop that can run at least once.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidConfig(
                "max_attempts must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}
