//! Job submission and the bounded poll loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::DocumentAggregator;
use crate::model::{Block, DocumentSummary};

use super::cancel::{CancelToken, Wait};
use super::client::{AnalysisClient, JobStatus, PollResponse, SourceRef};
use super::options::PollOptions;
use super::ticker::{SystemTicker, Ticker};

/// Lifecycle of one job as seen by the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PollState {
    /// Job id received, no status observed yet
    Submitted,
    /// Service reported the job as running
    InProgress,
    /// Service reported success
    Succeeded,
    /// Service reported failure
    Failed,
    /// Attempt budget exhausted while the job was still running
    TimedOut,
}

impl PollState {
    /// Whether no further transitions are possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PollState::Succeeded | PollState::Failed | PollState::TimedOut
        )
    }

    /// Apply an observed service status. Terminal states are sticky.
    pub fn advance(self, status: JobStatus) -> PollState {
        if self.is_terminal() {
            return self;
        }
        match status {
            JobStatus::InProgress => PollState::InProgress,
            JobStatus::Succeeded => PollState::Succeeded,
            JobStatus::Failed => PollState::Failed,
        }
    }

    /// Apply attempt exhaustion. Terminal states are sticky.
    pub fn time_out(self) -> PollState {
        if self.is_terminal() {
            self
        } else {
            PollState::TimedOut
        }
    }
}

/// Raw result of a successful job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResult {
    /// Job identifier
    pub job_id: String,

    /// Blocks returned by the service
    pub blocks: Vec<Block>,

    /// Page count reported by the service
    pub page_count: Option<u32>,

    /// Status message, if the service sent one
    pub status_message: Option<String>,

    /// Number of status queries it took
    pub attempts: u32,

    /// When the success was observed
    pub completed_at: DateTime<Utc>,
}

impl JobResult {
    fn from_response(job_id: &str, response: PollResponse, attempts: u32) -> Self {
        let page_count = response.page_count();
        Self {
            job_id: job_id.to_string(),
            blocks: response.blocks.unwrap_or_default(),
            page_count,
            status_message: response.status_message,
            attempts,
            completed_at: Utc::now(),
        }
    }
}

/// Non-error outcome of [`JobPoller::await_completion`].
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The job succeeded
    Succeeded(JobResult),
    /// The job was still running when the attempt budget ran out
    TimedOut {
        /// Job identifier
        job_id: String,
        /// Status queries issued
        attempts: u32,
    },
}

impl PollOutcome {
    /// Whether the job timed out.
    pub fn is_timed_out(&self) -> bool {
        matches!(self, PollOutcome::TimedOut { .. })
    }

    /// Job identifier.
    pub fn job_id(&self) -> &str {
        match self {
            PollOutcome::Succeeded(result) => &result.job_id,
            PollOutcome::TimedOut { job_id, .. } => job_id,
        }
    }

    /// Terminal state this outcome corresponds to.
    pub fn state(&self) -> PollState {
        match self {
            PollOutcome::Succeeded(_) => PollState::Succeeded,
            PollOutcome::TimedOut { .. } => PollState::TimedOut,
        }
    }
}

/// Outcome of [`JobPoller::process`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// Job finished and its blocks were aggregated
    Completed {
        /// Reconstructed document
        summary: DocumentSummary,
        /// Raw job result
        result: JobResult,
    },
    /// Job still running after the attempt budget; it may be picked up later
    Processing {
        /// Job identifier
        job_id: String,
    },
}

impl ProcessOutcome {
    /// Summary, when the job completed.
    pub fn summary(&self) -> Option<&DocumentSummary> {
        match self {
            ProcessOutcome::Completed { summary, .. } => Some(summary),
            ProcessOutcome::Processing { .. } => None,
        }
    }

    /// Job identifier.
    pub fn job_id(&self) -> &str {
        match self {
            ProcessOutcome::Completed { result, .. } => &result.job_id,
            ProcessOutcome::Processing { job_id } => job_id,
        }
    }
}

/// Drives one analysis job from submission to a terminal state.
///
/// Holds no per-job state: every call to [`await_completion`] owns its own
/// attempt counter, so one poller can serve many jobs from many threads.
///
/// [`await_completion`]: JobPoller::await_completion
#[derive(Debug, Clone)]
pub struct JobPoller<C, T = SystemTicker> {
    client: C,
    ticker: T,
}

impl<C: AnalysisClient> JobPoller<C, SystemTicker> {
    /// Create a poller that waits on the wall clock.
    pub fn new(client: C) -> Self {
        Self::with_ticker(client, SystemTicker)
    }
}

impl<C: AnalysisClient, T: Ticker> JobPoller<C, T> {
    /// Create a poller with a custom wait source.
    pub fn with_ticker(client: C, ticker: T) -> Self {
        Self { client, ticker }
    }

    /// Get the client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Get the ticker.
    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// Start a job and return its identifier.
    pub fn submit(&self, source: &SourceRef) -> Result<String> {
        let response = self.client.submit(source)?;
        match response.job_id {
            Some(job_id) if !job_id.trim().is_empty() => {
                log::debug!("JobPoller: submitted {} as job {}", source.location, job_id);
                Ok(job_id)
            }
            _ => Err(Error::Submission(source.location.clone())),
        }
    }

    /// Poll a job until it reaches a terminal state or the attempt budget
    /// runs out.
    ///
    /// Every attempt waits `poll_interval` first, then queries the status
    /// once. A failed query is retried on the next attempt unless it falls
    /// within the final [`NEAR_DEADLINE_ATTEMPTS`] attempts, in which case it
    /// is returned as [`Error::PollTransient`].
    ///
    /// [`NEAR_DEADLINE_ATTEMPTS`]: super::options::NEAR_DEADLINE_ATTEMPTS
    pub fn await_completion(
        &self,
        job_id: &str,
        options: &PollOptions,
        cancel: &CancelToken,
    ) -> Result<PollOutcome> {
        options.validate()?;

        let mut state = PollState::Submitted;

        for attempt in 0..options.max_attempts {
            if self.ticker.wait(options.poll_interval, cancel) == Wait::Cancelled {
                log::debug!(
                    "JobPoller: job {} cancelled after {} attempts",
                    job_id,
                    attempt
                );
                return Err(Error::Cancelled(job_id.to_string()));
            }

            let response = match self.client.poll(job_id) {
                Ok(response) => response,
                Err(err) if options.is_near_deadline(attempt) => {
                    return Err(Error::PollTransient {
                        job_id: job_id.to_string(),
                        attempt: attempt + 1,
                        message: err.to_string(),
                    });
                }
                Err(err) => {
                    log::warn!(
                        "JobPoller: status query {} for job {} failed, retrying: {}",
                        attempt + 1,
                        job_id,
                        err
                    );
                    continue;
                }
            };

            state = state.advance(response.job_status);
            match state {
                PollState::Succeeded => {
                    log::debug!(
                        "JobPoller: job {} succeeded after {} attempts",
                        job_id,
                        attempt + 1
                    );
                    return Ok(PollOutcome::Succeeded(JobResult::from_response(
                        job_id,
                        response,
                        attempt + 1,
                    )));
                }
                PollState::Failed => {
                    return Err(Error::JobFailed {
                        job_id: job_id.to_string(),
                        reason: response.status_message.unwrap_or_default(),
                    });
                }
                _ => log::debug!("JobPoller: job {} in progress ({})", job_id, attempt + 1),
            }
        }

        log::warn!(
            "JobPoller: job {} {:?} after {} attempts",
            job_id,
            state.time_out(),
            options.max_attempts
        );
        Ok(PollOutcome::TimedOut {
            job_id: job_id.to_string(),
            attempts: options.max_attempts,
        })
    }

    /// Submit, wait and aggregate in one call.
    ///
    /// A timed-out job yields [`ProcessOutcome::Processing`] with its id.
    pub fn process(
        &self,
        source: &SourceRef,
        options: &PollOptions,
        aggregator: &DocumentAggregator,
        cancel: &CancelToken,
    ) -> Result<ProcessOutcome> {
        let job_id = self.submit(source)?;

        match self.await_completion(&job_id, options, cancel)? {
            PollOutcome::Succeeded(result) => {
                let summary = aggregator.aggregate(&result.blocks, result.page_count);
                Ok(ProcessOutcome::Completed { summary, result })
            }
            PollOutcome::TimedOut { job_id, .. } => Ok(ProcessOutcome::Processing { job_id }),
        }
    }
}
