//! Error types for unblock library.

use std::io;
use thiserror::Error;

/// Result type alias for unblock operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while orchestrating or reconstructing an analysis job.
///
/// A timed-out job is not an error; see [`crate::job::PollOutcome::TimedOut`].
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The raw analysis result is not valid JSON or does not match the block schema.
    #[error("Invalid analysis result: {0}")]
    Json(#[from] serde_json::Error),

    /// The input is neither a block list nor a poll response envelope.
    #[error("Unknown result format: {0}")]
    UnknownFormat(String),

    /// The analysis service accepted the request but returned no job identifier.
    #[error("Analysis service returned no job identifier for {0}")]
    Submission(String),

    /// The analysis service reported a terminal failure for the job.
    #[error("Analysis job {job_id} failed: {reason}")]
    JobFailed {
        /// Job identifier
        job_id: String,
        /// Status message from the service, verbatim
        reason: String,
    },

    /// A request to the analysis service could not be completed.
    #[error("Analysis service request failed: {0}")]
    Transport(String),

    /// A status query failed too close to the polling deadline to keep retrying.
    #[error("Polling job {job_id} failed on attempt {attempt}: {message}")]
    PollTransient {
        /// Job identifier
        job_id: String,
        /// 1-based attempt number that failed
        attempt: u32,
        /// Underlying failure
        message: String,
    },

    /// The caller cancelled the poll loop.
    #[error("Polling job {0} was cancelled")]
    Cancelled(String),

    /// Invalid polling or batch configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Whether the error came from a single failed service round-trip
    /// rather than from the job itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::PollTransient { .. })
    }

    /// Job identifier attached to the error, if any.
    pub fn job_id(&self) -> Option<&str> {
        match self {
            Error::JobFailed { job_id, .. } | Error::PollTransient { job_id, .. } => Some(job_id),
            Error::Cancelled(job_id) => Some(job_id),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(err.to_string())
    }
}
