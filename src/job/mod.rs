//! Asynchronous job orchestration: submit, poll, aggregate.

mod batch;
mod cancel;
mod client;
mod options;
mod poller;
mod status;
mod ticker;

pub use batch::{BatchItem, BatchProcessor, DocumentRequest};
pub use cancel::{CancelSource, CancelToken, Wait};
pub use client::{
    AnalysisClient, DocumentMetadata, FeatureType, JobStatus, PollResponse, SourceRef,
    SubmitResponse,
};
pub use options::{PollOptions, NEAR_DEADLINE_ATTEMPTS};
pub use poller::{JobPoller, JobResult, PollOutcome, PollState, ProcessOutcome};
pub use status::{DocumentStatus, StatusRecord};
pub use ticker::{InstantTicker, SystemTicker, Ticker};
