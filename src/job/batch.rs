//! Many documents, one bounded worker pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::{DocumentAggregator, ExtractOptions};

use super::cancel::CancelToken;
use super::client::{AnalysisClient, SourceRef};
use super::options::PollOptions;
use super::poller::{JobPoller, ProcessOutcome};
use super::status::StatusRecord;
use super::ticker::Ticker;

/// One document to process, keyed by a caller-supplied id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequest {
    /// Caller's document identifier
    pub document_id: String,
    /// Where the service reads the document
    pub source: SourceRef,
}

impl DocumentRequest {
    /// Create a request.
    pub fn new(document_id: impl Into<String>, source: SourceRef) -> Self {
        Self {
            document_id: document_id.into(),
            source,
        }
    }
}

/// Result for one [`DocumentRequest`].
#[derive(Debug)]
pub struct BatchItem {
    /// Caller's document identifier
    pub document_id: String,
    /// Outcome of submit, wait and aggregate
    pub outcome: Result<ProcessOutcome>,
}

impl BatchItem {
    /// Convert to a status record stamped with the current time.
    pub fn status_record(&self) -> StatusRecord {
        StatusRecord::from_result(&self.document_id, &self.outcome)
    }
}

/// Processes documents concurrently, each with its own independent poll loop.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    concurrency: usize,
    poll_options: PollOptions,
    aggregator: DocumentAggregator,
}

impl BatchProcessor {
    /// Create a processor running at most `concurrency` jobs at once.
    pub fn new(concurrency: usize) -> Result<Self> {
        if concurrency == 0 {
            return Err(Error::InvalidConfig(
                "concurrency must be > 0".to_string(),
            ));
        }
        Ok(Self {
            concurrency,
            poll_options: PollOptions::default(),
            aggregator: DocumentAggregator::default(),
        })
    }

    /// Set the poll options used for every document.
    pub fn with_poll_options(mut self, options: PollOptions) -> Self {
        self.poll_options = options;
        self
    }

    /// Set the extraction options used for every document.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.aggregator = DocumentAggregator::new(options);
        self
    }

    /// Maximum number of jobs in flight.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Process every request. Items come back in request order.
    ///
    /// Per-document failures are reported in their [`BatchItem`]; only pool
    /// construction and invalid options fail the whole batch.
    pub fn run<C, T>(
        &self,
        poller: &JobPoller<C, T>,
        requests: &[DocumentRequest],
        cancel: &CancelToken,
    ) -> Result<Vec<BatchItem>>
    where
        C: AnalysisClient,
        T: Ticker,
    {
        self.poll_options.validate()?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .thread_name(|i| format!("unblock-batch-{}", i))
            .build()?;

        log::debug!(
            "BatchProcessor: {} documents on {} workers",
            requests.len(),
            self.concurrency
        );

        let items: Vec<BatchItem> = pool.install(|| {
            requests
                .par_iter()
                .map(|request| {
                    let outcome = poller.process(
                        &request.source,
                        &self.poll_options,
                        &self.aggregator,
                        cancel,
                    );
                    if let Err(ref err) = outcome {
                        log::warn!("BatchProcessor: {} failed: {}", request.document_id, err);
                    }
                    BatchItem {
                        document_id: request.document_id.clone(),
                        outcome,
                    }
                })
                .collect()
        });

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::client::{PollResponse, SubmitResponse};
    use crate::job::status::DocumentStatus;
    use crate::job::ticker::InstantTicker;
    use crate::model::Block;
    use std::time::Duration;

    /// Job id is the source location; the status depends on its suffix.
    struct ByLocation;

    impl AnalysisClient for ByLocation {
        fn submit(&self, source: &SourceRef) -> Result<SubmitResponse> {
            Ok(SubmitResponse::started(source.location.clone()))
        }

        fn poll(&self, job_id: &str) -> Result<PollResponse> {
            if job_id.ends_with("bad") {
                Ok(PollResponse::failed("corrupt"))
            } else if job_id.ends_with("slow") {
                Ok(PollResponse::in_progress())
            } else {
                Ok(PollResponse::succeeded(vec![Block::line("l", job_id)]))
            }
        }
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(matches!(
            BatchProcessor::new(0),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_batch_keeps_order() {
        let poller = JobPoller::with_ticker(ByLocation, InstantTicker::new());
        let processor = BatchProcessor::new(3).unwrap().with_poll_options(
            PollOptions::new()
                .with_interval(Duration::from_secs(1))
                .with_max_attempts(3),
        );
        let requests: Vec<DocumentRequest> = ["a-ok", "b-bad", "c-slow", "d-ok"]
            .iter()
            .map(|loc| DocumentRequest::new(format!("doc-{}", loc), SourceRef::new(*loc)))
            .collect();

        let items = processor
            .run(&poller, &requests, &CancelToken::never())
            .unwrap();

        let ids: Vec<&str> = items.iter().map(|i| i.document_id.as_str()).collect();
        assert_eq!(ids, vec!["doc-a-ok", "doc-b-bad", "doc-c-slow", "doc-d-ok"]);

        let statuses: Vec<DocumentStatus> =
            items.iter().map(|i| i.status_record().status).collect();
        assert_eq!(
            statuses,
            vec![
                DocumentStatus::Completed,
                DocumentStatus::Error,
                DocumentStatus::Processing,
                DocumentStatus::Completed
            ]
        );

        let text = items[3]
            .outcome
            .as_ref()
            .ok()
            .and_then(|o| o.summary())
            .map(|s| s.full_text.clone());
        assert_eq!(text.as_deref(), Some("d-ok"));
    }

    #[test]
    fn test_empty_batch() {
        let poller = JobPoller::with_ticker(ByLocation, InstantTicker::new());
        let items = BatchProcessor::new(2)
            .unwrap()
            .run(&poller, &[], &CancelToken::never())
            .unwrap();
        assert!(items.is_empty());
    }
}
