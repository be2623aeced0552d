//! Analysis service client abstraction.
//!
//! The orchestrator never talks HTTP itself. It drives any type implementing
//! [`AnalysisClient`], which keeps the service SDK, authentication and
//! storage access out of this crate and lets tests script the service.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Block;

/// Analysis features to request for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    /// Table and cell detection
    Tables,
    /// Key/value form detection
    Forms,
}

/// Location of a source document plus the features to run on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Where the service can read the document (e.g. `s3://bucket/key`)
    pub location: String,

    /// Requested analysis features
    pub features: Vec<FeatureType>,
}

impl SourceRef {
    /// Reference a document, requesting tables and forms.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            features: vec![FeatureType::Tables, FeatureType::Forms],
        }
    }

    /// Replace the requested features.
    pub fn with_features(mut self, features: impl IntoIterator<Item = FeatureType>) -> Self {
        self.features = features.into_iter().collect();
        self
    }
}

/// Reply to a job submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubmitResponse {
    /// Identifier of the started job; absent when the service did not start one
    #[serde(default)]
    pub job_id: Option<String>,
}

impl SubmitResponse {
    /// Create a response carrying a job id.
    pub fn started(job_id: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id.into()),
        }
    }
}

/// Job status as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Still running
    InProgress,
    /// Finished; blocks are available
    Succeeded,
    /// Finished with an error
    Failed,
}

/// Document-level metadata in a poll response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentMetadata {
    /// Number of pages analysed
    #[serde(default)]
    pub pages: Option<u32>,
}

/// Reply to a status query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PollResponse {
    /// Current job status
    pub job_status: JobStatus,

    /// Human-readable status detail (set on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,

    /// Result blocks (set on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,

    /// Document metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_metadata: Option<DocumentMetadata>,
}

impl PollResponse {
    /// A response for a job that is still running.
    pub fn in_progress() -> Self {
        Self {
            job_status: JobStatus::InProgress,
            status_message: None,
            blocks: None,
            document_metadata: None,
        }
    }

    /// A successful response carrying blocks.
    pub fn succeeded(blocks: Vec<Block>) -> Self {
        Self {
            job_status: JobStatus::Succeeded,
            blocks: Some(blocks),
            ..Self::in_progress()
        }
    }

    /// A failed response with the service's message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            job_status: JobStatus::Failed,
            status_message: Some(message.into()),
            ..Self::in_progress()
        }
    }

    /// Set the reported page count and return self.
    pub fn with_pages(mut self, pages: u32) -> Self {
        self.document_metadata = Some(DocumentMetadata { pages: Some(pages) });
        self
    }

    /// Page count reported by the service, if any.
    pub fn page_count(&self) -> Option<u32> {
        self.document_metadata.as_ref().and_then(|m| m.pages)
    }
}

/// Interface to the external analysis service.
///
/// Implementations map their own transport failures to
/// [`Error::Transport`](crate::Error::Transport). Both calls must be safe to
/// issue from several threads at once; the poller itself never overlaps calls
/// for one job.
pub trait AnalysisClient: Send + Sync {
    /// Start an analysis job for the given document.
    fn submit(&self, source: &SourceRef) -> Result<SubmitResponse>;

    /// Query the status of a job.
    fn poll(&self, job_id: &str) -> Result<PollResponse>;
}

impl<C: AnalysisClient + ?Sized> AnalysisClient for &C {
    fn submit(&self, source: &SourceRef) -> Result<SubmitResponse> {
        (**self).submit(source)
    }

    fn poll(&self, job_id: &str) -> Result<PollResponse> {
        (**self).poll(job_id)
    }
}

impl<C: AnalysisClient + ?Sized> AnalysisClient for std::sync::Arc<C> {
    fn submit(&self, source: &SourceRef) -> Result<SubmitResponse> {
        (**self).submit(source)
    }

    fn poll(&self, job_id: &str) -> Result<PollResponse> {
        (**self).poll(job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_poll_response() {
        let json = r#"{
            "JobStatus": "SUCCEEDED",
            "DocumentMetadata": {"Pages": 2},
            "Blocks": [{"BlockType": "PAGE", "Id": "p1"}]
        }"#;
        let response: PollResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.job_status, JobStatus::Succeeded);
        assert_eq!(response.page_count(), Some(2));
        assert_eq!(response.blocks.map(|b| b.len()), Some(1));
    }

    #[test]
    fn test_decode_failed_response() {
        let json = r#"{"JobStatus": "FAILED", "StatusMessage": "Unsupported document"}"#;
        let response: PollResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.job_status, JobStatus::Failed);
        assert_eq!(response.status_message.as_deref(), Some("Unsupported document"));
        assert_eq!(response.page_count(), None);
    }

    #[test]
    fn test_source_ref_features() {
        let source = SourceRef::new("s3://docs/a.pdf");
        assert_eq!(source.features, vec![FeatureType::Tables, FeatureType::Forms]);

        let source = source.with_features([FeatureType::Forms]);
        assert_eq!(source.features, vec![FeatureType::Forms]);
    }

    #[test]
    fn test_submit_response() {
        let json = r#"{}"#;
        let response: SubmitResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.job_id, None);
        assert_eq!(SubmitResponse::started("j").job_id.as_deref(), Some("j"));
    }
}
