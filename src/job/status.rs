//! Per-document status records for downstream status stores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::DocumentSummary;

use super::poller::ProcessOutcome;

/// Coarse processing status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Summary available
    Completed,
    /// Processing failed; see the error detail
    Error,
    /// Job still running when polling stopped
    Processing,
}

/// Status of one document, ready to be stored or serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Caller's document identifier
    pub document_id: String,

    /// Coarse status
    pub status: DocumentStatus,

    /// Analysis job identifier, when one was started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    /// Reconstructed document (completed only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<DocumentSummary>,

    /// Error detail (error only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// When this record was produced
    pub updated_at: DateTime<Utc>,
}

impl StatusRecord {
    /// Map a processing result to a status record.
    pub fn from_result(document_id: &str, result: &Result<ProcessOutcome>) -> Self {
        let mut record = Self {
            document_id: document_id.to_string(),
            status: DocumentStatus::Error,
            job_id: None,
            summary: None,
            error: None,
            updated_at: Utc::now(),
        };

        match result {
            Ok(ProcessOutcome::Completed { summary, result }) => {
                record.status = DocumentStatus::Completed;
                record.job_id = Some(result.job_id.clone());
                record.summary = Some(summary.clone());
            }
            Ok(ProcessOutcome::Processing { job_id }) => {
                record.status = DocumentStatus::Processing;
                record.job_id = Some(job_id.clone());
            }
            Err(err) => {
                record.job_id = err.job_id().map(String::from);
                record.error = Some(err.to_string());
            }
        }

        record
    }

    /// Whether no further updates are expected for this document.
    pub fn is_final(&self) -> bool {
        self.status != DocumentStatus::Processing
    }
}
