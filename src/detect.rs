//! Raw analysis result detection and decoding.
//!
//! A saved analysis result is either a bare JSON array of blocks or a full
//! status-query response with `JobStatus`, `Blocks` and `DocumentMetadata`.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::job::{DocumentMetadata, JobStatus};
use crate::model::Block;

/// Shape of a raw analysis result document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// A bare `[ {block}, ... ]` array
    BlockList,
    /// A `{ "JobStatus": ..., "Blocks": [...] }` envelope
    PollResponse,
}

impl std::fmt::Display for ResultShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultShape::BlockList => write!(f, "block list"),
            ResultShape::PollResponse => write!(f, "poll response"),
        }
    }
}

/// A decoded raw result, regardless of its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResult {
    /// Shape the input had
    pub shape: ResultShape,
    /// Blocks in document order
    pub blocks: Vec<Block>,
    /// Page count from the envelope metadata
    pub page_count: Option<u32>,
    /// Job status from the envelope
    pub job_status: Option<JobStatus>,
    /// Status message from the envelope
    pub status_message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope {
    #[serde(default)]
    job_status: Option<JobStatus>,
    #[serde(default)]
    status_message: Option<String>,
    #[serde(default)]
    blocks: Option<Vec<Block>>,
    #[serde(default)]
    document_metadata: Option<DocumentMetadata>,
}

/// Detect the shape of a raw result from its first significant character.
///
/// # Returns
/// * `Ok(ResultShape)` for a JSON array or object
/// * `Err(Error::UnknownFormat)` for anything else
pub fn detect_result_shape(input: &str) -> Result<ResultShape> {
    let trimmed = input.trim_start_matches('\u{feff}').trim_start();
    match trimmed.chars().next() {
        Some('[') => Ok(ResultShape::BlockList),
        Some('{') => Ok(ResultShape::PollResponse),
        Some(c) => Err(Error::UnknownFormat(format!(
            "expected a JSON array or object, found {:?}",
            c
        ))),
        None => Err(Error::UnknownFormat("empty input".to_string())),
    }
}

/// Decode a raw result of either shape.
///
/// An envelope must carry `Blocks` or `JobStatus`; an object with neither is
/// rejected as [`Error::UnknownFormat`].
pub fn parse_raw_result(input: &str) -> Result<RawResult> {
    let shape = detect_result_shape(input)?;
    let body = input.trim_start_matches('\u{feff}');

    let raw = match shape {
        ResultShape::BlockList => RawResult {
            shape,
            blocks: serde_json::from_str(body)?,
            page_count: None,
            job_status: None,
            status_message: None,
        },
        ResultShape::PollResponse => {
            let envelope: Envelope = serde_json::from_str(body)?;
            if envelope.blocks.is_none() && envelope.job_status.is_none() {
                return Err(Error::UnknownFormat(
                    "object has neither Blocks nor JobStatus".to_string(),
                ));
            }
            RawResult {
                shape,
                blocks: envelope.blocks.unwrap_or_default(),
                page_count: envelope.document_metadata.and_then(|m| m.pages),
                job_status: envelope.job_status,
                status_message: envelope.status_message,
            }
        }
    };

    log::debug!(
        "detect: {} with {} blocks, status {:?}",
        raw.shape,
        raw.blocks.len(),
        raw.job_status
    );
    Ok(raw)
}

/// Read and decode a raw result file.
///
/// # Example
/// ```no_run
/// use unblock::detect::read_raw_result;
///
/// let raw = read_raw_result("analysis.json").unwrap();
/// println!("{} blocks", raw.blocks.len());
/// ```
pub fn read_raw_result<P: AsRef<Path>>(path: P) -> Result<RawResult> {
    let input = fs::read_to_string(path)?;
    parse_raw_result(&input)
}
