//! # unblock
//!
//! Orchestration and reconstruction for asynchronous document-analysis jobs.
//!
//! This library submits documents to an external OCR/layout-analysis
//! service, polls the resulting job until it finishes, and rebuilds the flat
//! block graph the service returns into full text, tables and form fields,
//! plus best-effort invoice fields (amount, date, vendor).
//!
//! ## Quick Start
//!
//! ```no_run
//! use unblock::{analyze_file, render};
//!
//! fn main() -> unblock::Result<()> {
//!     // Reconstruct a saved analysis result
//!     let summary = analyze_file("analysis.json")?;
//!
//!     // Convert to Markdown
//!     let options = render::RenderOptions::default();
//!     let markdown = render::to_markdown(&summary, &options)?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded polling**: cancellable poll loop with a fixed attempt budget
//! - **Graph reconstruction**: tables ordered by row/column, key/value forms
//! - **Heuristic fields**: amount, date and vendor from free text
//! - **Parallel processing**: Uses Rayon for tables, fields and batches
//! - **Multiple output formats**: Markdown, plain text, JSON

pub mod detect;
pub mod error;
pub mod extract;
pub mod job;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use detect::{detect_result_shape, parse_raw_result, read_raw_result, RawResult, ResultShape};
pub use error::{Error, Result};
pub use extract::{BlockGraph, DocumentAggregator, ExtractOptions};
pub use job::{
    AnalysisClient, BatchProcessor, CancelSource, CancelToken, DocumentRequest, DocumentStatus,
    JobPoller, JobResult, PollOptions, PollOutcome, PollState, ProcessOutcome, SourceRef,
    StatusRecord,
};
pub use model::{
    Block, BlockType, DocumentSummary, ExtractedTable, FormField, Relationship, RelationshipType,
    SummaryStats, TableCell, TableRow,
};
pub use render::{JsonFormat, RenderOptions, TableStyle};

use std::path::Path;
use std::time::Duration;

/// Reconstruct a summary from blocks with default options.
///
/// # Arguments
///
/// * `blocks` - Blocks of one job result, in service order
/// * `page_count` - Page count reported by the service, if known
pub fn analyze_blocks(blocks: &[Block], page_count: Option<u32>) -> DocumentSummary {
    DocumentAggregator::default().aggregate(blocks, page_count)
}

/// Decode a raw result (block list or poll response) and reconstruct it.
///
/// # Example
///
/// ```
/// let json = r#"[{"BlockType": "LINE", "Id": "l1", "Text": "Total $12.50"}]"#;
/// let summary = unblock::analyze_str(json).unwrap();
/// assert_eq!(summary.amount, Some(12.5));
/// ```
pub fn analyze_str(input: &str) -> Result<DocumentSummary> {
    let raw = parse_raw_result(input)?;
    Ok(analyze_blocks(&raw.blocks, raw.page_count))
}

/// Read a saved raw result file and reconstruct it.
///
/// # Example
///
/// ```no_run
/// use unblock::analyze_file;
///
/// let summary = analyze_file("analysis.json").unwrap();
/// println!("Tables: {}", summary.tables.len());
/// ```
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<DocumentSummary> {
    let raw = read_raw_result(path)?;
    Ok(analyze_blocks(&raw.blocks, raw.page_count))
}

/// Convert a saved raw result file to Markdown.
///
/// # Example
///
/// ```no_run
/// let markdown = unblock::to_markdown("analysis.json").unwrap();
/// std::fs::write("output.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let summary = analyze_file(path)?;
    render::to_markdown(&summary, &RenderOptions::default())
}

/// Convert a saved raw result file to a JSON summary.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let summary = analyze_file(path)?;
    render::to_json(&summary, format)
}

/// Builder combining extraction, polling and rendering options.
///
/// # Example
///
/// ```no_run
/// use unblock::{TableStyle, Unblock};
///
/// let markdown = Unblock::new()
///     .sequential()
///     .with_frontmatter()
///     .with_table_style(TableStyle::Html)
///     .analyze_file("analysis.json")?
///     .to_markdown()?;
/// # Ok::<(), unblock::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Unblock {
    extract_options: ExtractOptions,
    poll_options: PollOptions,
    render_options: RenderOptions,
}

impl Unblock {
    /// Create a new Unblock builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable parallel reconstruction.
    pub fn sequential(mut self) -> Self {
        self.extract_options = self.extract_options.sequential();
        self
    }

    /// Skip amount/date/vendor extraction.
    pub fn without_heuristics(mut self) -> Self {
        self.extract_options = self.extract_options.without_heuristics();
        self
    }

    /// Enable or disable NFC normalization of extracted text.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.extract_options = self.extract_options.with_unicode_normalization(normalize);
        self
    }

    /// Replace the extraction options.
    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract_options = options;
        self
    }

    /// Set the wait between status queries.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_options = self.poll_options.with_interval(interval);
        self
    }

    /// Set the maximum number of status queries.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.poll_options = self.poll_options.with_max_attempts(attempts);
        self
    }

    /// Replace the poll options.
    pub fn with_poll_options(mut self, options: PollOptions) -> Self {
        self.poll_options = options;
        self
    }

    /// Enable frontmatter in output.
    pub fn with_frontmatter(mut self) -> Self {
        self.render_options = self.render_options.with_frontmatter(true);
        self
    }

    /// Set the table style.
    pub fn with_table_style(mut self, style: TableStyle) -> Self {
        self.render_options = self.render_options.with_table_style(style);
        self
    }

    /// Get the poll options.
    pub fn poll_options(&self) -> &PollOptions {
        &self.poll_options
    }

    /// Get an aggregator configured with this builder's extraction options.
    pub fn aggregator(&self) -> DocumentAggregator {
        DocumentAggregator::new(self.extract_options.clone())
    }

    /// Reconstruct blocks that are already in memory.
    pub fn analyze_blocks(&self, blocks: &[Block], page_count: Option<u32>) -> UnblockResult {
        UnblockResult {
            summary: self.aggregator().aggregate(blocks, page_count),
            render_options: self.render_options.clone(),
        }
    }

    /// Decode and reconstruct a raw result string.
    pub fn analyze_str(&self, input: &str) -> Result<UnblockResult> {
        let raw = parse_raw_result(input)?;
        Ok(self.analyze_blocks(&raw.blocks, raw.page_count))
    }

    /// Read, decode and reconstruct a raw result file.
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> Result<UnblockResult> {
        let raw = read_raw_result(path)?;
        Ok(self.analyze_blocks(&raw.blocks, raw.page_count))
    }

    /// Create a wall-clock poller for the given service client.
    pub fn poller<C: AnalysisClient>(&self, client: C) -> JobPoller<C> {
        JobPoller::new(client)
    }

    /// Submit a document, wait for it and reconstruct the result.
    pub fn process<C, T>(
        &self,
        poller: &JobPoller<C, T>,
        source: &SourceRef,
        cancel: &CancelToken,
    ) -> Result<ProcessOutcome>
    where
        C: AnalysisClient,
        T: job::Ticker,
    {
        poller.process(source, &self.poll_options, &self.aggregator(), cancel)
    }

    /// Create a batch processor sharing this builder's options.
    pub fn batch(&self, concurrency: usize) -> Result<BatchProcessor> {
        Ok(BatchProcessor::new(concurrency)?
            .with_poll_options(self.poll_options.clone())
            .with_extract_options(self.extract_options.clone()))
    }
}

/// Result of reconstructing one document.
#[derive(Debug, Clone)]
pub struct UnblockResult {
    /// The reconstructed document
    pub summary: DocumentSummary,
    /// Render options to use
    render_options: RenderOptions,
}

impl UnblockResult {
    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.summary, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.summary, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.summary, format)
    }

    /// Get the summary.
    pub fn summary(&self) -> &DocumentSummary {
        &self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVOICE: &str = r#"{
        "JobStatus": "SUCCEEDED",
        "DocumentMetadata": {"Pages": 1},
        "Blocks": [
            {"BlockType": "LINE", "Id": "l1", "Text": "Vendor: Acme Supply", "Confidence": 99.0},
            {"BlockType": "LINE", "Id": "l2", "Text": "Date 2024-02-01 Total $99.95", "Confidence": 97.0}
        ]
    }"#;

    #[test]
    fn test_unblock_builder() {
        let unblock = Unblock::new()
            .sequential()
            .without_heuristics()
            .with_frontmatter()
            .with_max_attempts(12)
            .with_poll_interval(Duration::from_secs(1));

        assert!(!unblock.extract_options.parallel);
        assert!(!unblock.extract_options.extract_heuristics);
        assert!(unblock.render_options.include_frontmatter);
        assert_eq!(unblock.poll_options().max_attempts, 12);
        assert_eq!(unblock.poll_options().timeout(), Duration::from_secs(12));
    }

    #[test]
    fn test_unblock_builder_default() {
        let builder = Unblock::default();
        assert!(builder.extract_options.parallel);
        assert!(!builder.render_options.include_frontmatter);
        assert_eq!(builder.render_options.table_style, TableStyle::Markdown);
    }

    #[test]
    fn test_analyze_str() {
        let summary = analyze_str(INVOICE).unwrap();
        assert_eq!(summary.page_count, 1);
        assert_eq!(summary.amount, Some(99.95));
        assert_eq!(summary.date.as_deref(), Some("2024-02-01"));
        assert_eq!(summary.vendor.as_deref(), Some("Acme Supply"));
        assert_eq!(summary.average_confidence, 98.0);
    }

    #[test]
    fn test_builder_render() {
        let result = Unblock::new().with_frontmatter().analyze_str(INVOICE).unwrap();
        let markdown = result.to_markdown().unwrap();
        assert!(markdown.starts_with("---\npages: 1"));
        assert!(markdown.contains("vendor: \"Acme Supply\""));

        let text = result.to_text().unwrap();
        assert_eq!(text, "Vendor: Acme Supply\nDate 2024-02-01 Total $99.95");
    }

    #[test]
    fn test_without_heuristics() {
        let result = Unblock::new().without_heuristics().analyze_str(INVOICE).unwrap();
        assert_eq!(result.summary().amount, None);
        assert_eq!(result.summary().vendor, None);
    }

    #[test]
    fn test_analyze_invalid_input() {
        assert!(matches!(analyze_str("not json"), Err(Error::UnknownFormat(_))));
        assert!(matches!(analyze_str("{\"Blocks\": 3}"), Err(Error::Json(_))));
    }

    #[test]
    fn test_batch_zero_concurrency() {
        assert!(Unblock::new().batch(0).is_err());
    }
}
