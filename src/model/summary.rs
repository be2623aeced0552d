//! Document-level types.

use super::{ExtractedTable, FormField};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structured output reconstructed from one job result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// LINE text joined by newlines, in block order
    pub full_text: String,

    /// Tables in block order
    pub tables: Vec<ExtractedTable>,

    /// Form fields in key block order
    pub form_fields: Vec<FormField>,

    /// Mean confidence over all blocks that report one (0 when none do)
    pub average_confidence: f64,

    /// Largest dollar amount in the text (heuristic)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    /// First date in the text, verbatim (heuristic)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Vendor name guessed from the text (heuristic)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Number of pages
    pub page_count: u32,

    /// Counters collected while walking the blocks
    #[serde(default)]
    pub stats: SummaryStats,
}

impl DocumentSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self {
            full_text: String::new(),
            tables: Vec::new(),
            form_fields: Vec::new(),
            average_confidence: 0.0,
            amount: None,
            date: None,
            vendor: None,
            page_count: 0,
            stats: SummaryStats::default(),
        }
    }

    /// Check if nothing was reconstructed.
    pub fn is_empty(&self) -> bool {
        self.full_text.is_empty() && self.tables.is_empty() && self.form_fields.is_empty()
    }

    /// Look up a form field value by key, ignoring case and a trailing colon.
    pub fn field(&self, key: &str) -> Option<&str> {
        let wanted = key.trim().trim_end_matches(':');
        self.form_fields
            .iter()
            .find(|f| f.label().eq_ignore_ascii_case(wanted))
            .map(|f| f.value.as_str())
    }

    /// Parse the heuristic date into a calendar date.
    ///
    /// Returns `None` when no date was found or the matched text is not a real
    /// date (e.g. `13/45/2024`).
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let date = self.date.as_deref()?;
        NaiveDate::parse_from_str(date, "%m/%d/%Y")
            .or_else(|_| NaiveDate::parse_from_str(date, "%Y-%m-%d"))
            .ok()
    }

    /// Convert the summary header to YAML frontmatter format.
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];

        lines.push(format!("pages: {}", self.page_count));
        lines.push(format!(
            "average_confidence: {:.2}",
            self.average_confidence
        ));
        if let Some(amount) = self.amount {
            lines.push(format!("amount: {:.2}", amount));
        }
        if let Some(ref date) = self.date {
            lines.push(format!("date: \"{}\"", escape_yaml(date)));
        }
        if let Some(ref vendor) = self.vendor {
            lines.push(format!("vendor: \"{}\"", escape_yaml(vendor)));
        }
        lines.push(format!("tables: {}", self.tables.len()));
        lines.push(format!("form_fields: {}", self.form_fields.len()));

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

impl Default for DocumentSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Counters collected during aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Blocks visible in the graph (after duplicate ids are resolved)
    pub block_count: usize,
    /// LINE blocks
    pub line_count: usize,
    /// WORD blocks
    pub word_count: usize,
    /// TABLE blocks
    pub table_count: usize,
    /// Emitted form fields
    pub field_count: usize,
    /// Blocks of an unrecognised type
    pub unknown_block_count: usize,
    /// Relationship targets that name no block
    pub dangling_edge_count: usize,
    /// Blocks shadowed by a later block with the same id
    pub duplicate_id_count: usize,
}
