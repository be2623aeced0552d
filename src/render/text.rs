//! Plain text rendering for document summaries.

use crate::error::Result;
use crate::model::DocumentSummary;

use super::RenderOptions;

/// Convert a summary to plain text.
///
/// Tables are written one row per line with tab-separated cells; fields as
/// `Key: value` lines.
pub fn to_text(summary: &DocumentSummary, options: &RenderOptions) -> Result<String> {
    let mut sections: Vec<String> = Vec::new();

    if options.include_text && !summary.full_text.trim().is_empty() {
        sections.push(summary.full_text.clone());
    }

    if options.include_tables {
        sections.extend(
            summary
                .tables
                .iter()
                .filter(|t| !t.is_empty())
                .map(|t| t.plain_text()),
        );
    }

    if options.include_form_fields && !summary.form_fields.is_empty() {
        let fields: Vec<String> = summary
            .form_fields
            .iter()
            .map(|f| format!("{}: {}", f.label(), f.value))
            .collect();
        sections.push(fields.join("\n"));
    }

    Ok(sections.join("\n\n").trim().to_string())
}
