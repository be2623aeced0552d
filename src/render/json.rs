//! JSON rendering for document summaries.

use crate::error::{Error, Result};
use crate::model::DocumentSummary;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a summary to JSON.
pub fn to_json(summary: &DocumentSummary, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(summary),
        JsonFormat::Compact => serde_json::to_string(summary),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormField;

    fn summary() -> DocumentSummary {
        let mut summary = DocumentSummary::new();
        summary.full_text = "Total $250.00".to_string();
        summary.amount = Some(250.0);
        summary.form_fields.extend(FormField::new("Total", "$250.00", 88.0));
        summary
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&summary(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"full_text\""));
        assert!(json.contains("\"amount\": 250.0"));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&summary(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines

        let back: DocumentSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.form_fields.len(), 1);
    }
}
