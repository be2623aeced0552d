//! Form field types.

use serde::{Deserialize, Serialize};

/// A key/value pair reconstructed from KEY_VALUE blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    /// Trimmed key text, never empty
    pub key: String,

    /// Trimmed value text, never empty
    pub value: String,

    /// Confidence of the key block (0 when absent)
    pub confidence: f64,
}

impl FormField {
    /// Create a field, trimming both sides.
    ///
    /// Returns `None` when either side is empty after trimming.
    pub fn new(key: &str, value: &str, confidence: f64) -> Option<Self> {
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self {
            key: key.to_string(),
            value: value.to_string(),
            confidence,
        })
    }

    /// Key with a trailing colon removed, as it usually appears on forms.
    pub fn label(&self) -> &str {
        self.key.trim_end_matches(':').trim_end()
    }
}
