//! Reconstruction of tables, form fields and text from analysis blocks.

mod aggregate;
mod form;
mod graph;
pub mod heuristics;
mod options;
mod table;

pub use aggregate::{average_confidence, DocumentAggregator};
pub use form::FormFieldExtractor;
pub use graph::BlockGraph;
pub use heuristics::{extract_amount, extract_date, extract_vendor};
pub use options::ExtractOptions;
pub use table::TableReconstructor;

use unicode_normalization::UnicodeNormalization;

/// Apply NFC normalization when enabled.
pub(crate) fn normalize_text(text: String, normalize: bool) -> String {
    if normalize {
        text.nfc().collect()
    } else {
        text
    }
}
