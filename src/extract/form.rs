//! Key/value form field extraction.

use crate::model::{Block, BlockType, FormField, RelationshipType};

use super::graph::BlockGraph;
use super::normalize_text;

/// Pairs KEY blocks with their VALUE blocks.
pub struct FormFieldExtractor<'g, 'a> {
    graph: &'g BlockGraph<'a>,
    normalize_unicode: bool,
}

impl<'g, 'a> FormFieldExtractor<'g, 'a> {
    /// Create an extractor over the given graph.
    pub fn new(graph: &'g BlockGraph<'a>) -> Self {
        Self {
            graph,
            normalize_unicode: false,
        }
    }

    /// Enable or disable NFC normalization of key and value text.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Extract the field for one key block.
    ///
    /// Returns `None` when the block is not a key, or when either the key
    /// text or the value text is empty after trimming. A key whose VALUE edge
    /// dangles or leads to a block without words is dropped, not kept with an
    /// empty value.
    pub fn extract(&self, key: &Block) -> Option<FormField> {
        if !key.is_key() {
            return None;
        }

        let key_text = normalize_text(self.graph.text_of(&key.id), self.normalize_unicode);

        let values: Vec<String> = self
            .graph
            .children_of(&key.id, RelationshipType::Value)
            .into_iter()
            .filter(|block| block.block_type == BlockType::KeyValue)
            .map(|block| self.graph.text_of(&block.id))
            .filter(|text| !text.is_empty())
            .collect();
        let value_text = normalize_text(values.join(" "), self.normalize_unicode);

        let field = FormField::new(&key_text, &value_text, key.resolved_confidence());
        if field.is_none() {
            log::debug!(
                "FormFieldExtractor: dropping key {} (key {:?}, value {:?})",
                key.id,
                key_text,
                value_text
            );
        }
        field
    }

    /// Extract fields for every key block in the graph, in block order.
    pub fn extract_all(&self) -> Vec<FormField> {
        self.graph
            .blocks()
            .filter(|block| block.is_key())
            .filter_map(|block| self.extract(block))
            .collect()
    }
}
