//! Block types as emitted by the layout-analysis service.

use serde::{Deserialize, Serialize};

/// Entity type marking the key side of a key-value pair.
pub const KEY_ENTITY: &str = "KEY";

/// Entity type marking the value side of a key-value pair.
pub const VALUE_ENTITY: &str = "VALUE";

/// Resolve an optional confidence to a number.
///
/// Absent confidence becomes `0.0` wherever a single value must be reported
/// (table, cell and field confidence). Averages never go through this function:
/// they skip absent values instead.
pub fn resolve_confidence(confidence: Option<f64>) -> f64 {
    confidence.unwrap_or(0.0)
}

/// Resolve an optional 1-based row/column index.
///
/// A cell with no index resolves to `0` so it sorts ahead of every indexed
/// cell instead of being dropped.
pub fn resolve_index(index: Option<u32>) -> u32 {
    index.unwrap_or(0)
}

/// Kind of block in the analysis graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    /// A page of the source document
    Page,
    /// A line of text
    Line,
    /// A single word
    Word,
    /// A table
    Table,
    /// A table cell
    Cell,
    /// One side of a key-value form field
    #[serde(alias = "KEY_VALUE_SET")]
    KeyValue,
    /// A checkbox or radio button
    SelectionElement,
    /// Any block type this crate does not know about
    #[serde(other)]
    Unknown,
}

impl BlockType {
    /// Whether blocks of this type carry text that feeds cell, key and value text.
    pub fn is_text(&self) -> bool {
        matches!(self, BlockType::Word | BlockType::Line)
    }
}

/// Kind of edge between two blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Points to constituent sub-blocks
    Child,
    /// Points from a key block to its value block
    Value,
    /// Any other relationship (ignored)
    #[serde(other)]
    Other,
}

/// A typed, ordered list of edges from one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    /// Edge type
    #[serde(rename = "Type")]
    pub kind: RelationshipType,

    /// Target block ids, in declaration order
    #[serde(default)]
    pub ids: Vec<String>,
}

impl Relationship {
    /// Create a new relationship.
    pub fn new<S: Into<String>>(kind: RelationshipType, ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// A node in the analysis graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Identifier, unique within one job result
    pub id: String,

    /// Block kind
    pub block_type: BlockType,

    /// Text content (LINE and WORD blocks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Recognition confidence in [0, 100]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// 1-based row index (CELL blocks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,

    /// 1-based column index (CELL blocks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_index: Option<u32>,

    /// Entity types (KEY_VALUE blocks)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entity_types: Vec<String>,

    /// Outgoing edges
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    /// 1-based page number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl Block {
    /// Create a block with no text, confidence or edges.
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            text: None,
            confidence: None,
            row_index: None,
            column_index: None,
            entity_types: Vec::new(),
            relationships: Vec::new(),
            page: None,
        }
    }

    /// Create a WORD block.
    pub fn word(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Word).with_text(text)
    }

    /// Create a LINE block.
    pub fn line(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Line).with_text(text)
    }

    /// Create a CELL block at the given 1-based position.
    pub fn cell(id: impl Into<String>, row: u32, column: u32) -> Self {
        let mut block = Self::new(id, BlockType::Cell);
        block.row_index = Some(row);
        block.column_index = Some(column);
        block
    }

    /// Create a KEY_VALUE block on the key side.
    pub fn key(id: impl Into<String>) -> Self {
        Self::new(id, BlockType::KeyValue).with_entity_type(KEY_ENTITY)
    }

    /// Create a KEY_VALUE block on the value side.
    pub fn value(id: impl Into<String>) -> Self {
        Self::new(id, BlockType::KeyValue).with_entity_type(VALUE_ENTITY)
    }

    /// Set text and return self.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set confidence and return self.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set the page number and return self.
    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Add an entity type and return self.
    pub fn with_entity_type(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_types.push(entity_type.into());
        self
    }

    /// Add CHILD edges and return self.
    pub fn with_children<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.relationships
            .push(Relationship::new(RelationshipType::Child, ids));
        self
    }

    /// Add VALUE edges and return self.
    pub fn with_values<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.relationships
            .push(Relationship::new(RelationshipType::Value, ids));
        self
    }

    /// Check whether the block carries the given entity type.
    pub fn has_entity_type(&self, entity_type: &str) -> bool {
        self.entity_types.iter().any(|e| e == entity_type)
    }

    /// Whether this is the key side of a key-value pair.
    pub fn is_key(&self) -> bool {
        self.block_type == BlockType::KeyValue && self.has_entity_type(KEY_ENTITY)
    }

    /// Confidence with the absent case resolved to `0.0`.
    pub fn resolved_confidence(&self) -> f64 {
        resolve_confidence(self.confidence)
    }

    /// Row and column with absent indices resolved to `0`.
    pub fn position(&self) -> (u32, u32) {
        (resolve_index(self.row_index), resolve_index(self.column_index))
    }

    /// Iterate over target ids of the given relationship type, in declaration order.
    pub fn targets(&self, kind: RelationshipType) -> impl Iterator<Item = &str> {
        self.relationships
            .iter()
            .filter(move |r| r.kind == kind)
            .flat_map(|r| r.ids.iter().map(String::as_str))
    }
}
