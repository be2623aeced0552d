//! Model types for analysis blocks and the structures rebuilt from them.
//!
//! [`Block`] mirrors what the analysis service returns. Everything else here
//! is derived from a block list, created fresh per job result and never
//! mutated afterwards.

mod block;
mod form;
mod summary;
mod table;

pub use block::{
    resolve_confidence, resolve_index, Block, BlockType, Relationship, RelationshipType,
    KEY_ENTITY, VALUE_ENTITY,
};
pub use form::FormField;
pub use summary::{DocumentSummary, SummaryStats};
pub use table::{ExtractedTable, TableCell, TableRow};
