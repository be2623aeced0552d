//! Id-keyed index over a flat block list.
//!
//! The analysis service returns blocks as a flat list linked by id strings.
//! [`BlockGraph`] indexes that list once so every lookup is a hash lookup,
//! and resolves the two malformed-input cases the service can produce:
//!
//! - **Duplicate ids**: the last block seen with a given id wins. Earlier
//!   blocks with the same id are shadowed in every lookup and in
//!   [`BlockGraph::blocks`], so each id is visited at most once there.
//!   [`BlockGraph::source_blocks`] still returns the list as given.
//! - **Dangling edges**: relationship targets that name no block are skipped
//!   by every accessor and counted in [`BlockGraph::dangling_edge_count`].

use std::collections::HashMap;

use crate::model::{Block, BlockType, RelationshipType};

/// Outgoing edges of one block, split by relationship type.
#[derive(Debug, Default)]
struct Adjacency<'a> {
    child: Vec<&'a str>,
    value: Vec<&'a str>,
}

impl<'a> Adjacency<'a> {
    fn targets(&self, kind: RelationshipType) -> &[&'a str] {
        match kind {
            RelationshipType::Child => self.child.as_slice(),
            RelationshipType::Value => self.value.as_slice(),
            RelationshipType::Other => &[],
        }
    }
}

/// Read-only index over the blocks of one job result.
#[derive(Debug)]
pub struct BlockGraph<'a> {
    by_id: HashMap<&'a str, &'a Block>,
    adjacency: HashMap<&'a str, Adjacency<'a>>,
    source: &'a [Block],
    order: Vec<&'a Block>,
    dangling_edges: usize,
    duplicate_ids: usize,
}

impl<'a> BlockGraph<'a> {
    /// Index a block list. Never fails.
    pub fn build(blocks: &'a [Block]) -> Self {
        let mut by_id: HashMap<&'a str, &'a Block> = HashMap::with_capacity(blocks.len());
        let mut duplicate_ids = 0;
        for block in blocks {
            if by_id.insert(block.id.as_str(), block).is_some() {
                duplicate_ids += 1;
            }
        }

        let order: Vec<&'a Block> = blocks
            .iter()
            .filter(|block| {
                by_id
                    .get(block.id.as_str())
                    .is_some_and(|winner| std::ptr::eq(*winner, *block))
            })
            .collect();

        let mut adjacency: HashMap<&'a str, Adjacency<'a>> = HashMap::with_capacity(order.len());
        let mut dangling_edges = 0;
        for &block in &order {
            let mut edges = Adjacency::default();
            for relationship in &block.relationships {
                let list = match relationship.kind {
                    RelationshipType::Child => &mut edges.child,
                    RelationshipType::Value => &mut edges.value,
                    RelationshipType::Other => continue,
                };
                for target in &relationship.ids {
                    if !by_id.contains_key(target.as_str()) {
                        dangling_edges += 1;
                    }
                    list.push(target.as_str());
                }
            }
            if !edges.child.is_empty() || !edges.value.is_empty() {
                adjacency.insert(block.id.as_str(), edges);
            }
        }

        if duplicate_ids > 0 {
            log::warn!(
                "BlockGraph: {} blocks shadowed by later blocks with the same id",
                duplicate_ids
            );
        }
        if dangling_edges > 0 {
            log::warn!(
                "BlockGraph: {} relationship targets reference missing blocks",
                dangling_edges
            );
        }
        log::debug!(
            "BlockGraph: indexed {} blocks, {} with outgoing edges",
            order.len(),
            adjacency.len()
        );

        Self {
            by_id,
            adjacency,
            source: blocks,
            order,
            dangling_edges,
            duplicate_ids,
        }
    }

    /// Look up a block by id.
    pub fn get(&self, id: &str) -> Option<&'a Block> {
        self.by_id.get(id).copied()
    }

    /// Check whether a block with the given id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Blocks reached from `id` through edges of type `kind`, in declaration order.
    ///
    /// Returns an empty list when the block is unknown or has no such edges.
    /// Targets that name no block are skipped.
    pub fn children_of(&self, id: &str, kind: RelationshipType) -> Vec<&'a Block> {
        let Some(edges) = self.adjacency.get(id) else {
            return Vec::new();
        };
        edges
            .targets(kind)
            .iter()
            .filter_map(|target| self.by_id.get(*target).copied())
            .collect()
    }

    /// Text of the WORD/LINE blocks reached through CHILD edges.
    ///
    /// Texts are joined with a single space in relationship order and the
    /// result is trimmed. A block with no text-bearing children yields `""`.
    pub fn text_of(&self, id: &str) -> String {
        let parts: Vec<&str> = self
            .children_of(id, RelationshipType::Child)
            .into_iter()
            .filter(|block| block.block_type.is_text())
            .filter_map(|block| block.text.as_deref())
            .filter(|text| !text.trim().is_empty())
            .collect();
        parts.join(" ").trim().to_string()
    }

    /// All visible blocks in original list order.
    pub fn blocks(&self) -> impl Iterator<Item = &'a Block> + '_ {
        self.order.iter().copied()
    }

    /// Every block as given, shadowed duplicates included.
    pub fn source_blocks(&self) -> &'a [Block] {
        self.source
    }

    /// Visible blocks of one type, in original list order.
    pub fn blocks_of_type(&self, block_type: BlockType) -> impl Iterator<Item = &'a Block> + '_ {
        self.blocks().filter(move |b| b.block_type == block_type)
    }

    /// Number of visible blocks.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the graph has no blocks.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of relationship targets that reference missing blocks.
    pub fn dangling_edge_count(&self) -> usize {
        self.dangling_edges
    }

    /// Number of blocks shadowed by a later block with the same id.
    pub fn duplicate_id_count(&self) -> usize {
        self.duplicate_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Block> {
        vec![
            Block::line("l-1", "Hello world").with_children(["w-1", "w-2"]),
            Block::word("w-1", "Hello"),
            Block::word("w-2", "world"),
        ]
    }

    #[test]
    fn test_lookup() {
        let blocks = sample();
        let graph = BlockGraph::build(&blocks);

        assert_eq!(graph.len(), 3);
        assert!(graph.contains("w-1"));
        assert_eq!(graph.get("w-2").and_then(|b| b.text.as_deref()), Some("world"));
        assert!(graph.get("missing").is_none());
    }

    #[test]
    fn test_children_in_declared_order() {
        let blocks = vec![
            Block::new("c", BlockType::Cell).with_children(["w-2", "w-1"]),
            Block::word("w-1", "one"),
            Block::word("w-2", "two"),
        ];
        let graph = BlockGraph::build(&blocks);

        let ids: Vec<_> = graph
            .children_of("c", RelationshipType::Child)
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(ids, vec!["w-2", "w-1"]);
        assert_eq!(graph.text_of("c"), "two one");
    }

    #[test]
    fn test_children_of_unknown_block() {
        let blocks = sample();
        let graph = BlockGraph::build(&blocks);

        assert!(graph.children_of("nope", RelationshipType::Child).is_empty());
        assert!(graph.children_of("w-1", RelationshipType::Child).is_empty());
        assert!(graph.children_of("l-1", RelationshipType::Value).is_empty());
        assert_eq!(graph.text_of("nope"), "");
    }

    #[test]
    fn test_dangling_edges_skipped() {
        let blocks = vec![
            Block::new("c", BlockType::Cell).with_children(["w-1", "ghost", "w-2"]),
            Block::word("w-1", "Net"),
            Block::word("w-2", "30"),
        ];
        let graph = BlockGraph::build(&blocks);

        assert_eq!(graph.children_of("c", RelationshipType::Child).len(), 2);
        assert_eq!(graph.text_of("c"), "Net 30");
        assert_eq!(graph.dangling_edge_count(), 1);
    }

    #[test]
    fn test_duplicate_ids_last_wins() {
        let blocks = vec![
            Block::word("w", "first"),
            Block::line("l", "x").with_children(["w"]),
            Block::word("w", "second"),
        ];
        let graph = BlockGraph::build(&blocks);

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.duplicate_id_count(), 1);
        assert_eq!(graph.text_of("l"), "second");
        let texts: Vec<_> = graph.blocks().map(|b| b.text.as_deref().unwrap()).collect();
        assert_eq!(texts, vec!["x", "second"]);
    }

    #[test]
    fn test_text_ignores_non_text_children() {
        let blocks = vec![
            Block::new("c", BlockType::Cell).with_children(["s", "w"]),
            Block::new("s", BlockType::SelectionElement),
            Block::word("w", "  padded  "),
        ];
        let graph = BlockGraph::build(&blocks);
        assert_eq!(graph.text_of("c"), "padded");
    }

    #[test]
    fn test_text_skips_blank_words() {
        let blocks = vec![
            Block::line("l", "a b").with_children(["w-1", "w-2", "w-3", "w-4"]),
            Block::word("w-1", "a"),
            Block::word("w-2", ""),
            Block::word("w-3", "   "),
            Block::word("w-4", "b"),
        ];
        let graph = BlockGraph::build(&blocks);
        assert_eq!(graph.text_of("l"), "a b");
    }

    #[test]
    fn test_source_blocks_keep_shadowed() {
        let blocks = vec![Block::word("w", "first"), Block::word("w", "second")];
        let graph = BlockGraph::build(&blocks);

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.source_blocks().len(), 2);
    }

    #[test]
    fn test_blocks_of_type() {
        let blocks = sample();
        let graph = BlockGraph::build(&blocks);
        assert_eq!(graph.blocks_of_type(BlockType::Word).count(), 2);
        assert_eq!(graph.blocks_of_type(BlockType::Table).count(), 0);
    }

    #[test]
    fn test_graph_is_sync() {
        fn assert_sync<T: Sync>() {}
        assert_sync::<BlockGraph<'static>>();
    }
}
