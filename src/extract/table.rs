//! Table reconstruction from TABLE/CELL blocks.
//!
//! A TABLE block points at its CELL blocks through CHILD edges; each cell
//! carries a 1-based row and column index and points at its words. The
//! reconstructor orders cells by `(row, column)` with a stable sort, so cells
//! that share a position stay in encounter order instead of being merged or
//! dropped, then groups consecutive cells with the same row into rows.

use crate::model::{Block, BlockType, ExtractedTable, RelationshipType, TableCell, TableRow};

use super::graph::BlockGraph;
use super::normalize_text;

/// Rebuilds [`ExtractedTable`]s from a [`BlockGraph`].
pub struct TableReconstructor<'g, 'a> {
    graph: &'g BlockGraph<'a>,
    normalize_unicode: bool,
}

impl<'g, 'a> TableReconstructor<'g, 'a> {
    /// Create a reconstructor over the given graph.
    pub fn new(graph: &'g BlockGraph<'a>) -> Self {
        Self {
            graph,
            normalize_unicode: false,
        }
    }

    /// Enable or disable NFC normalization of cell text.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }

    /// Rebuild one table.
    ///
    /// The result depends only on the block and the graph, so calling this
    /// twice yields identical tables. A table without CELL children has no rows.
    pub fn reconstruct(&self, table: &Block) -> ExtractedTable {
        let mut cells: Vec<&Block> = self
            .graph
            .children_of(&table.id, RelationshipType::Child)
            .into_iter()
            .filter(|block| block.block_type == BlockType::Cell)
            .collect();

        // Stable: duplicate positions keep encounter order.
        cells.sort_by_key(|cell| cell.position());

        let mut extracted = ExtractedTable::new(table.id.clone(), table.resolved_confidence());
        extracted.page = table.page;

        for cell in cells {
            let (row, column) = cell.position();
            let text = normalize_text(self.graph.text_of(&cell.id), self.normalize_unicode);
            let cell = TableCell::new(text, cell.resolved_confidence(), column);

            match extracted.rows.last_mut() {
                Some(last) if last.index == row => last.cells.push(cell),
                _ => extracted.add_row(TableRow::new(row, vec![cell])),
            }
        }

        log::debug!(
            "TableReconstructor: table {} -> {} rows x {} columns",
            table.id,
            extracted.row_count(),
            extracted.column_count()
        );

        extracted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(prefix: &str, texts: &[&str]) -> Vec<Block> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Block::word(format!("{}-w{}", prefix, i), *t))
            .collect()
    }

    /// 2 rows x 3 columns, cells listed in the given order of (row, col).
    fn grid_blocks(order: &[(u32, u32)]) -> Vec<Block> {
        let cell_ids: Vec<String> = order.iter().map(|(r, c)| format!("c{}{}", r, c)).collect();
        let mut blocks = vec![Block::new("t", BlockType::Table)
            .with_confidence(97.0)
            .with_children(cell_ids.clone())];
        for (r, c) in order {
            let id = format!("c{}{}", r, c);
            let word_id = format!("{}-w", id);
            blocks.push(
                Block::cell(&id, *r, *c)
                    .with_confidence(90.0)
                    .with_children([word_id.clone()]),
            );
            blocks.push(Block::word(word_id, format!("r{}c{}", r, c)));
        }
        blocks
    }

    fn reconstruct(blocks: &[Block]) -> ExtractedTable {
        let graph = BlockGraph::build(blocks);
        let table = graph.get("t").unwrap();
        TableReconstructor::new(&graph).reconstruct(table)
    }

    #[test]
    fn test_rows_and_columns_ordered() {
        let shuffled = [(2, 3), (1, 2), (2, 1), (1, 3), (1, 1), (2, 2)];
        let table = reconstruct(&grid_blocks(&shuffled));

        assert_eq!(
            table.grid(),
            vec![
                vec!["r1c1", "r1c2", "r1c3"],
                vec!["r2c1", "r2c2", "r2c3"],
            ]
        );
        assert_eq!(table.rows[0].index, 1);
        assert_eq!(table.rows[1].index, 2);
        let columns: Vec<_> = table.rows[1].cells.iter().map(|c| c.column).collect();
        assert_eq!(columns, vec![1, 2, 3]);
        assert_eq!(table.confidence, 97.0);
    }

    #[test]
    fn test_reconstruct_is_idempotent() {
        let blocks = grid_blocks(&[(1, 2), (2, 1), (1, 1), (2, 2)]);
        let graph = BlockGraph::build(&blocks);
        let table = graph.get("t").unwrap();
        let reconstructor = TableReconstructor::new(&graph);

        let first = reconstructor.reconstruct(table);
        let second = reconstructor.reconstruct(table);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_table_without_cells() {
        let blocks = vec![Block::new("t", BlockType::Table)];
        let table = reconstruct(&blocks);

        assert!(table.is_empty());
        assert_eq!(table.confidence, 0.0);
    }

    #[test]
    fn test_multi_word_cell_text() {
        let mut blocks = vec![
            Block::new("t", BlockType::Table).with_children(["c"]),
            Block::cell("c", 1, 1).with_children(["a-w0", "a-w1", "a-w2"]),
        ];
        blocks.extend(words("a", &["Net", "30", "days"]));
        let table = reconstruct(&blocks);

        assert_eq!(table.rows[0].cells[0].text, "Net 30 days");
    }

    #[test]
    fn test_cell_without_words_is_empty() {
        let blocks = vec![
            Block::new("t", BlockType::Table).with_children(["c"]),
            Block::cell("c", 1, 1),
        ];
        let table = reconstruct(&blocks);

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0].cells[0].text, "");
        assert_eq!(table.rows[0].cells[0].confidence, 0.0);
    }

    #[test]
    fn test_dangling_cell_edge() {
        let blocks = vec![
            Block::new("t", BlockType::Table).with_children(["c", "missing"]),
            Block::cell("c", 1, 1).with_children(["w", "also-missing"]),
            Block::word("w", "Total"),
        ];
        let table = reconstruct(&blocks);

        assert_eq!(table.grid(), vec![vec!["Total"]]);
    }

    #[test]
    fn test_non_cell_children_ignored() {
        let blocks = vec![
            Block::new("t", BlockType::Table).with_children(["w", "c"]),
            Block::word("w", "stray"),
            Block::cell("c", 1, 1).with_children(["w2"]),
            Block::word("w2", "kept"),
        ];
        let table = reconstruct(&blocks);

        assert_eq!(table.grid(), vec![vec!["kept"]]);
    }

    #[test]
    fn test_duplicate_positions_preserved_in_order() {
        let blocks = vec![
            Block::new("t", BlockType::Table).with_children(["c2", "a", "b"]),
            Block::cell("c2", 1, 2).with_children(["w-c2"]),
            Block::cell("a", 1, 1).with_children(["w-a"]),
            Block::cell("b", 1, 1).with_children(["w-b"]),
            Block::word("w-c2", "second column"),
            Block::word("w-a", "first"),
            Block::word("w-b", "duplicate"),
        ];
        let table = reconstruct(&blocks);

        assert_eq!(
            table.grid(),
            vec![vec!["first", "duplicate", "second column"]]
        );
    }

    #[test]
    fn test_unicode_normalization() {
        let blocks = vec![
            Block::new("t", BlockType::Table).with_children(["c"]),
            Block::cell("c", 1, 1).with_children(["w"]),
            Block::word("w", "Cafe\u{301}"),
        ];
        let graph = BlockGraph::build(&blocks);
        let table = graph.get("t").unwrap();

        let raw = TableReconstructor::new(&graph).reconstruct(table);
        assert_eq!(raw.rows[0].cells[0].text, "Cafe\u{301}");

        let normalized = TableReconstructor::new(&graph)
            .with_unicode_normalization(true)
            .reconstruct(table);
        assert_eq!(normalized.rows[0].cells[0].text, "Caf\u{e9}");
    }
}
