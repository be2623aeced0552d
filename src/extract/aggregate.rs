//! Whole-document aggregation over one job's block list.

use rayon::prelude::*;

use crate::model::{Block, BlockType, DocumentSummary, ExtractedTable, FormField, SummaryStats};

use super::form::FormFieldExtractor;
use super::graph::BlockGraph;
use super::heuristics::{extract_amount, extract_date, extract_vendor};
use super::normalize_text;
use super::options::ExtractOptions;
use super::table::TableReconstructor;

/// Builds a [`DocumentSummary`] from the blocks of one job result.
#[derive(Debug, Clone, Default)]
pub struct DocumentAggregator {
    options: ExtractOptions,
}

impl DocumentAggregator {
    /// Create an aggregator with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Get the options in use.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Build the summary.
    ///
    /// `page_count` is the page count reported by the service; when it is
    /// `None` the number of PAGE blocks is used instead.
    pub fn aggregate(&self, blocks: &[Block], page_count: Option<u32>) -> DocumentSummary {
        let graph = BlockGraph::build(blocks);
        self.aggregate_graph(&graph, page_count)
    }

    /// Build the summary from an already indexed graph.
    pub fn aggregate_graph(
        &self,
        graph: &BlockGraph<'_>,
        page_count: Option<u32>,
    ) -> DocumentSummary {
        let normalize = self.options.normalize_unicode;
        let mut stats = SummaryStats {
            block_count: graph.len(),
            dangling_edge_count: graph.dangling_edge_count(),
            duplicate_id_count: graph.duplicate_id_count(),
            ..SummaryStats::default()
        };

        let mut lines: Vec<&str> = Vec::new();
        let mut table_blocks: Vec<&Block> = Vec::new();
        let mut key_blocks: Vec<&Block> = Vec::new();
        let mut page_blocks: u32 = 0;

        // Lines carry their own text, so a shadowed LINE still reads in place.
        for block in graph.source_blocks() {
            if block.block_type == BlockType::Line {
                stats.line_count += 1;
                if let Some(ref text) = block.text {
                    lines.push(text);
                }
            }
        }

        // Tables and keys resolve their children through ids, which only
        // reach the winning block; shadowed ones are skipped.
        for block in graph.blocks() {
            match block.block_type {
                BlockType::Word => stats.word_count += 1,
                BlockType::Table => table_blocks.push(block),
                BlockType::KeyValue if block.is_key() => key_blocks.push(block),
                BlockType::Page => page_blocks += 1,
                BlockType::Unknown => stats.unknown_block_count += 1,
                _ => {}
            }
        }
        stats.table_count = table_blocks.len();

        let full_text = normalize_text(lines.join("\n"), normalize);

        let reconstructor = TableReconstructor::new(graph).with_unicode_normalization(normalize);
        let extractor = FormFieldExtractor::new(graph).with_unicode_normalization(normalize);

        let (tables, form_fields): (Vec<ExtractedTable>, Vec<FormField>) = if self.options.parallel
        {
            rayon::join(
                || {
                    table_blocks
                        .par_iter()
                        .map(|block| reconstructor.reconstruct(block))
                        .collect()
                },
                || {
                    key_blocks
                        .par_iter()
                        .filter_map(|block| extractor.extract(block))
                        .collect()
                },
            )
        } else {
            (
                table_blocks
                    .iter()
                    .map(|block| reconstructor.reconstruct(block))
                    .collect(),
                key_blocks
                    .iter()
                    .filter_map(|block| extractor.extract(block))
                    .collect(),
            )
        };
        stats.field_count = form_fields.len();

        let average_confidence = average_confidence(graph.source_blocks());

        let (amount, date, vendor) = if self.options.extract_heuristics {
            (
                extract_amount(&full_text),
                extract_date(&full_text),
                extract_vendor(&full_text),
            )
        } else {
            (None, None, None)
        };

        log::debug!(
            "DocumentAggregator: {} blocks, {} lines, {} tables, {} fields, avg confidence {:.2}",
            stats.block_count,
            stats.line_count,
            tables.len(),
            form_fields.len(),
            average_confidence
        );

        DocumentSummary {
            full_text,
            tables,
            form_fields,
            average_confidence,
            amount,
            date,
            vendor,
            page_count: page_count.unwrap_or(page_blocks),
            stats,
        }
    }
}

/// Mean confidence over the blocks that report one, of any type.
///
/// Blocks without a confidence count toward neither the sum nor the number of
/// samples. When no block reports a confidence the result is exactly `0.0`.
pub fn average_confidence<'a>(blocks: impl IntoIterator<Item = &'a Block>) -> f64 {
    let (sum, count) = blocks
        .into_iter()
        .filter_map(|block| block.confidence)
        .fold((0.0_f64, 0_usize), |(sum, count), c| (sum + c, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
