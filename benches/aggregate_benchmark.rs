//! Benchmarks for unblock reconstruction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic block graphs shaped like invoice results.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use unblock::{Block, BlockType, DocumentAggregator, ExtractOptions};

/// Creates a synthetic result with the given number of 4x4 tables and
/// key/value pairs per page.
fn create_test_blocks(page_count: usize) -> Vec<Block> {
    let mut blocks = Vec::new();

    for p in 0..page_count {
        let page = (p + 1) as u32;
        let mut page_children = Vec::new();

        for l in 0..20 {
            let id = format!("p{}l{}", p, l);
            page_children.push(id.clone());
            blocks.push(
                Block::line(id, format!("Line {} of page {} amount ${}.{:02}", l, page, l * 7, l))
                    .with_confidence(95.0)
                    .on_page(page),
            );
        }

        for t in 0..2 {
            let table_id = format!("p{}t{}", p, t);
            let mut cells = Vec::new();
            // Reverse order so the sort has work to do.
            for r in (1..=4u32).rev() {
                for c in (1..=4u32).rev() {
                    let cell_id = format!("{}r{}c{}", table_id, r, c);
                    let word_id = format!("{}w", cell_id);
                    cells.push(cell_id.clone());
                    blocks.push(
                        Block::cell(cell_id, r, c)
                            .with_children([word_id.clone()])
                            .with_confidence(90.0),
                    );
                    blocks.push(Block::word(word_id, format!("{}{}", r, c)));
                }
            }
            page_children.push(table_id.clone());
            blocks.push(
                Block::new(table_id, BlockType::Table)
                    .with_children(cells)
                    .on_page(page),
            );
        }

        for k in 0..10 {
            let key_id = format!("p{}k{}", p, k);
            let value_id = format!("p{}v{}", p, k);
            blocks.push(
                Block::key(&key_id)
                    .with_children([format!("{}w", key_id)])
                    .with_values([value_id.clone()])
                    .with_confidence(88.0),
            );
            blocks.push(Block::word(format!("{}w", key_id), format!("Field {}:", k)));
            blocks.push(Block::value(&value_id).with_children([format!("{}w", value_id)]));
            blocks.push(Block::word(format!("{}w", value_id), format!("value {}", k)));
        }

        blocks.push(
            Block::new(format!("p{}", p), BlockType::Page)
                .with_children(page_children)
                .on_page(page),
        );
    }

    blocks
}

/// Benchmark aggregation at various sizes.
fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for page_count in [1, 10, 50].iter() {
        let blocks = create_test_blocks(*page_count);

        group.bench_function(format!("{}_pages_parallel", page_count), |b| {
            let aggregator = DocumentAggregator::default();
            b.iter(|| aggregator.aggregate(black_box(&blocks), None));
        });

        group.bench_function(format!("{}_pages_sequential", page_count), |b| {
            let aggregator = DocumentAggregator::new(ExtractOptions::new().sequential());
            b.iter(|| aggregator.aggregate(black_box(&blocks), None));
        });
    }

    group.finish();
}

/// Benchmark the text heuristics alone.
fn bench_heuristics(c: &mut Criterion) {
    let text = "Harbor Hardware\nInvoice date: 03/15/2024, due 04/01/2024\n".repeat(200)
        + "Subtotal $45.50 Total $1,200.00";

    c.bench_function("heuristics", |b| {
        b.iter(|| {
            let text = black_box(text.as_str());
            (
                unblock::extract::extract_amount(text),
                unblock::extract::extract_date(text),
                unblock::extract::extract_vendor(text),
            )
        });
    });
}

criterion_group!(benches, bench_aggregation, bench_heuristics);
criterion_main!(benches);
