//! Benchmarks for the comparison engine
//!
//! Run with: cargo bench --package comparison

use comparison::ComparisonEngine;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rec_model::{ResultPage, ScoredItem};

fn build_page(offset: u32, len: u32) -> ResultPage {
    let items = (0..len)
        .map(|i| ScoredItem::new(offset + i, 1.0 / (i + 1) as f32).with_title(format!("Movie {}", offset + i)))
        .collect();
    ResultPage::new(items, 1, 1, len as u64)
}

fn bench_compare_overlapping_pages(c: &mut Criterion) {
    let engine = ComparisonEngine::new();
    let page_a = build_page(0, 20);
    let page_b = build_page(10, 20);

    c.bench_function("compare_overlapping_pages", |b| {
        b.iter(|| {
            let result = engine.compare(black_box(&page_a), black_box(&page_b));
            black_box(result)
        })
    });
}

fn bench_compare_large_pages(c: &mut Criterion) {
    let engine = ComparisonEngine::new();
    let page_a = build_page(0, 500);
    let page_b = build_page(250, 500);

    c.bench_function("compare_large_pages", |b| {
        b.iter(|| {
            let result = engine.compare(black_box(&page_a), black_box(&page_b));
            black_box(result)
        })
    });
}

criterion_group!(benches, bench_compare_overlapping_pages, bench_compare_large_pages);
criterion_main!(benches);
