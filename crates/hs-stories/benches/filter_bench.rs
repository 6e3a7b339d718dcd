//! Benchmarks for story filtering, removal and a full render pass.
//!
//! Run with: cargo bench -p hs-stories --bench filter_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hs_runtime::{Model, ValueStore};
use hs_render::frame::Frame;
use hs_stories::app::{AppConfig, StoriesApp};
use hs_stories::{ItemCollection, Record, StoryId};
use std::hint::black_box;

const WORDS: &[&str] = &[
    "React", "Redux", "Rust", "Tokio", "Serde", "Hooks", "Async", "Compiler",
];

fn synthetic(n: usize) -> ItemCollection {
    let records = (0..n)
        .map(|i| {
            let title = format!("{} {} #{i}", WORDS[i % WORDS.len()], WORDS[(i / 7) % WORDS.len()]);
            Record::new(i as u64, title)
                .with_author("bench")
                .with_comment_count((i % 50) as u32)
                .with_score((i % 300) as i64)
        })
        .collect();
    ItemCollection::new(records).unwrap_or_default()
}

// =============================================================================
// Collection Benchmarks
// =============================================================================

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection/filter");
    for n in [100usize, 1_000, 10_000] {
        let items = synthetic(n);
        group.throughput(Throughput::Elements(n as u64));
        for term in ["", "red", "COMPILER #99"] {
            group.bench_with_input(BenchmarkId::new(format!("{n}"), term), &term, |b, term| {
                b.iter(|| black_box(items.filter(black_box(term)).len()))
            });
        }
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("collection/remove");
    for n in [100usize, 1_000, 10_000] {
        let items = synthetic(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| black_box(items.remove(StoryId((n / 2) as u64)).len()))
        });
    }
    group.finish();
}

// =============================================================================
// Render Benchmarks
// =============================================================================

fn bench_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("app/view");
    for n in [2usize, 1_000] {
        let mut app = StoriesApp::new(
            ValueStore::in_memory().shared(),
            synthetic(n),
            AppConfig {
                default_search: String::new(),
                focus_search: true,
            },
        );
        app.init();
        group.bench_function(BenchmarkId::new("120x40", n), |b| {
            b.iter(|| {
                let mut frame = Frame::new(120, 40);
                app.view(&mut frame);
                black_box(&frame);
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_filter, bench_remove, bench_view);
criterion_main!(benches);
