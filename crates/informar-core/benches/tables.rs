//! Benchmark tests for table sorting and rendering.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use informar_core::table::{
    render_table_html, sort_rows, ColumnKind, SortDirection, SortState, TableColumn, TableRow,
};
use informar_core::format::{format_currency, format_percent};
use informar_core::{Clock, ManualClock, ResponseCache, ScopedStorage, Storage};
use std::sync::Arc;

fn sample_rows(n: usize) -> Vec<TableRow> {
    (0..n)
        .map(|i| {
            TableRow::new()
                .cell("name", format!("Campaign {i}"))
                .cell("cost", (i as f64).mul_add(3.7, 10.0))
                .cell("revenue", (i as f64).mul_add(5.1, 8.0))
                .cell("started_at", format!("2026-{:02}-{:02}", i % 12 + 1, i % 28 + 1))
        })
        .collect()
}

fn sample_columns() -> Vec<TableColumn> {
    vec![
        TableColumn::new("name", "Campaign").sortable(),
        TableColumn::new("cost", "Cost").kind(ColumnKind::Number).sortable(),
        TableColumn::new("revenue", "Revenue").kind(ColumnKind::Number).sortable(),
        TableColumn::new("started_at", "Started").kind(ColumnKind::Date).sortable(),
    ]
}

fn bench_sort_numeric(c: &mut Criterion) {
    let rows = sample_rows(1000);

    c.bench_function("sort_rows_numeric_1000", |b| {
        b.iter(|| {
            let mut rows = rows.clone();
            sort_rows(
                black_box(&mut rows),
                "cost",
                ColumnKind::Number,
                SortDirection::Desc,
            );
            rows
        })
    });
}

fn bench_sort_date(c: &mut Criterion) {
    let rows = sample_rows(1000);

    c.bench_function("sort_rows_date_1000", |b| {
        b.iter(|| {
            let mut rows = rows.clone();
            sort_rows(
                black_box(&mut rows),
                "started_at",
                ColumnKind::Date,
                SortDirection::Asc,
            );
            rows
        })
    });
}

fn bench_render_table(c: &mut Criterion) {
    let columns = sample_columns();
    let rows = sample_rows(200);
    let sort = SortState::default();

    c.bench_function("render_table_html_200", |b| {
        b.iter(|| render_table_html(black_box(&columns), black_box(&rows), &sort))
    });
}

fn bench_formatting(c: &mut Criterion) {
    c.bench_function("format_currency", |b| {
        b.iter(|| format_currency(black_box(Some(12_345.678))))
    });

    c.bench_function("format_percent", |b| {
        b.iter(|| format_percent(black_box(Some(42.195))))
    });
}

fn bench_cache_roundtrip(c: &mut Criterion) {
    let storage = Arc::new(Storage::new());
    let clock = Arc::new(ManualClock::new()) as Arc<dyn Clock>;
    let cache = ResponseCache::new(ScopedStorage::new(storage, "bench"), clock);
    cache
        .set_default("results", serde_json::json!({"campaigns": [1, 2, 3]}))
        .expect("seed cache entry");

    c.bench_function("cache_get_hit", |b| {
        b.iter(|| cache.get(black_box("results")))
    });
}

criterion_group!(
    benches,
    bench_sort_numeric,
    bench_sort_date,
    bench_render_table,
    bench_formatting,
    bench_cache_roundtrip,
);
criterion_main!(benches);
