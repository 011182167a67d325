//! Parsing and formatting benchmarks on synthetic catalog pages.
//!
//! Run with: `cargo bench --package sophist-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use sophist_bench::{catalog_page, series_page};
use sophist_lib::prelude::*;
use sophist_lib::{WINDOWS_1251, decode_page, parse_catalog, parse_series_page};
use std::hint::black_box;

fn parse_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_series_page");

    for (name, granularity, rows) in [
        ("annual", Granularity::Annual, 30),
        ("quarterly", Granularity::Quarterly, 120),
        ("monthly", Granularity::Monthly, 360),
    ] {
        let html = series_page(granularity, rows, 8);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &html, |b, html| {
            b.iter(|| parse_series_page(black_box(html)).expect("synthetic page parses"));
        });
    }

    group.finish();
}

fn decode_benchmark(c: &mut Criterion) {
    let html = series_page(Granularity::Monthly, 360, 8);
    let bytes = WINDOWS_1251.encode(&html).0.into_owned();

    let mut group = c.benchmark_group("decode_page");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("windows-1251", |b| {
        b.iter(|| decode_page(black_box(&bytes), WINDOWS_1251));
    });
    group.finish();
}

fn catalog_benchmark(c: &mut Criterion) {
    let html = catalog_page(1_000);

    let mut group = c.benchmark_group("parse_catalog");
    group.throughput(Throughput::Elements(1_000));
    group.bench_function("1000-entries", |b| {
        b.iter(|| parse_catalog(black_box(&html)));
    });
    group.finish();
}

fn format_benchmark(c: &mut Criterion) {
    let page = parse_series_page(&series_page(Granularity::Monthly, 360, 8))
        .expect("synthetic page parses");

    let mut group = c.benchmark_group("write_table");
    group.throughput(Throughput::Elements(page.table.len() as u64));

    for format in [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Parquet] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format),
            &page.table,
            |b, table| {
                b.iter(|| {
                    let mut buf = Vec::new();
                    format.write_table(black_box(table), &mut buf).expect("write succeeds");
                    buf
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    parse_benchmark,
    decode_benchmark,
    catalog_benchmark,
    format_benchmark
);
criterion_main!(benches);
