//! Criterion benchmarks for callsite_logger

use callsite_logger::prelude::*;
use callsite_logger::{called, info};
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_line_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_format");
    group.throughput(Throughput::Elements(1));

    let at = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_milli_opt(3, 4, 5, 678))
        .unwrap();
    let caller = CallerMethod::new(
        "ClassName",
        "foo",
        vec![
            Param::new("i32", "a"),
            Param::new("&str", "b"),
            Param::new("bool", "c"),
        ],
    );

    let called = CallRecord::new(
        CallKind::Called,
        at,
        vec![
            Argument::new(&1),
            Argument::new("someString"),
            Argument::new(&true),
        ],
        Some(caller.clone()),
    );
    group.bench_function("called", |b| {
        b.iter(|| black_box(LineFormatter::format(black_box(&called))));
    });

    let info = CallRecord::new(
        CallKind::Info,
        at,
        vec![Argument::new("disk full")],
        Some(caller),
    );
    group.bench_function("info", |b| {
        b.iter(|| black_box(LineFormatter::format(black_box(&info))));
    });

    group.finish();
}

// ============================================================================
// Resolution Benchmarks
// ============================================================================

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    group.bench_function("method", |b| {
        b.iter(|| {
            CallerResolver::resolve_path(black_box("my_app::widgets::Widget::resize::__callsite"))
        });
    });

    group.bench_function("async_closure", |b| {
        b.iter(|| {
            CallerResolver::resolve_path(black_box(
                "my_app::Client::fetch::{{closure}}::{{closure}}::__callsite",
            ))
        });
    });

    group.finish();
}

// ============================================================================
// Enqueue Benchmarks
// ============================================================================

fn marker_calls(logger: &Logger, width: u32, height: u32) {
    called!(logger, width, height);
    info!(logger, "resized to {}x{}", width, height);
}

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue");
    group.throughput(Throughput::Elements(2));

    let memory = MemorySink::new();
    let logger = Logger::builder()
        .sink(memory.clone())
        .build()
        .expect("Failed to build logger");
    group.bench_function("background_flush", |b| {
        b.iter(|| {
            marker_calls(&logger, black_box(640), black_box(480));
            memory.take();
        });
    });

    let disabled = Logger::disabled();
    group.bench_function("disabled", |b| {
        b.iter(|| marker_calls(&disabled, black_box(640), black_box(480)));
    });

    group.finish();
}

criterion_group!(benches, bench_line_format, bench_resolve, bench_enqueue);
criterion_main!(benches);
