//! Criterion benchmarks for newrelic_log_formatter

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use newrelic_log_formatter::core::{truncate_to_bytes, MessageTemplate};
use newrelic_log_formatter::prelude::*;
use std::sync::Arc;

fn sample_event() -> LogEvent {
    LogEvent::new(LogLevel::Information, "Order {OrderId} shipped to {City} for {Total:F2}")
        .with_property("OrderId", 98231)
        .with_property("City", "Lisbon")
        .with_property("Total", 129.5)
        .with_property(
            "Customer",
            StructureValue::tagged("Customer")
                .with_property("Id", 42)
                .with_property("Tier", "gold"),
        )
}

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format");
    group.throughput(Throughput::Elements(1));

    let formatter = StructuredJsonFormatter::default();
    let minimal = LogEvent::new(LogLevel::Information, "Service started");
    let event = sample_event();
    let with_exception = sample_event().with_exception(
        EventException::new("connection reset").with_cause("broken pipe"),
    );

    let mut buffer = Vec::with_capacity(1024);

    group.bench_function("minimal", |b| {
        b.iter(|| {
            buffer.clear();
            formatter.format(black_box(&minimal), &mut buffer).unwrap();
            black_box(buffer.len())
        });
    });

    group.bench_function("with_properties", |b| {
        b.iter(|| {
            buffer.clear();
            formatter.format(black_box(&event), &mut buffer).unwrap();
            black_box(buffer.len())
        });
    });

    group.bench_function("with_exception", |b| {
        b.iter(|| {
            buffer.clear();
            formatter.format(black_box(&with_exception), &mut buffer).unwrap();
            black_box(buffer.len())
        });
    });

    group.bench_function("to_string", |b| {
        b.iter(|| black_box(formatter.format_to_string(black_box(&event)).unwrap()));
    });

    group.finish();
}

// ============================================================================
// Flattening Benchmarks
// ============================================================================

fn nested(depth: usize) -> PropertyValue {
    let mut value = PropertyValue::from("leaf");
    for level in 0..depth {
        value = StructureValue::new()
            .with_property(format!("Level{}", level), value)
            .with_property("Count", level as u64)
            .into();
    }
    value
}

fn bench_flatten_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten_depth");
    let event = LogEvent::new(LogLevel::Debug, "Nested").with_property("Root", nested(6));

    for depth in [1usize, 2, 4, 8] {
        let formatter =
            StructuredJsonFormatter::new(FormatterConfig::new().with_flatten_depth(depth)).unwrap();
        let mut buffer = Vec::with_capacity(1024);

        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                buffer.clear();
                formatter.format(black_box(&event), &mut buffer).unwrap();
                black_box(buffer.len())
            });
        });
    }

    group.finish();
}

// ============================================================================
// Truncation Benchmarks
// ============================================================================

fn bench_truncation(c: &mut Criterion) {
    let mut group = c.benchmark_group("truncation");

    for size in [1_024usize, 32_768, 131_072] {
        let text = "é".repeat(size / 2);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("truncate_to_bytes", size), &text, |b, text| {
            b.iter(|| black_box(truncate_to_bytes(black_box(text), 32_767)));
        });
    }

    let formatter = StructuredJsonFormatter::default();
    let event = LogEvent::new(LogLevel::Warning, "Payload {Payload}")
        .with_property("Payload", "x".repeat(100_000));
    let mut buffer = Vec::with_capacity(128 * 1024);

    group.throughput(Throughput::Elements(1));
    group.bench_function("oversized_event", |b| {
        b.iter(|| {
            buffer.clear();
            formatter.format(black_box(&event), &mut buffer).unwrap();
            black_box(buffer.len())
        });
    });

    group.finish();
}

// ============================================================================
// Template Benchmarks
// ============================================================================

fn bench_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("message_template");
    group.throughput(Throughput::Elements(1));

    let text = "User {UserId} from {@Address} took {Elapsed:F1} ms on {$Request,-12}";
    let template = MessageTemplate::parse(text);
    let event = sample_event();

    group.bench_function("parse", |b| {
        b.iter(|| black_box(MessageTemplate::parse(black_box(text))));
    });

    group.bench_function("render", |b| {
        b.iter(|| black_box(template.render(black_box(event.properties()))));
    });

    group.finish();
}

// ============================================================================
// Concurrent Benchmarks
// ============================================================================

fn bench_concurrent_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_format");

    let formatter = Arc::new(StructuredJsonFormatter::default());
    let event = Arc::new(sample_event());

    for threads in [2usize, 4] {
        group.throughput(Throughput::Elements((threads * 100) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let formatter = Arc::clone(&formatter);
                        let event = Arc::clone(&event);
                        std::thread::spawn(move || {
                            let mut buffer = Vec::with_capacity(512);
                            for _ in 0..100 {
                                buffer.clear();
                                formatter.format(&event, &mut buffer).unwrap();
                            }
                            buffer.len()
                        })
                    })
                    .collect();
                for handle in handles {
                    black_box(handle.join().unwrap());
                }
            });
        });
    }

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_format,
    bench_flatten_depth,
    bench_truncation,
    bench_template,
    bench_concurrent_format
);

criterion_main!(benches);
