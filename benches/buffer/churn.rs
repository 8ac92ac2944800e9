use criterion::{BenchmarkId, Criterion};
use orderview_rs::{EventBuffer, OrderEvent};
use pricelevel::Side;
use std::hint::black_box;

/// Register upsert/remove benchmarks for the per-source event buffer
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("EventBuffer - Churn");

    for size in [100u64, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::new("fill", size), &size, |b, &size| {
            b.iter(|| {
                let mut buffer = EventBuffer::new();
                for index in 0..size {
                    buffer.add(OrderEvent::new(index, "NTV", Side::Buy, 100.0, 1.0));
                }
                black_box(buffer.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("upsert_remove", size), &size, |b, &size| {
            let mut buffer: EventBuffer = (0..size)
                .map(|index| OrderEvent::new(index, "NTV", Side::Sell, 101.0, 1.0))
                .collect();
            b.iter(|| {
                for index in (0..size).step_by(2) {
                    buffer.remove(index);
                }
                for index in (0..size).step_by(2) {
                    buffer.add(OrderEvent::new(index, "NTV", Side::Sell, 101.5, 2.0));
                }
                black_box(buffer.first().map(|event| event.index))
            })
        });

        group.bench_with_input(BenchmarkId::new("take", size), &size, |b, &size| {
            b.iter(|| {
                let mut buffer: EventBuffer = (0..size)
                    .map(|index| OrderEvent::new(index, "DEX", Side::Buy, 99.0, 1.0))
                    .collect();
                black_box(buffer.take())
            })
        });
    }

    group.finish();
}
