use criterion::{BenchmarkId, Criterion};
use orderview_rs::{
    ConsolidatedBook, EventFlags, EventType, FeedMessage, NullFeed, OrderEvent,
    OrderViewSubscription,
};
use pricelevel::Side;
use std::hint::black_box;
use std::sync::Arc;

const SOURCES: [&str; 4] = ["NTV", "DEX", "ISE", "BZX"];

fn snapshot_messages(sources: usize, orders: u64) -> Vec<FeedMessage> {
    let full = EventFlags::SNAPSHOT_BEGIN | EventFlags::SNAPSHOT_END;
    SOURCES[..sources]
        .iter()
        .enumerate()
        .map(|(position, source)| {
            let base = position as u64 * orders;
            let events = (base..base + orders)
                .map(|index| {
                    let side = if index % 2 == 0 { Side::Buy } else { Side::Sell };
                    OrderEvent::new(index, *source, side, 100.0 + (index % 50) as f64, 1.0)
                        .with_time(1)
                })
                .collect();
            FeedMessage::new(position as u64 + 1, "AAPL", *source, full, events)
        })
        .collect()
}

/// Register benchmarks for building and delivering consolidated snapshots
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("OrderView - Consolidation");

    for sources in [1usize, 2, 4] {
        let messages = snapshot_messages(sources, 500);
        group.bench_with_input(
            BenchmarkId::new("snapshot_500_per_source", sources),
            &messages,
            |b, messages| {
                b.iter(|| {
                    let book = Arc::new(ConsolidatedBook::new());
                    let mut subscription =
                        OrderViewSubscription::new(NullFeed, EventType::Order, book.clone())
                            .unwrap();
                    subscription.set_sources(&SOURCES[..sources]).unwrap();
                    subscription.add_symbol("AAPL").unwrap();
                    for message in messages {
                        subscription.process(message.clone());
                    }
                    black_box(book.order_count("AAPL"))
                })
            },
        );
    }

    group.finish();
}
