use criterion::Criterion;
use orderview_rs::{
    EventFlags, EventType, FeedMessage, FnListener, Notification, NullFeed, OrderEvent,
    OrderViewSubscription,
};
use pricelevel::Side;
use std::hint::black_box;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn ready_subscription(delivered: Arc<AtomicUsize>) -> OrderViewSubscription<NullFeed> {
    let listener = FnListener(move |notification: Notification<'_>| {
        delivered.fetch_add(notification.batch().len(), Ordering::Relaxed);
    });
    let mut subscription =
        OrderViewSubscription::new(NullFeed, EventType::Order, Arc::new(listener)).unwrap();
    subscription.set_sources(["NTV"]).unwrap();
    subscription.add_symbol("AAPL").unwrap();
    subscription.process(FeedMessage::new(
        1,
        "AAPL",
        "NTV",
        EventFlags::SNAPSHOT_BEGIN | EventFlags::SNAPSHOT_END,
        vec![OrderEvent::new(0, "NTV", Side::Buy, 100.0, 1.0).with_time(1)],
    ));
    subscription
}

fn update(index: u64, flags: EventFlags) -> FeedMessage {
    FeedMessage::new(
        1,
        "AAPL",
        "NTV",
        flags,
        vec![OrderEvent::new(index % 256, "NTV", Side::Sell, 101.0, 1.0).with_time(2)],
    )
}

/// Register benchmarks for post-readiness update delivery
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("OrderView - Updates");

    group.bench_function("forward_1000_updates", |b| {
        let delivered = Arc::new(AtomicUsize::new(0));
        let mut subscription = ready_subscription(delivered.clone());
        b.iter(|| {
            for index in 0..1_000 {
                subscription.process(update(index, EventFlags::empty()));
            }
            black_box(delivered.load(Ordering::Relaxed))
        })
    });

    group.bench_function("coalesce_100_message_transactions", |b| {
        let delivered = Arc::new(AtomicUsize::new(0));
        let mut subscription = ready_subscription(delivered.clone());
        b.iter(|| {
            for transaction in 0..10u64 {
                for index in 0..99 {
                    subscription.process(update(transaction * 100 + index, EventFlags::TX_PENDING));
                }
                subscription.process(update(transaction * 100 + 99, EventFlags::empty()));
            }
            black_box(delivered.load(Ordering::Relaxed))
        })
    });

    group.finish();
}
