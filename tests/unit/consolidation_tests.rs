//! End-to-end consolidation scenarios driven through the public subscription API

use orderview_rs::{
    EventBatch, EventFlags, EventType, FeedMessage, FnListener, Notification, NullFeed,
    OrderEvent, OrderViewSubscription,
};
use pricelevel::Side;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
enum Seen {
    Snapshot(Vec<u64>),
    Update(Vec<u64>),
}

type Log = Arc<Mutex<Vec<Seen>>>;

fn recording_subscription(sources: &[&str]) -> (OrderViewSubscription<NullFeed>, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let listener = FnListener(move |notification: Notification<'_>| {
        let indices = notification.batch().indices();
        let seen = match notification {
            Notification::Snapshot(_) => Seen::Snapshot(indices),
            Notification::Update(_) => Seen::Update(indices),
        };
        sink.lock().unwrap().push(seen);
    });

    let mut subscription =
        OrderViewSubscription::new(NullFeed, EventType::Order, Arc::new(listener)).unwrap();
    subscription.set_sources(sources).unwrap();
    subscription.add_symbol("AAPL").unwrap();
    (subscription, log)
}

fn message(key: u64, source: &str, flags: EventFlags, events: Vec<OrderEvent>) -> FeedMessage {
    FeedMessage::new(key, "AAPL", source, flags, events)
}

fn bid(index: u64, source: &str) -> OrderEvent {
    OrderEvent::new(index, source, Side::Buy, 100.0, 1.0).with_time(1)
}

#[cfg(test)]
mod consolidation_tests {
    use super::*;

    #[test]
    fn test_three_source_consolidation() {
        let (mut subscription, log) = recording_subscription(&["NTV", "DEX", "ISE"]);
        let full = EventFlags::SNAPSHOT_BEGIN | EventFlags::SNAPSHOT_END;

        subscription.process(message(1, "ISE", full, vec![bid(30, "ISE")]));
        subscription.process(message(2, "NTV", full, vec![bid(10, "NTV"), bid(11, "NTV")]));
        assert!(log.lock().unwrap().is_empty());

        subscription.process(message(3, "DEX", full, vec![bid(20, "DEX")]));
        assert_eq!(
            *log.lock().unwrap(),
            vec![Seen::Snapshot(vec![10, 11, 20, 30])]
        );
    }

    #[test]
    fn test_snapshot_then_transaction_then_plain_update() {
        let (mut subscription, log) = recording_subscription(&["NTV"]);

        subscription.process(message(1, "NTV", EventFlags::SNAPSHOT_BEGIN, vec![bid(1, "NTV")]));
        subscription.process(message(1, "NTV", EventFlags::SNAPSHOT_END, vec![bid(2, "NTV")]));
        subscription.process(message(1, "NTV", EventFlags::TX_PENDING, vec![bid(3, "NTV")]));
        subscription.process(message(
            1,
            "NTV",
            EventFlags::TX_PENDING,
            vec![OrderEvent::removal(1, "NTV", Side::Buy)],
        ));
        subscription.process(message(1, "NTV", EventFlags::empty(), vec![bid(4, "NTV")]));
        subscription.process(message(1, "NTV", EventFlags::empty(), vec![bid(5, "NTV")]));

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Seen::Snapshot(vec![1, 2]),
                Seen::Update(vec![1, 3, 4]),
                Seen::Update(vec![5]),
            ]
        );
    }

    #[test]
    fn test_resnapshot_after_symbol_removal() {
        let (mut subscription, log) = recording_subscription(&["NTV"]);
        let full = EventFlags::SNAPSHOT_BEGIN | EventFlags::SNAPSHOT_END;

        subscription.process(message(1, "NTV", full, vec![bid(1, "NTV")]));
        subscription.process(message(1, "NTV", EventFlags::REMOVE_SYMBOL, Vec::new()));
        assert!(!subscription.is_ready("AAPL"));

        // Updates without a fresh snapshot go nowhere.
        subscription.process(message(1, "NTV", EventFlags::empty(), vec![bid(2, "NTV")]));
        subscription.process(message(5, "NTV", full, vec![bid(7, "NTV")]));

        assert_eq!(
            *log.lock().unwrap(),
            vec![Seen::Snapshot(vec![1]), Seen::Snapshot(vec![7])]
        );
    }

    #[test]
    fn test_batches_are_index_ordered() {
        let captured: Arc<Mutex<Vec<EventBatch>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);
        let listener = FnListener(move |notification: Notification<'_>| {
            sink.lock().unwrap().push(notification.batch().clone());
        });
        let mut subscription =
            OrderViewSubscription::new(NullFeed, EventType::Order, Arc::new(listener)).unwrap();
        subscription.set_sources(["NTV", "DEX"]).unwrap();
        subscription.add_symbol("AAPL").unwrap();

        let full = EventFlags::SNAPSHOT_BEGIN | EventFlags::SNAPSHOT_END;
        subscription.process(message(1, "NTV", full, vec![bid(9, "NTV"), bid(4, "NTV")]));
        subscription.process(message(2, "DEX", full, vec![bid(7, "DEX"), bid(1, "DEX")]));

        let captured = captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].indices(), vec![1, 4, 7, 9]);
        assert!(captured[0].flags.is_empty());
    }
}
