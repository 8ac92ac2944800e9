//! ConsolidatedBook fed by a live subscription

use orderview_rs::{
    ConsolidatedBook, EventFlags, EventType, FeedMessage, NullFeed, OrderEvent,
    OrderViewSubscription,
};
use pricelevel::Side;
use std::sync::Arc;

fn ready_book() -> (OrderViewSubscription<NullFeed>, Arc<ConsolidatedBook>) {
    let book = Arc::new(ConsolidatedBook::new());
    let mut subscription =
        OrderViewSubscription::new(NullFeed, EventType::Order, book.clone()).unwrap();
    subscription.set_sources(["NTV", "DEX"]).unwrap();
    subscription.add_symbol("AAPL").unwrap();

    let full = EventFlags::SNAPSHOT_BEGIN | EventFlags::SNAPSHOT_END;
    subscription.process(FeedMessage::new(
        1,
        "AAPL",
        "NTV",
        full,
        vec![
            OrderEvent::new(1, "NTV", Side::Buy, 100.0, 5.0).with_time(1),
            OrderEvent::new(2, "NTV", Side::Sell, 101.0, 5.0).with_time(1),
        ],
    ));
    subscription.process(FeedMessage::new(
        2,
        "AAPL",
        "DEX",
        full,
        vec![OrderEvent::new(3, "DEX", Side::Buy, 100.5, 2.0).with_time(1)],
    ));
    (subscription, book)
}

#[cfg(test)]
mod consolidated_book_tests {
    use super::*;

    #[test]
    fn test_book_mirrors_snapshot() {
        let (_subscription, book) = ready_book();
        let snapshot = book.snapshot("AAPL").unwrap();
        assert_eq!(snapshot.order_count(), 3);
        assert_eq!(snapshot.best_bid(), Some((100.5, 2.0)));
        assert_eq!(snapshot.spread(), Some(0.5));
    }

    #[test]
    fn test_book_applies_transaction() {
        let (mut subscription, book) = ready_book();
        subscription.process(FeedMessage::new(
            2,
            "AAPL",
            "DEX",
            EventFlags::TX_PENDING,
            vec![OrderEvent::removal(3, "DEX", Side::Buy)],
        ));
        assert_eq!(book.best_bid("AAPL"), Some(100.5));

        subscription.process(FeedMessage::new(
            2,
            "AAPL",
            "DEX",
            EventFlags::empty(),
            vec![OrderEvent::new(4, "DEX", Side::Sell, 100.8, 1.0).with_time(2)],
        ));
        assert_eq!(book.best_bid("AAPL"), Some(100.0));
        assert_eq!(book.best_ask("AAPL"), Some(100.8));
        assert_eq!(book.order_count("AAPL"), 3);
    }

    #[test]
    fn test_book_applies_flagged_removal() {
        let (mut subscription, book) = ready_book();
        subscription.process(FeedMessage::new(
            1,
            "AAPL",
            "NTV",
            EventFlags::REMOVE_EVENT,
            vec![OrderEvent::new(2, "NTV", Side::Sell, 101.0, 5.0)],
        ));
        assert!(book.best_ask("AAPL").is_none());
        assert_eq!(book.order_count("AAPL"), 2);
    }

    #[test]
    fn test_resnapshot_of_one_source_keeps_other_sources() {
        let (mut subscription, book) = ready_book();
        subscription.process(FeedMessage::new(
            1,
            "AAPL",
            "NTV",
            EventFlags::SNAPSHOT_BEGIN | EventFlags::SNAPSHOT_END,
            vec![OrderEvent::new(7, "NTV", Side::Buy, 99.5, 4.0).with_time(3)],
        ));

        assert!(subscription.is_ready("AAPL"));
        assert_eq!(book.order_count("AAPL"), 2);
        assert!(book.order("AAPL", 1).is_none());
        assert!(book.order("AAPL", 2).is_none());
        assert!(book.order("AAPL", 3).is_some());
        assert_eq!(book.best_bid("AAPL"), Some(100.5));
    }

    #[test]
    fn test_restarted_empty_snapshot_clears_only_that_source() {
        let (mut subscription, book) = ready_book();
        subscription.process(FeedMessage::new(
            2,
            "AAPL",
            "DEX",
            EventFlags::SNAPSHOT_BEGIN,
            Vec::new(),
        ));
        subscription.process(FeedMessage::new(
            2,
            "AAPL",
            "DEX",
            EventFlags::SNAPSHOT_END,
            Vec::new(),
        ));

        assert_eq!(book.order_count("AAPL"), 2);
        assert_eq!(book.best_bid("AAPL"), Some(100.0));
        assert_eq!(book.best_ask("AAPL"), Some(101.0));
    }
}
