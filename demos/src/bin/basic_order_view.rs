// demos/src/bin/basic_order_view.rs

use orderview_rs::{
    ConsolidatedBook, EventFlags, EventType, FeedMessage, NullFeed, OrderEvent,
    OrderViewSubscription, SubscriptionConfig,
};
use pricelevel::{Side, setup_logger};
use std::sync::Arc;
use tracing::info;

const CONFIG: &str = r#"{
    "event_type": "order",
    "sources": ["NTV", "DEX"],
    "symbols": ["AAPL"]
}"#;

fn main() {
    setup_logger();
    info!("Basic Order View Example");

    let config = match SubscriptionConfig::from_json(CONFIG) {
        Ok(config) => config,
        Err(err) => {
            info!("Cannot parse configuration: {}", err);
            return;
        }
    };

    let book = Arc::new(ConsolidatedBook::new());
    let mut subscription = match OrderViewSubscription::from_config(NullFeed, &config, book.clone())
    {
        Ok(subscription) => subscription,
        Err(err) => {
            info!("Cannot create subscription: {}", err);
            return;
        }
    };
    info!("Subscription {} over sources {:?}", subscription.id(), subscription.sources());

    demo_snapshots(&mut subscription, &book);
    demo_transaction(&mut subscription, &book);
    demo_plain_update(&mut subscription, &book);

    info!("\nFinal book state:");
    display_book(&book);
    subscription.close();
}

fn full() -> EventFlags {
    EventFlags::SNAPSHOT_BEGIN | EventFlags::SNAPSHOT_END
}

fn demo_snapshots(subscription: &mut OrderViewSubscription<NullFeed>, book: &ConsolidatedBook) {
    info!("\n--- Per-source snapshots ---");
    subscription.process(FeedMessage::new(
        1,
        "AAPL",
        "NTV",
        full(),
        vec![
            OrderEvent::new(1, "NTV", Side::Buy, 189.50, 200.0).with_time(1),
            OrderEvent::new(2, "NTV", Side::Sell, 189.70, 150.0).with_time(1),
        ],
    ));
    info!(
        "After NTV snapshot: ready={}, orders in book={}",
        subscription.is_ready("AAPL"),
        book.order_count("AAPL")
    );

    subscription.process(FeedMessage::new(
        2,
        "AAPL",
        "DEX",
        full(),
        vec![
            OrderEvent::new(3, "DEX", Side::Buy, 189.55, 100.0).with_time(1),
            OrderEvent::new(4, "DEX", Side::Sell, 189.65, 80.0).with_time(1),
        ],
    ));
    info!(
        "After DEX snapshot: ready={}, orders in book={}",
        subscription.is_ready("AAPL"),
        book.order_count("AAPL")
    );
    display_book(book);
}

fn demo_transaction(subscription: &mut OrderViewSubscription<NullFeed>, book: &ConsolidatedBook) {
    info!("\n--- Multi-message transaction ---");
    subscription.process(FeedMessage::new(
        2,
        "AAPL",
        "DEX",
        EventFlags::TX_PENDING,
        vec![OrderEvent::removal(3, "DEX", Side::Buy)],
    ));
    info!(
        "Mid-transaction best bid: {:?} (unchanged)",
        book.best_bid("AAPL")
    );

    subscription.process(FeedMessage::new(
        2,
        "AAPL",
        "DEX",
        EventFlags::empty(),
        vec![OrderEvent::new(5, "DEX", Side::Buy, 189.60, 120.0).with_time(2)],
    ));
    info!("Committed best bid: {:?}", book.best_bid("AAPL"));
}

fn demo_plain_update(subscription: &mut OrderViewSubscription<NullFeed>, book: &ConsolidatedBook) {
    info!("\n--- Plain update ---");
    subscription.process(FeedMessage::new(
        1,
        "AAPL",
        "NTV",
        EventFlags::REMOVE_EVENT,
        vec![OrderEvent::new(2, "NTV", Side::Sell, 189.70, 150.0)],
    ));
    info!("Best ask after NTV removal: {:?}", book.best_ask("AAPL"));
}

fn display_book(book: &ConsolidatedBook) {
    let Some(snapshot) = book.snapshot("AAPL") else {
        info!("No book for AAPL yet");
        return;
    };
    info!("Bids:");
    for order in &snapshot.bids {
        info!("  #{} {} @ {} ({})", order.index, order.size, order.price, order.source);
    }
    info!("Asks:");
    for order in &snapshot.asks {
        info!("  #{} {} @ {} ({})", order.index, order.size, order.price, order.source);
    }
    info!("Spread: {:?}, mid: {:?}", snapshot.spread(), snapshot.mid_price());
    match snapshot.to_json() {
        Ok(json) => info!("JSON: {}", json),
        Err(err) => info!("Cannot serialize snapshot: {}", err),
    }
}
