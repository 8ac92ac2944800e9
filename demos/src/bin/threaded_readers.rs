// demos/src/bin/threaded_readers.rs

use orderview_rs::{
    ConsolidatedBook, EventFlags, EventType, FeedMessage, NullFeed, OrderEvent,
    OrderViewSubscription, current_time_millis,
};
use pricelevel::{Side, setup_logger};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tracing::info;

const SOURCES: [&str; 3] = ["NTV", "DEX", "ISE"];
const SYMBOLS: [&str; 3] = ["AAPL", "MSFT", "IBM"];

fn main() {
    setup_logger();
    info!("Threaded Readers Example");

    let book = Arc::new(ConsolidatedBook::new());
    let mut subscription =
        match OrderViewSubscription::new(NullFeed, EventType::Order, book.clone()) {
            Ok(subscription) => subscription,
            Err(err) => {
                info!("Cannot create subscription: {}", err);
                return;
            }
        };
    if let Err(err) = subscription.set_sources(SOURCES) {
        info!("Cannot configure sources: {}", err);
        return;
    }
    if let Err(err) = subscription.add_symbols(SYMBOLS) {
        info!("Cannot subscribe symbols: {}", err);
        return;
    }

    let running = Arc::new(AtomicBool::new(true));
    let readers: Vec<_> = SYMBOLS
        .iter()
        .map(|symbol| {
            let book = Arc::clone(&book);
            let running = Arc::clone(&running);
            let symbol = symbol.to_string();
            thread::spawn(move || {
                let mut reads = 0u64;
                while running.load(Ordering::Relaxed) {
                    if let Some(snapshot) = book.snapshot(&symbol) {
                        reads += snapshot.order_count() as u64;
                    }
                    thread::yield_now();
                }
                (symbol, reads)
            })
        })
        .collect();

    let start = current_time_millis();
    feed_snapshots(&mut subscription);
    feed_updates(&mut subscription, 10_000);
    let elapsed = current_time_millis().saturating_sub(start);

    thread::sleep(Duration::from_millis(10));
    running.store(false, Ordering::Relaxed);
    for reader in readers {
        match reader.join() {
            Ok((symbol, reads)) => info!("Reader for {} observed {} orders in total", symbol, reads),
            Err(_) => info!("Reader thread panicked"),
        }
    }

    for symbol in SYMBOLS {
        info!(
            "{}: {} orders, best bid {:?}, best ask {:?}",
            symbol,
            book.order_count(symbol),
            book.best_bid(symbol),
            book.best_ask(symbol)
        );
    }
    info!("Fed all messages in {} ms", elapsed);
}

fn feed_snapshots(subscription: &mut OrderViewSubscription<NullFeed>) {
    let full = EventFlags::SNAPSHOT_BEGIN | EventFlags::SNAPSHOT_END;
    let mut key = 0u64;
    for symbol in SYMBOLS {
        for (position, source) in SOURCES.iter().enumerate() {
            key += 1;
            let base = position as u64 * 100;
            let events = (base..base + 20)
                .map(|index| {
                    let side = if index % 2 == 0 { Side::Buy } else { Side::Sell };
                    let offset = (index % 10) as f64 * 0.01;
                    let price = match side {
                        Side::Buy => 100.0 - offset,
                        Side::Sell => 100.1 + offset,
                    };
                    OrderEvent::new(index, *source, side, price, 10.0).with_time(1)
                })
                .collect();
            subscription.process(FeedMessage::new(key, symbol, *source, full, events));
        }
        info!("{} ready: {}", symbol, subscription.is_ready(symbol));
    }
}

fn feed_updates(subscription: &mut OrderViewSubscription<NullFeed>, count: u64) {
    for step in 0..count {
        let symbol_position = (step % SYMBOLS.len() as u64) as usize;
        let source_position = (step % SOURCES.len() as u64) as usize;
        let key = (symbol_position * SOURCES.len() + source_position) as u64 + 1;
        let source = SOURCES[source_position];
        let index = source_position as u64 * 100 + step % 20;
        let side = if index % 2 == 0 { Side::Buy } else { Side::Sell };
        let size = (step % 7 + 1) as f64;
        let price = match side {
            Side::Buy => 100.0 - (step % 10) as f64 * 0.01,
            Side::Sell => 100.1 + (step % 10) as f64 * 0.01,
        };
        subscription.process(FeedMessage::new(
            key,
            SYMBOLS[symbol_position],
            source,
            EventFlags::empty(),
            vec![OrderEvent::new(index, source, side, price, size).with_time(2)],
        ));
    }
}
