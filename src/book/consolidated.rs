//! Listener keeping a thread-safe copy of every consolidated view

use super::snapshot::BookSnapshot;
use crate::events::{EventBatch, OrderEvent, Symbol};
use crate::utils::current_time_millis;
use crate::view::OrderViewListener;
use dashmap::DashMap;
use pricelevel::Side;
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Default)]
struct SymbolBook {
    orders: BTreeMap<u64, OrderEvent>,
    last_update: u64,
}

impl SymbolBook {
    fn apply(&mut self, batch: &EventBatch) {
        for event in batch.iter() {
            if batch.is_removal(event) {
                self.orders.remove(&event.index);
            } else {
                self.orders.insert(event.index, event.clone());
            }
        }
        self.last_update = current_time_millis();
    }
}

/// Order view listener that mirrors each symbol's consolidated orders.
///
/// Callbacks arrive on the feed thread; reads may come from any thread. The
/// per-symbol maps live in a concurrent map so readers never block the feed
/// for longer than one symbol's update.
#[derive(Debug, Default)]
pub struct ConsolidatedBook {
    books: DashMap<Symbol, SymbolBook>,
}

impl ConsolidatedBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the current orders of `symbol`, split by side and sorted best first
    pub fn snapshot(&self, symbol: &str) -> Option<BookSnapshot> {
        let symbol = Symbol::new(symbol);
        let book = self.books.get(&symbol)?;

        let mut bids: Vec<OrderEvent> = Vec::new();
        let mut asks: Vec<OrderEvent> = Vec::new();
        for order in book.orders.values() {
            match order.side {
                Side::Buy => bids.push(order.clone()),
                Side::Sell => asks.push(order.clone()),
            }
        }
        bids.sort_by(|a, b| b.price.total_cmp(&a.price));
        asks.sort_by(|a, b| a.price.total_cmp(&b.price));

        Some(BookSnapshot {
            symbol: symbol.to_string(),
            timestamp: book.last_update,
            bids,
            asks,
        })
    }

    pub fn order(&self, symbol: &str, index: u64) -> Option<OrderEvent> {
        self.books
            .get(&Symbol::new(symbol))
            .and_then(|book| book.orders.get(&index).cloned())
    }

    pub fn order_count(&self, symbol: &str) -> usize {
        self.books
            .get(&Symbol::new(symbol))
            .map(|book| book.orders.len())
            .unwrap_or(0)
    }

    /// Highest buy price of `symbol`
    pub fn best_bid(&self, symbol: &str) -> Option<f64> {
        self.best_price(symbol, Side::Buy)
    }

    /// Lowest sell price of `symbol`
    pub fn best_ask(&self, symbol: &str) -> Option<f64> {
        self.best_price(symbol, Side::Sell)
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.books.iter().map(|item| item.key().clone()).collect();
        symbols.sort();
        symbols
    }

    pub fn remove_symbol(&self, symbol: &str) -> bool {
        self.books.remove(&Symbol::new(symbol)).is_some()
    }

    pub fn clear(&self) {
        self.books.clear();
    }

    fn best_price(&self, symbol: &str, side: Side) -> Option<f64> {
        let book = self.books.get(&Symbol::new(symbol))?;
        let prices = book
            .orders
            .values()
            .filter(|order| order.side == side)
            .map(|order| order.price);
        match side {
            Side::Buy => prices.max_by(f64::total_cmp),
            Side::Sell => prices.min_by(f64::total_cmp),
        }
    }
}

impl OrderViewListener for ConsolidatedBook {
    fn on_snapshot(&self, batch: &EventBatch) {
        trace!(symbol = %batch.symbol, events = batch.len(), "book snapshot");
        let mut book = self.books.entry(batch.symbol.clone()).or_default();
        book.orders.retain(|_, order| !batch.sources.contains(&order.source));
        book.apply(batch);
    }

    fn on_update(&self, batch: &EventBatch) {
        trace!(symbol = %batch.symbol, events = batch.len(), "book update");
        self.books
            .entry(batch.symbol.clone())
            .or_default()
            .apply(batch);
    }
}
