//! Point-in-time copy of one symbol's consolidated orders

use crate::events::OrderEvent;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A snapshot of a symbol's consolidated orders at a specific point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// The symbol of the order view
    pub symbol: String,

    /// Timestamp when the snapshot was taken (milliseconds since epoch)
    pub timestamp: u64,

    /// Buy orders, highest price first
    pub bids: Vec<OrderEvent>,

    /// Sell orders, lowest price first
    pub asks: Vec<OrderEvent>,
}

impl BookSnapshot {
    /// Get the best bid price and its order size
    pub fn best_bid(&self) -> Option<(f64, f64)> {
        let bid = self.bids.first().map(|order| (order.price, order.size));
        trace!("best_bid: {:?}", bid);
        bid
    }

    /// Get the best ask price and its order size
    pub fn best_ask(&self) -> Option<(f64, f64)> {
        let ask = self.asks.first().map(|order| (order.price, order.size));
        trace!("best_ask: {:?}", ask);
        ask
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        let mid_price = match (self.best_bid(), self.best_ask()) {
            (Some((bid_price, _)), Some((ask_price, _))) => Some((bid_price + ask_price) / 2.0),
            _ => None,
        };
        trace!("mid_price: {:?}", mid_price);
        mid_price
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<f64> {
        let spread = match (self.best_bid(), self.best_ask()) {
            (Some((bid_price, _)), Some((ask_price, _))) => Some(ask_price - bid_price),
            _ => None,
        };
        trace!("spread: {:?}", spread);
        spread
    }

    /// Total size resting on the bid side
    pub fn total_bid_size(&self) -> f64 {
        let size: f64 = self.bids.iter().map(|order| order.size).sum();
        trace!("total_bid_size: {:?}", size);
        size
    }

    /// Total size resting on the ask side
    pub fn total_ask_size(&self) -> f64 {
        let size: f64 = self.asks.iter().map(|order| order.size).sum();
        trace!("total_ask_size: {:?}", size);
        size
    }

    pub fn order_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
