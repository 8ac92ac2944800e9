//! Indexed order events as delivered by the feed

use super::message::EventType;
use super::symbol::Source;
use pricelevel::Side;
use serde::{Deserialize, Serialize};

/// Aggregation scope of an order event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Composite,
    Regional,
    Aggregate,
    #[default]
    Order,
}

/// Fields specific to each indexed order event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderDetails {
    /// A plain order, optionally attributed to a market maker.
    Order { market_maker: Option<String> },
    /// An order on a spread instrument.
    SpreadOrder { spread_symbol: String },
}

impl Default for OrderDetails {
    fn default() -> Self {
        OrderDetails::Order { market_maker: None }
    }
}

impl OrderDetails {
    /// The event type this kind of order is published under
    pub fn event_type(&self) -> EventType {
        match self {
            OrderDetails::Order { .. } => EventType::Order,
            OrderDetails::SpreadOrder { .. } => EventType::SpreadOrder,
        }
    }
}

/// One indexed order event.
///
/// `index` is unique within a (symbol, source) snapshot and is the key every
/// buffer and consumer applies the event by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub index: u64,
    /// Event time in milliseconds since epoch
    pub time: i64,
    pub sequence: u32,
    pub price: f64,
    pub size: f64,
    pub side: Side,
    pub scope: Scope,
    pub source: Source,
    pub details: OrderDetails,
}

impl OrderEvent {
    /// Create a plain order event with zero time and default scope
    pub fn new(index: u64, source: impl Into<Source>, side: Side, price: f64, size: f64) -> Self {
        Self {
            index,
            time: 0,
            sequence: 0,
            price,
            size,
            side,
            scope: Scope::default(),
            source: source.into(),
            details: OrderDetails::default(),
        }
    }

    /// Create the sentinel-delete event for `index`
    pub fn removal(index: u64, source: impl Into<Source>, side: Side) -> Self {
        Self::new(index, source, side, f64::NAN, 0.0)
    }

    pub fn with_time(mut self, time: i64) -> Self {
        self.time = time;
        self
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_details(mut self, details: OrderDetails) -> Self {
        self.details = details;
        self
    }

    /// An event with zero time, NaN price and zero size deletes its index,
    /// whatever flags the message carries.
    pub fn is_sentinel_delete(&self) -> bool {
        self.time == 0 && self.price.is_nan() && self.size == 0.0
    }

    /// Returns the sentinel-delete form of this event, keeping its identity fields.
    pub fn to_removal(&self) -> Self {
        Self {
            time: 0,
            price: f64::NAN,
            size: 0.0,
            ..self.clone()
        }
    }

    pub fn event_type(&self) -> EventType {
        self.details.event_type()
    }
}
