//! Inbound feed messages and outbound event batches

use super::flags::EventFlags;
use super::order::OrderEvent;
use super::symbol::{Source, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event kinds a feed channel can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    Order,
    SpreadOrder,
    Candle,
}

impl EventType {
    /// Only indexed order kinds can be consolidated into an order view.
    pub fn is_indexed_order(self) -> bool {
        matches!(self, EventType::Order | EventType::SpreadOrder)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Order => write!(f, "Order"),
            EventType::SpreadOrder => write!(f, "SpreadOrder"),
            EventType::Candle => write!(f, "Candle"),
        }
    }
}

/// Opaque identity of one in-flight per-source snapshot stream, issued by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotKey(pub u64);

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// One event buffer pushed by the feed handler for a (symbol, source) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedMessage {
    pub snapshot_key: SnapshotKey,
    pub symbol: Symbol,
    pub source: Source,
    pub event_type: EventType,
    pub flags: EventFlags,
    pub events: Vec<OrderEvent>,
}

impl FeedMessage {
    /// Create an `Order` message
    pub fn new(
        snapshot_key: u64,
        symbol: impl Into<Symbol>,
        source: impl Into<Source>,
        flags: EventFlags,
        events: Vec<OrderEvent>,
    ) -> Self {
        Self {
            snapshot_key: SnapshotKey(snapshot_key),
            symbol: symbol.into(),
            source: source.into(),
            event_type: EventType::Order,
            flags,
            events,
        }
    }

    pub fn with_event_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }
}

/// An ordered event buffer handed to the listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBatch {
    pub symbol: Symbol,
    pub event_type: EventType,
    /// Flags of the originating message for forwarded updates; empty for
    /// snapshots and coalesced transactions, whose removals are explicit
    /// sentinel events.
    pub flags: EventFlags,
    /// Sources whose per-source snapshots were rebuilt for this batch; every
    /// order previously received from them is superseded. Empty for updates.
    #[serde(default)]
    pub sources: Vec<Source>,
    pub events: Vec<OrderEvent>,
}

impl EventBatch {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderEvent> {
        self.events.iter()
    }

    /// Indices of the batch, in delivery order
    pub fn indices(&self) -> Vec<u64> {
        self.events.iter().map(|event| event.index).collect()
    }

    /// Returns true when `event` deletes its index from the consumer's view.
    pub fn is_removal(&self, event: &OrderEvent) -> bool {
        self.flags.is_remove_event() || event.is_sentinel_delete()
    }
}
