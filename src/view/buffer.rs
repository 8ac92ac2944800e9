//! Ordered per-symbol container of indexed events

use crate::events::OrderEvent;
use std::collections::BTreeMap;

/// Mutable buffer of order events keyed by index.
///
/// Iteration is always in ascending index order. Not synchronized; the
/// owner serializes access.
#[derive(Debug, Clone, Default)]
pub struct EventBuffer {
    events: BTreeMap<u64, OrderEvent>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the event stored under its index, returning the replaced one
    pub fn add(&mut self, event: OrderEvent) -> Option<OrderEvent> {
        self.events.insert(event.index, event)
    }

    /// Remove the event at `index`. Missing indices are a no-op.
    pub fn remove(&mut self, index: u64) -> Option<OrderEvent> {
        self.events.remove(&index)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// The event with the lowest index
    pub fn first(&self) -> Option<&OrderEvent> {
        self.events.values().next()
    }

    pub fn get(&self, index: u64) -> Option<&OrderEvent> {
        self.events.get(&index)
    }

    pub fn contains(&self, index: u64) -> bool {
        self.events.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderEvent> {
        self.events.values()
    }

    /// Indices currently held, ascending
    pub fn indices(&self) -> Vec<u64> {
        self.events.keys().copied().collect()
    }

    /// Move every event out in ascending index order, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.events).into_values().collect()
    }
}

impl Extend<OrderEvent> for EventBuffer {
    fn extend<I: IntoIterator<Item = OrderEvent>>(&mut self, iter: I) {
        for event in iter {
            self.add(event);
        }
    }
}

impl FromIterator<OrderEvent> for EventBuffer {
    fn from_iter<I: IntoIterator<Item = OrderEvent>>(iter: I) -> Self {
        let mut buffer = EventBuffer::new();
        buffer.extend(iter);
        buffer
    }
}
