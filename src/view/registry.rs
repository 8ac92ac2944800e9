//! Snapshot registry: one in-flight per-source buffer per snapshot key

use super::buffer::EventBuffer;
use crate::events::{EventFlags, OrderEvent, SnapshotKey, Source, Symbol};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Consistency of a per-source snapshot buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotState {
    #[default]
    Unbroken,
    /// An ambiguous partial update was seen; the buffer is invalid until a
    /// zero-flag message or a new snapshot end arrives.
    Broken,
}

/// Everything tracked for one snapshot key.
#[derive(Debug)]
pub struct SnapshotEntry {
    pub(super) symbol: Symbol,
    pub(super) source: Source,
    pub(super) buffer: EventBuffer,
    pub(super) last_flags: EventFlags,
    pub(super) state: SnapshotState,
    /// Accumulator for an open post-readiness transaction
    pub(super) transaction: Option<EventBuffer>,
    /// Completed since its buffer was last drained
    pub(super) completed: bool,
}

impl SnapshotEntry {
    fn new(symbol: Symbol, source: Source) -> Self {
        Self {
            symbol,
            source,
            buffer: EventBuffer::new(),
            last_flags: EventFlags::empty(),
            state: SnapshotState::Unbroken,
            transaction: None,
            completed: false,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn buffer(&self) -> &EventBuffer {
        &self.buffer
    }

    pub fn last_flags(&self) -> EventFlags {
        self.last_flags
    }

    pub fn state(&self) -> SnapshotState {
        self.state
    }

    pub fn has_open_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Forget everything accumulated so far, keeping the key registered.
    pub(super) fn restart(&mut self) {
        self.buffer.clear();
        self.last_flags = EventFlags::empty();
        self.state = SnapshotState::Unbroken;
        self.transaction = None;
        self.completed = false;
    }
}

/// Maps snapshot keys to their per-source buffers.
#[derive(Debug, Default)]
pub struct SnapshotRegistry {
    entries: HashMap<SnapshotKey, SnapshotEntry>,
}

impl SnapshotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: SnapshotKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn get(&self, key: SnapshotKey) -> Option<&SnapshotEntry> {
        self.entries.get(&key)
    }

    pub(super) fn get_mut(&mut self, key: SnapshotKey) -> Option<&mut SnapshotEntry> {
        self.entries.get_mut(&key)
    }

    /// Register a fresh, empty entry for `key`, replacing any previous one.
    pub(super) fn insert(
        &mut self,
        key: SnapshotKey,
        symbol: Symbol,
        source: Source,
    ) -> &mut SnapshotEntry {
        let entry = SnapshotEntry::new(symbol, source);
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(entry);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(entry),
        }
    }

    /// Drop every entry of `symbol`, returning how many were removed.
    pub(super) fn remove_symbol(&mut self, symbol: &Symbol) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| &entry.symbol != symbol);
        before - self.entries.len()
    }

    /// Drop open transaction accumulators of `symbol`.
    pub(super) fn abandon_transactions(&mut self, symbol: &Symbol) {
        for entry in self.entries.values_mut() {
            if &entry.symbol == symbol {
                entry.transaction = None;
            }
        }
    }

    pub fn has_open_transaction(&self, symbol: &Symbol) -> bool {
        self.entries
            .values()
            .any(|entry| &entry.symbol == symbol && entry.transaction.is_some())
    }

    /// Keys registered for `symbol`, ascending
    pub fn keys_for(&self, symbol: &Symbol) -> Vec<SnapshotKey> {
        let mut keys: Vec<SnapshotKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| &entry.symbol == symbol)
            .map(|(key, _)| *key)
            .collect();
        keys.sort();
        keys
    }

    /// Concatenate and clear the buffers of `symbol`, source by source in the
    /// given order. Entries stay registered.
    ///
    /// Also returns the sources with an entry completed since the previous
    /// drain, in the same order.
    pub(super) fn drain_symbol<'a>(
        &mut self,
        symbol: &Symbol,
        sources: impl IntoIterator<Item = &'a Source>,
    ) -> (Vec<OrderEvent>, Vec<Source>) {
        let keys = self.keys_for(symbol);
        let mut events = Vec::new();
        let mut rebuilt = Vec::new();
        for source in sources {
            for key in &keys {
                if let Some(entry) = self.entries.get_mut(key) {
                    if &entry.source == source {
                        events.extend(entry.buffer.take());
                        if entry.completed && !rebuilt.contains(source) {
                            rebuilt.push(source.clone());
                        }
                        entry.completed = false;
                    }
                }
            }
        }
        (events, rebuilt)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
    }
}
