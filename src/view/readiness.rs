//! Per-symbol record of which sources delivered a complete snapshot

use crate::events::{Source, Symbol};
use indexmap::IndexSet;
use std::collections::HashMap;

/// Tracks, per symbol, the sources that completed at least one per-source
/// snapshot, in the order they completed.
///
/// A symbol is ready when its received set covers every configured source.
#[derive(Debug, Default)]
pub struct SourceReadiness {
    received: HashMap<Symbol, IndexSet<Source>>,
}

impl SourceReadiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `symbol` with an empty received set.
    pub fn register(&mut self, symbol: &Symbol) {
        self.received.entry(symbol.clone()).or_default();
    }

    /// Stop tracking `symbol`
    pub fn unregister(&mut self, symbol: &Symbol) {
        self.received.remove(symbol);
    }

    /// Empty the received set of `symbol` while keeping it tracked.
    pub fn reset(&mut self, symbol: &Symbol) {
        if let Some(received) = self.received.get_mut(symbol) {
            received.clear();
        }
    }

    /// Record that `source` completed a snapshot for `symbol`. Returns true
    /// if the source was not recorded before.
    pub fn record(&mut self, symbol: &Symbol, source: &Source) -> bool {
        self.received
            .entry(symbol.clone())
            .or_default()
            .insert(source.clone())
    }

    /// Withdraw `source` so it has to complete a snapshot again.
    pub fn revoke(&mut self, symbol: &Symbol, source: &Source) -> bool {
        self.received
            .get_mut(symbol)
            .is_some_and(|received| received.shift_remove(source))
    }

    pub fn has_received(&self, symbol: &Symbol, source: &Source) -> bool {
        self.received
            .get(symbol)
            .is_some_and(|received| received.contains(source))
    }

    /// True when the received set of `symbol` is a superset of `configured`.
    pub fn is_ready(&self, symbol: &Symbol, configured: &IndexSet<Source>) -> bool {
        match self.received.get(symbol) {
            Some(received) => configured.iter().all(|source| received.contains(source)),
            None => false,
        }
    }

    /// Received sources of `symbol` in completion order
    pub fn received(&self, symbol: &Symbol) -> Vec<Source> {
        self.received
            .get(symbol)
            .map(|received| received.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_tracked(&self, symbol: &Symbol) -> bool {
        self.received.contains_key(symbol)
    }

    pub fn clear(&mut self) {
        self.received.clear();
    }
}
