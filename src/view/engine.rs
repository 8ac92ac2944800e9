//! Order view consolidation engine
//!
//! Consumes per-source feed messages, rebuilds each source's snapshot, emits
//! one consolidated snapshot per symbol once every configured source has
//! completed, and afterwards turns incoming messages into consistent updates.

use super::buffer::EventBuffer;
use super::error::OrderViewError;
use super::listener::{Notification, OrderViewListener};
use super::readiness::SourceReadiness;
use super::registry::{SnapshotRegistry, SnapshotState};
use super::state::{Inbound, OrderViewState, Settlement, Transition, classify, settle};
use crate::events::{
    EventBatch, EventFlags, EventType, FeedMessage, OrderEvent, SnapshotKey, Source, Symbol,
};
use indexmap::IndexSet;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Single-threaded state machine behind an order view.
///
/// All methods take `&mut self`; the feed handler delivers messages one at a
/// time, so no internal locking is needed.
pub struct OrderViewEngine {
    event_type: EventType,
    sources: IndexSet<Source>,
    registry: SnapshotRegistry,
    readiness: SourceReadiness,
    states: HashMap<Symbol, OrderViewState>,
    listener: Option<Arc<dyn OrderViewListener>>,
}

impl OrderViewEngine {
    /// Create an engine for an indexed order event type
    pub fn new(event_type: EventType) -> Result<Self, OrderViewError> {
        if !event_type.is_indexed_order() {
            return Err(OrderViewError::UnsupportedEventType(event_type));
        }
        Ok(Self {
            event_type,
            sources: IndexSet::new(),
            registry: SnapshotRegistry::new(),
            readiness: SourceReadiness::new(),
            states: HashMap::new(),
            listener: None,
        })
    }

    /// Create an engine that reports to `listener`
    pub fn with_listener(
        event_type: EventType,
        listener: Arc<dyn OrderViewListener>,
    ) -> Result<Self, OrderViewError> {
        let mut engine = Self::new(event_type)?;
        engine.listener = Some(listener);
        Ok(engine)
    }

    pub fn set_listener(&mut self, listener: Arc<dyn OrderViewListener>) {
        self.listener = Some(listener);
    }

    /// Detach the listener; later messages are still processed but nothing is emitted.
    pub fn detach_listener(&mut self) -> Option<Arc<dyn OrderViewListener>> {
        self.listener.take()
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    pub fn sources(&self) -> &IndexSet<Source> {
        &self.sources
    }

    /// Configure the source set. Allowed exactly once, with at least one source.
    pub fn set_sources(&mut self, sources: IndexSet<Source>) -> Result<(), OrderViewError> {
        if !self.sources.is_empty() {
            return Err(OrderViewError::SourcesAlreadySet);
        }
        if sources.is_empty() {
            return Err(OrderViewError::EmptySources);
        }
        if sources.iter().any(Source::is_empty) {
            return Err(OrderViewError::EmptySymbol);
        }
        info!(sources = ?sources, "order view sources configured");
        self.sources = sources;
        Ok(())
    }

    /// Check that `symbol` may be added to this engine.
    pub fn validate_symbol(&self, symbol: &Symbol) -> Result<(), OrderViewError> {
        if self.sources.is_empty() {
            return Err(OrderViewError::SourcesNotSet);
        }
        if symbol.is_empty() {
            return Err(OrderViewError::EmptySymbol);
        }
        if symbol.is_candle() {
            return Err(OrderViewError::CandleSymbol(symbol.to_string()));
        }
        Ok(())
    }

    /// Start tracking `symbol`. Adding a tracked symbol again is a no-op.
    pub fn add_symbol(&mut self, symbol: &Symbol) -> Result<(), OrderViewError> {
        self.validate_symbol(symbol)?;
        if !self.states.contains_key(symbol) {
            self.states.insert(symbol.clone(), OrderViewState::UPDATE);
            self.readiness.register(symbol);
            debug!(symbol = %symbol, "symbol added to order view");
        }
        Ok(())
    }

    /// Stop tracking `symbol` and drop all of its state
    pub fn remove_symbol(&mut self, symbol: &Symbol) {
        if self.states.remove(symbol).is_some() {
            let dropped = self.registry.remove_symbol(symbol);
            self.readiness.unregister(symbol);
            debug!(symbol = %symbol, dropped, "symbol removed from order view");
        }
    }

    /// Drop every symbol; the next readiness cycle emits fresh snapshots.
    pub fn clear(&mut self) {
        self.states.clear();
        self.registry.clear();
        self.readiness.clear();
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.states.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    pub fn state(&self, symbol: &Symbol) -> Option<OrderViewState> {
        self.states.get(symbol).copied()
    }

    pub fn is_ready(&self, symbol: &Symbol) -> bool {
        self.state(symbol).is_some_and(OrderViewState::is_ready)
    }

    pub fn registry(&self) -> &SnapshotRegistry {
        &self.registry
    }

    pub fn readiness(&self) -> &SourceReadiness {
        &self.readiness
    }

    /// Feed one message into the state machine.
    pub fn process(&mut self, message: FeedMessage) {
        trace!(
            key = %message.snapshot_key,
            symbol = %message.symbol,
            source = %message.source,
            flags = ?message.flags,
            events = message.events.len(),
            "order view message"
        );

        if message.event_type != self.event_type {
            debug!(
                expected = %self.event_type,
                received = %message.event_type,
                "ignoring message of another event type"
            );
            return;
        }
        let Some(view_state) = self.states.get(&message.symbol).copied() else {
            debug!(symbol = %message.symbol, "ignoring message for unsubscribed symbol");
            return;
        };
        if !self.sources.contains(&message.source) {
            debug!(source = %message.source, "ignoring message from unconfigured source");
            return;
        }

        let entry = self.registry.get(message.snapshot_key);
        let inbound = Inbound {
            flags: message.flags,
            known_key: entry.is_some(),
            ready: view_state.is_ready(),
            pending: view_state.is_pending(),
            duplicate_pair: entry
                .is_some_and(|entry| is_duplicate_pair(entry.buffer(), &message.events)),
        };
        let transition = classify(&inbound);
        trace!(?transition, state = ?view_state, "order view transition");

        match transition {
            Transition::DropSymbol => self.drop_symbol(&message.symbol),
            Transition::StartSnapshot => self.start_snapshot(message),
            Transition::RestartSnapshot => self.restart_snapshot(message),
            Transition::RetainDuplicate => self.retain_duplicate(message),
            Transition::ForwardUpdate => self.forward_update(message),
            Transition::AccumulateTransaction => self.accumulate_transaction(message),
            Transition::Accumulate => self.accumulate(message),
            Transition::Ignore => {
                trace!(key = %message.snapshot_key, "no snapshot to attach message to");
            }
        }
    }

    fn drop_symbol(&mut self, symbol: &Symbol) {
        let dropped = self.registry.remove_symbol(symbol);
        self.readiness.reset(symbol);
        self.states.insert(symbol.clone(), OrderViewState::UPDATE);
        info!(symbol = %symbol, dropped, "symbol removed by feed, awaiting new snapshot");
    }

    fn start_snapshot(&mut self, message: FeedMessage) {
        let FeedMessage {
            snapshot_key,
            symbol,
            source,
            flags,
            events,
            ..
        } = message;

        let entry = self
            .registry
            .insert(snapshot_key, symbol.clone(), source.clone());
        store_snapshot(&mut entry.buffer, events, flags);
        entry.last_flags = persisted(flags);
        debug!(
            key = %snapshot_key,
            symbol = %symbol,
            source = %source,
            events = entry.buffer.len(),
            "snapshot started"
        );

        self.enter_update(&symbol);
        self.settle_entry(snapshot_key, &symbol, &source, flags);
    }

    fn restart_snapshot(&mut self, message: FeedMessage) {
        let FeedMessage {
            snapshot_key,
            symbol,
            source,
            flags,
            events,
            ..
        } = message;

        if let Some(entry) = self.registry.get_mut(snapshot_key) {
            entry.restart();
            store_snapshot(&mut entry.buffer, events, flags);
            entry.last_flags = persisted(flags);
        }
        self.readiness.revoke(&symbol, &source);
        debug!(key = %snapshot_key, symbol = %symbol, source = %source, "snapshot restarted");

        self.enter_update(&symbol);
        self.settle_entry(snapshot_key, &symbol, &source, flags);
    }

    fn retain_duplicate(&mut self, message: FeedMessage) {
        let FeedMessage {
            snapshot_key,
            symbol,
            source,
            flags,
            events,
            ..
        } = message;

        if let Some(entry) = self.registry.get_mut(snapshot_key) {
            apply_events(&mut entry.buffer, events, flags.is_remove_event());
            entry.last_flags = persisted(flags);
        }
        trace!(key = %snapshot_key, "begin repeated with opposite side, keeping both");
        self.settle_entry(snapshot_key, &symbol, &source, flags);
    }

    fn forward_update(&mut self, message: FeedMessage) {
        let batch = EventBatch {
            symbol: message.symbol,
            event_type: self.event_type,
            flags: message.flags,
            sources: Vec::new(),
            events: message.events,
        };
        self.emit(Notification::Update(&batch));
    }

    fn accumulate_transaction(&mut self, message: FeedMessage) {
        let FeedMessage {
            snapshot_key,
            symbol,
            flags,
            events,
            ..
        } = message;

        let Some(entry) = self.registry.get_mut(snapshot_key) else {
            return;
        };
        let remove = flags.is_remove_event();
        let transaction = entry.transaction.get_or_insert_with(EventBuffer::new);
        for event in events {
            if remove || event.is_sentinel_delete() {
                transaction.add(event.to_removal());
            } else {
                transaction.add(event);
            }
        }
        entry.last_flags = persisted(flags);

        if flags.is_tx_pending() {
            if let Some(state) = self.states.get_mut(&symbol) {
                state.insert(OrderViewState::PENDING);
            }
            trace!(key = %snapshot_key, "transaction continues");
            return;
        }

        let events = entry
            .transaction
            .take()
            .map(|mut buffer| buffer.take())
            .unwrap_or_default();
        let still_pending = self.registry.has_open_transaction(&symbol);
        if let Some(state) = self.states.get_mut(&symbol) {
            state.set(OrderViewState::PENDING, still_pending);
        }

        if events.is_empty() {
            trace!(key = %snapshot_key, "transaction closed without changes");
            return;
        }
        debug!(symbol = %symbol, events = events.len(), "transaction committed");
        let batch = EventBatch {
            symbol,
            event_type: self.event_type,
            flags: EventFlags::empty(),
            sources: Vec::new(),
            events,
        };
        self.emit(Notification::Update(&batch));
    }

    fn accumulate(&mut self, message: FeedMessage) {
        let FeedMessage {
            snapshot_key,
            symbol,
            source,
            flags,
            events,
            ..
        } = message;

        let received = self.readiness.has_received(&symbol, &source);
        let Some(entry) = self.registry.get_mut(snapshot_key) else {
            return;
        };
        let continuing = entry.last_flags.is_transaction_open();
        apply_events(&mut entry.buffer, events, flags.is_remove_event());
        entry.last_flags = persisted(flags);

        if !continuing && received && flags.is_empty() {
            if entry.state == SnapshotState::Broken {
                debug!(
                    key = %snapshot_key,
                    "steady-state merge into a broken snapshot of a received source"
                );
            }
            return;
        }
        self.settle_entry(snapshot_key, &symbol, &source, flags);
    }

    fn settle_entry(
        &mut self,
        snapshot_key: SnapshotKey,
        symbol: &Symbol,
        source: &Source,
        flags: EventFlags,
    ) {
        let Some(entry) = self.registry.get_mut(snapshot_key) else {
            return;
        };
        match settle(flags, entry.state) {
            Settlement::Heal => {
                entry.state = SnapshotState::Unbroken;
                entry.completed = true;
                debug!(key = %snapshot_key, "broken snapshot recovered");
                self.complete(symbol, source);
            }
            Settlement::Idle => {}
            Settlement::HoldTransaction => {
                trace!(key = %snapshot_key, "snapshot transaction pending");
            }
            Settlement::Complete => {
                entry.state = SnapshotState::Unbroken;
                entry.completed = true;
                self.complete(symbol, source);
            }
            Settlement::Break => {
                entry.state = SnapshotState::Broken;
                warn!(
                    key = %snapshot_key,
                    symbol = %symbol,
                    source = %source,
                    flags = ?flags,
                    "snapshot broken by ambiguous message, awaiting recovery"
                );
            }
        }
    }

    fn complete(&mut self, symbol: &Symbol, source: &Source) {
        self.readiness.record(symbol, source);
        if !self.readiness.is_ready(symbol, &self.sources) {
            debug!(
                symbol = %symbol,
                source = %source,
                received = ?self.readiness.received(symbol),
                "source complete, waiting for remaining sources"
            );
            return;
        }

        let order = self.readiness.received(symbol);
        let (mut events, rebuilt) = self.registry.drain_symbol(symbol, order.iter());
        events.sort_by_key(|event| event.index);
        if let Some(state) = self.states.get_mut(symbol) {
            state.remove(OrderViewState::UPDATE);
            state.insert(OrderViewState::READY);
        }
        info!(
            symbol = %symbol,
            events = events.len(),
            rebuilt = ?rebuilt,
            "consolidated snapshot ready"
        );

        let batch = EventBatch {
            symbol: symbol.clone(),
            event_type: self.event_type,
            flags: EventFlags::empty(),
            sources: rebuilt,
            events,
        };
        self.emit(Notification::Snapshot(&batch));
    }

    fn enter_update(&mut self, symbol: &Symbol) {
        if let Some(state) = self.states.get_mut(symbol) {
            if state.intersects(OrderViewState::READY | OrderViewState::PENDING) {
                self.registry.abandon_transactions(symbol);
                debug!(symbol = %symbol, "order view left ready state");
            }
            *state = OrderViewState::UPDATE;
        }
    }

    fn emit(&self, notification: Notification<'_>) {
        match &self.listener {
            Some(listener) => notification.dispatch(listener.as_ref()),
            None => trace!(
                symbol = %notification.batch().symbol,
                "no listener attached, dropping notification"
            ),
        }
    }
}

/// A repeated single-event begin whose event sits on the other side of the
/// single buffered event.
fn is_duplicate_pair(buffer: &EventBuffer, events: &[OrderEvent]) -> bool {
    match (buffer.first(), events) {
        (Some(existing), [incoming]) => buffer.len() == 1 && existing.side != incoming.side,
        _ => false,
    }
}

/// Flags remembered for a key. `TX_PENDING` is kept only without
/// `REMOVE_EVENT`; a removal never leaves a transaction open.
fn persisted(flags: EventFlags) -> EventFlags {
    if flags.is_remove_event() {
        flags.difference(EventFlags::TX_PENDING)
    } else {
        flags
    }
}

/// Store the events of a snapshot-opening message. Removals never enter a
/// fresh snapshot.
fn store_snapshot(buffer: &mut EventBuffer, events: Vec<OrderEvent>, flags: EventFlags) {
    if flags.is_remove_event() {
        return;
    }
    buffer.extend(events.into_iter().filter(|event| !event.is_sentinel_delete()));
}

/// Upsert events into a per-source buffer; sentinel deletes and flagged
/// removals delete their index.
fn apply_events(buffer: &mut EventBuffer, events: Vec<OrderEvent>, remove: bool) {
    for event in events {
        if remove || event.is_sentinel_delete() {
            buffer.remove(event.index);
        } else {
            buffer.add(event);
        }
    }
}
