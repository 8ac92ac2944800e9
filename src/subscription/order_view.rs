//! Order view subscription: configuration surface and feed entry point

use super::config::SubscriptionConfig;
use super::feed::SnapshotFeed;
use crate::events::{EventType, FeedMessage, Source, Symbol};
use crate::view::{OrderViewEngine, OrderViewError, OrderViewListener, OrderViewState};
use indexmap::IndexSet;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// A subscription to indexed order events consolidated across sources.
///
/// Sources are configured exactly once, before any symbol. Every symbol gets
/// one feed snapshot handle per source. Messages pushed by the feed handler
/// go through [`OrderViewSubscription::process`]; consolidated output reaches
/// the listener.
pub struct OrderViewSubscription<F: SnapshotFeed> {
    id: Uuid,
    feed: F,
    engine: OrderViewEngine,
    symbols: IndexSet<Symbol>,
    closed: bool,
}

impl<F: SnapshotFeed> OrderViewSubscription<F> {
    /// Create a subscription for `event_type` reporting to `listener`
    pub fn new(
        feed: F,
        event_type: EventType,
        listener: Arc<dyn OrderViewListener>,
    ) -> Result<Self, OrderViewError> {
        let engine = OrderViewEngine::with_listener(event_type, listener)?;
        let id = Uuid::new_v4();
        info!(subscription = %id, event_type = %event_type, "order view subscription created");
        Ok(Self {
            id,
            feed,
            engine,
            symbols: IndexSet::new(),
            closed: false,
        })
    }

    /// Create a subscription and apply `config`: sources first, then symbols.
    pub fn from_config(
        feed: F,
        config: &SubscriptionConfig,
        listener: Arc<dyn OrderViewListener>,
    ) -> Result<Self, OrderViewError> {
        let mut subscription = Self::new(feed, config.event_type, listener)?;
        subscription.set_sources(&config.sources)?;
        if !config.symbols.is_empty() {
            subscription.add_symbols(&config.symbols)?;
        }
        Ok(subscription)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_type(&self) -> EventType {
        self.engine.event_type()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    /// Configured sources in declaration order
    pub fn sources(&self) -> Vec<Source> {
        self.engine.sources().iter().cloned().collect()
    }

    /// Subscribed symbols in subscription order
    pub fn symbols(&self) -> Vec<Symbol> {
        self.symbols.iter().cloned().collect()
    }

    pub fn is_ready(&self, symbol: &str) -> bool {
        self.engine.is_ready(&Symbol::new(symbol))
    }

    pub fn state(&self, symbol: &str) -> Option<OrderViewState> {
        self.engine.state(&Symbol::new(symbol))
    }

    /// Configure the source set. Allowed once, before any symbol is added.
    pub fn set_sources<I, S>(&mut self, sources: I) -> Result<(), OrderViewError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_open()?;
        let sources: IndexSet<Source> = sources
            .into_iter()
            .map(|source| Source::new(source.as_ref()))
            .collect();
        self.engine.set_sources(sources)?;
        info!(subscription = %self.id, sources = ?self.engine.sources(), "sources set");
        Ok(())
    }

    pub fn add_symbol(&mut self, symbol: &str) -> Result<(), OrderViewError> {
        self.add_symbols([symbol])
    }

    /// Subscribe `symbols`.
    ///
    /// Every symbol is validated before any feed handle is created. If the
    /// feed fails to create a handle, the handles created by this call are
    /// closed again and the error is returned.
    pub fn add_symbols<I, S>(&mut self, symbols: I) -> Result<(), OrderViewError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_open()?;
        let requested = self.validated(symbols)?;
        let fresh = self.unsubscribed(&requested);
        self.open_handles(&fresh)?;
        self.commit(fresh)
    }

    /// Unsubscribe `symbols`, closing their feed handles and dropping their state.
    /// Unknown symbols are ignored.
    pub fn remove_symbols<I, S>(&mut self, symbols: I) -> Result<(), OrderViewError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_open()?;
        for symbol in symbols.into_iter().map(|symbol| Symbol::new(symbol.as_ref())) {
            if self.symbols.shift_remove(&symbol) {
                self.release(&symbol);
            }
        }
        Ok(())
    }

    /// Replace the subscribed symbols with `symbols`.
    ///
    /// Handles for the new symbols are opened before any stale symbol is
    /// released, so a feed failure leaves the subscription unchanged.
    pub fn set_symbols<I, S>(&mut self, symbols: I) -> Result<(), OrderViewError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_open()?;
        let wanted = self.validated(symbols)?;
        let fresh = self.unsubscribed(&wanted);
        self.open_handles(&fresh)?;

        let stale: Vec<Symbol> = self
            .symbols
            .iter()
            .filter(|symbol| !wanted.contains(*symbol))
            .cloned()
            .collect();
        for symbol in &stale {
            self.symbols.shift_remove(symbol);
            self.release(symbol);
        }
        self.commit(fresh)
    }

    /// Unsubscribe every symbol. Sources stay configured.
    pub fn clear(&mut self) -> Result<(), OrderViewError> {
        self.ensure_open()?;
        let all: Vec<Symbol> = self.symbols.drain(..).collect();
        for symbol in &all {
            self.release(symbol);
        }
        self.engine.clear();
        info!(subscription = %self.id, "symbols cleared");
        Ok(())
    }

    /// Entry point for the feed handler: process one pushed message.
    pub fn process(&mut self, message: FeedMessage) {
        if self.closed {
            trace!(subscription = %self.id, "dropping message for closed subscription");
            return;
        }
        self.engine.process(message);
    }

    /// Close every feed handle, detach the listener and drop all state.
    /// Calling it again has no effect.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        let all: Vec<Symbol> = self.symbols.drain(..).collect();
        for symbol in &all {
            self.release(symbol);
        }
        self.engine.clear();
        self.engine.detach_listener();
        self.closed = true;
        info!(subscription = %self.id, "order view subscription closed");
    }

    fn ensure_open(&self) -> Result<(), OrderViewError> {
        if self.closed {
            Err(OrderViewError::Closed)
        } else {
            Ok(())
        }
    }

    fn validated<I, S>(&self, symbols: I) -> Result<IndexSet<Symbol>, OrderViewError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let symbols: IndexSet<Symbol> = symbols
            .into_iter()
            .map(|symbol| Symbol::new(symbol.as_ref()))
            .collect();
        for symbol in &symbols {
            self.engine.validate_symbol(symbol)?;
        }
        Ok(symbols)
    }

    fn unsubscribed(&self, symbols: &IndexSet<Symbol>) -> Vec<Symbol> {
        symbols
            .iter()
            .filter(|symbol| !self.symbols.contains(*symbol))
            .cloned()
            .collect()
    }

    /// Open one feed handle per (symbol, source). On failure the handles
    /// opened here are closed again in reverse order.
    fn open_handles(&mut self, symbols: &[Symbol]) -> Result<(), OrderViewError> {
        let event_type = self.engine.event_type();
        let sources: Vec<Source> = self.engine.sources().iter().cloned().collect();
        let mut opened: Vec<(&Symbol, &Source)> = Vec::new();
        for symbol in symbols {
            for source in &sources {
                if let Err(err) = self.feed.create_snapshot(symbol, source, event_type) {
                    warn!(subscription = %self.id, error = %err, "snapshot handle creation failed");
                    for (symbol, source) in opened.iter().rev() {
                        self.feed.close_snapshot(symbol, source, event_type);
                    }
                    return Err(err.into());
                }
                opened.push((symbol, source));
            }
        }
        Ok(())
    }

    /// Start tracking symbols whose handles are already open.
    fn commit(&mut self, symbols: Vec<Symbol>) -> Result<(), OrderViewError> {
        for symbol in symbols {
            self.engine.add_symbol(&symbol)?;
            debug!(subscription = %self.id, symbol = %symbol, "symbol subscribed");
            self.symbols.insert(symbol);
        }
        Ok(())
    }

    fn release(&mut self, symbol: &Symbol) {
        let event_type = self.engine.event_type();
        for source in self.engine.sources() {
            self.feed.close_snapshot(symbol, source, event_type);
        }
        self.engine.remove_symbol(symbol);
        debug!(subscription = %self.id, symbol = %symbol, "symbol released");
    }
}

impl<F: SnapshotFeed> Drop for OrderViewSubscription<F> {
    fn drop(&mut self) {
        self.close();
    }
}
