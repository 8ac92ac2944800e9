//! Boundary to the external feed handler

use crate::events::{EventType, Source, Symbol};
use crate::view::FeedError;

/// Snapshot handle management owned by the feed handler.
///
/// The feed handler creates one snapshot stream per (symbol, source) pair and
/// pushes its messages back through [`super::OrderViewSubscription::process`].
pub trait SnapshotFeed {
    /// Open the snapshot stream for `symbol` from `source`.
    fn create_snapshot(
        &mut self,
        symbol: &Symbol,
        source: &Source,
        event_type: EventType,
    ) -> Result<(), FeedError>;

    /// Close a stream previously opened with [`SnapshotFeed::create_snapshot`].
    fn close_snapshot(&mut self, symbol: &Symbol, source: &Source, event_type: EventType);
}

/// Feed that accepts every handle and does nothing, for replaying recorded
/// messages straight into a subscription.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFeed;

impl SnapshotFeed for NullFeed {
    fn create_snapshot(
        &mut self,
        _symbol: &Symbol,
        _source: &Source,
        _event_type: EventType,
    ) -> Result<(), FeedError> {
        Ok(())
    }

    fn close_snapshot(&mut self, _symbol: &Symbol, _source: &Source, _event_type: EventType) {}
}
