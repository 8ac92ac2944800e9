//! # Order View Consolidation Engine
//!
//! A market-data client library that subscribes to indexed order events published by several
//! independent sources (liquidity venues or synthetic aggregates) and hands the caller one
//! consistent, continuously updated view of each instrument's book.
//!
//! The feed delivers data as discrete event buffers. Each buffer is tagged with a symbol, a
//! source, an opaque snapshot key and a bitset of transactional flags
//! ([`EventFlags`]). Sources publish overlapping or disjoint slices of the same logical book, and
//! a view only becomes meaningful once every configured source has delivered a complete snapshot.
//!
//! ## Key Features
//!
//! - **Per-source snapshot reconstruction**: every snapshot key owns an [`EventBuffer`] that
//!   accumulates events between `SNAPSHOT_BEGIN` and `SNAPSHOT_END`/`SNAPSHOT_SNIP`, including
//!   interrupted and restarted snapshots.
//!
//! - **Exactly-once consolidation**: once the received-source set of a symbol covers the
//!   configured sources, all per-source buffers are concatenated into one index-ordered batch and
//!   delivered through [`OrderViewListener::on_snapshot`].
//!
//! - **Atomic transactions**: after readiness, runs of `TX_PENDING` messages are coalesced and
//!   delivered as a single [`OrderViewListener::on_update`] call, with deletions made explicit as
//!   sentinel events (zero time, NaN price, zero size).
//!
//! - **Broken snapshot recovery**: ambiguous mid-transaction messages mark a per-source snapshot
//!   broken instead of failing; a zero-flag message or a fresh snapshot end heals it.
//!
//! - **Explicit transition tables**: the branching on flags is expressed as two exhaustive
//!   matches ([`view::state::classify`] and [`view::state::settle`]) that are tested on their own.
//!
//! - **Thread-safe consumer copy**: [`ConsolidatedBook`] is a ready-made listener that mirrors
//!   every view in a concurrent map, readable from any thread.
//!
//! ## Architecture
//!
//! | Component | Type | Role |
//! |-----------|------|------|
//! | Event buffer | [`EventBuffer`] | Ordered upsert/remove by index |
//! | Snapshot registry | [`SnapshotRegistry`] | Snapshot key to per-source buffer and consistency flag |
//! | Source readiness | [`SourceReadiness`] | Which sources completed a snapshot, per symbol |
//! | State machine | [`OrderViewEngine`] | `Update` / `Ready` / `Ready+Pending` transitions |
//! | Listener | [`OrderViewListener`] | `on_snapshot` once, `on_update` afterwards |
//! | Subscription | [`OrderViewSubscription`] | Sources, symbols, feed handles, entry point |
//!
//! Delivery is single-threaded and push-based: the feed handler calls
//! [`OrderViewSubscription::process`] synchronously, one buffer at a time, so the engine keeps
//! its maps without locks. Nothing in the engine blocks.
//!
//! ## Example
//!
//! ```rust
//! use orderview_rs::{
//!     ConsolidatedBook, EventFlags, EventType, FeedMessage, NullFeed, OrderEvent,
//!     OrderViewSubscription,
//! };
//! use pricelevel::Side;
//! use std::sync::Arc;
//!
//! let book = Arc::new(ConsolidatedBook::new());
//! let mut subscription =
//!     OrderViewSubscription::new(NullFeed, EventType::Order, book.clone()).unwrap();
//! subscription.set_sources(["NTV", "DEX"]).unwrap();
//! subscription.add_symbol("AAPL").unwrap();
//!
//! let full = EventFlags::SNAPSHOT_BEGIN | EventFlags::SNAPSHOT_END;
//! subscription.process(FeedMessage::new(1, "AAPL", "NTV", full, vec![
//!     OrderEvent::new(1, "NTV", Side::Buy, 100.0, 10.0),
//! ]));
//! assert_eq!(book.order_count("AAPL"), 0);
//!
//! subscription.process(FeedMessage::new(2, "AAPL", "DEX", full, vec![
//!     OrderEvent::new(2, "DEX", Side::Sell, 101.0, 5.0),
//! ]));
//! assert_eq!(book.order_count("AAPL"), 2);
//! assert_eq!(book.best_bid("AAPL"), Some(100.0));
//! ```
//!
//! ## Error Handling
//!
//! Configuration mistakes (symbols before sources, sources set twice, candle symbols on an order
//! channel) fail synchronously with [`OrderViewError`] and commit nothing. Feed handle creation
//! failures surface as [`OrderViewError::Feed`]. Protocol ambiguities are never errors: they are
//! logged through `tracing` and recovered from.
//!
//! ## Status
//! This project is currently in active development and is not yet suitable for production use.

pub mod book;
pub mod events;
pub mod subscription;
pub mod view;

mod utils;

pub use book::{BookSnapshot, ConsolidatedBook};
pub use events::{
    EventBatch, EventFlags, EventType, FeedMessage, OrderDetails, OrderEvent, Scope, SnapshotKey,
    Source, Symbol,
};
pub use subscription::{NullFeed, OrderViewSubscription, SnapshotFeed, SubscriptionConfig};
pub use utils::current_time_millis;
pub use view::{
    EventBuffer, FeedError, FnListener, Notification, OrderViewEngine, OrderViewError,
    OrderViewListener, OrderViewState, SnapshotRegistry, SnapshotState, SourceReadiness,
};
