//! Subscription surface of an order view: source/symbol configuration, the
//! feed-handler boundary, and the entry point for inbound messages.

mod config;
mod feed;
mod order_view;
mod tests;

pub use config::SubscriptionConfig;
pub use feed::{NullFeed, SnapshotFeed};
pub use order_view::OrderViewSubscription;
