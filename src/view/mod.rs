//! Order view consolidation: per-source snapshot buffers, source readiness,
//! and the state machine that merges them into one view per symbol.

pub mod buffer;
pub mod engine;
mod error;
mod listener;
mod readiness;
mod registry;
pub mod state;

pub use buffer::EventBuffer;
pub use engine::OrderViewEngine;
pub use error::{FeedError, OrderViewError};
pub use listener::{FnListener, Notification, OrderViewListener};
pub use readiness::SourceReadiness;
pub use registry::{SnapshotEntry, SnapshotRegistry, SnapshotState};
pub use state::{OrderViewState, Settlement, Transition};
