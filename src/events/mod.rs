//! Feed-side vocabulary: flags, identifiers, indexed order events and the
//! buffers exchanged with the feed handler and the listener.

mod flags;
mod message;
mod order;
mod symbol;

pub use flags::EventFlags;
pub use message::{EventBatch, EventType, FeedMessage, SnapshotKey};
pub use order::{OrderDetails, OrderEvent, Scope};
pub use symbol::{Source, Symbol};
