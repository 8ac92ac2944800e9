//! Consumer-side copy of consolidated order views, readable from any thread.

mod consolidated;
mod snapshot;

pub use consolidated::ConsolidatedBook;
pub use snapshot::BookSnapshot;
