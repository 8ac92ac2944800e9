//! Transactional event flags attached to every feed message

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Bitset of transactional flags carried by a feed message.
    ///
    /// Bit values match the feed's wire encoding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct EventFlags: u32 {
        /// More messages belong to the current logical transaction.
        const TX_PENDING = 0x01;
        /// The events of this message are deleted from the snapshot.
        const REMOVE_EVENT = 0x02;
        /// First message of a (per-source) snapshot.
        const SNAPSHOT_BEGIN = 0x04;
        /// Last message of a (per-source) snapshot.
        const SNAPSHOT_END = 0x08;
        /// Snapshot ended early because it was truncated upstream.
        const SNAPSHOT_SNIP = 0x10;
        /// The symbol was removed from the feed.
        const REMOVE_SYMBOL = 0x20;
    }
}

impl EventFlags {
    /// Returns true when the message opens a snapshot.
    pub fn is_snapshot_begin(self) -> bool {
        self.contains(Self::SNAPSHOT_BEGIN)
    }

    /// Returns true when the message closes a snapshot, either regularly or by truncation.
    pub fn is_snapshot_end(self) -> bool {
        self.intersects(Self::SNAPSHOT_END.union(Self::SNAPSHOT_SNIP))
    }

    /// Returns true when further messages belong to the same transaction.
    pub fn is_tx_pending(self) -> bool {
        self.contains(Self::TX_PENDING)
    }

    /// Returns true when the message deletes its events.
    pub fn is_remove_event(self) -> bool {
        self.contains(Self::REMOVE_EVENT)
    }

    /// Returns true when the message announces removal of the whole symbol.
    pub fn is_remove_symbol(self) -> bool {
        self.contains(Self::REMOVE_SYMBOL)
    }

    /// A transaction is open when `TX_PENDING` was seen without a terminating end marker.
    pub fn is_transaction_open(self) -> bool {
        self.is_tx_pending() && !self.is_snapshot_end()
    }
}
