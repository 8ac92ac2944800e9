//! Order view states and the transition tables driving the engine

use super::registry::SnapshotState;
use crate::events::EventFlags;
use bitflags::bitflags;

bitflags! {
    /// Per-symbol state of an order view.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct OrderViewState: u8 {
        /// Initial accumulation of per-source snapshots is in progress.
        const UPDATE = 0x01;
        /// The consolidated snapshot has been delivered.
        const READY = 0x02;
        /// Inside a multi-message transaction after readiness.
        const PENDING = 0x04;
    }
}

impl OrderViewState {
    pub fn is_ready(self) -> bool {
        self.contains(Self::READY)
    }

    pub fn is_pending(self) -> bool {
        self.contains(Self::PENDING)
    }
}

/// What the engine knows about an inbound message before acting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inbound {
    pub flags: EventFlags,
    /// The snapshot key is already registered
    pub known_key: bool,
    /// The symbol has delivered its consolidated snapshot
    pub ready: bool,
    /// The symbol is inside a post-readiness transaction
    pub pending: bool,
    /// A repeated begin carries the single opposite-side twin of the single
    /// buffered event
    pub duplicate_pair: bool,
}

/// How the engine handles one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `REMOVE_SYMBOL`: forget all snapshot state of the symbol
    DropSymbol,
    /// First message of a new snapshot key
    StartSnapshot,
    /// Begin repeated on a known key: clear and start over
    RestartSnapshot,
    /// Begin repeated with the other half of a buy/sell pair: keep both
    RetainDuplicate,
    /// Post-readiness update outside any transaction: deliver as is
    ForwardUpdate,
    /// Post-readiness transaction message: coalesce until it ends
    AccumulateTransaction,
    /// Known key still building its per-source snapshot
    Accumulate,
    /// Nothing to attach the message to
    Ignore,
}

/// Classify an inbound message. Arms are ordered by priority.
pub fn classify(inbound: &Inbound) -> Transition {
    let flags = inbound.flags;
    let transaction = flags.is_tx_pending() || inbound.pending;
    match (
        flags.is_remove_symbol(),
        inbound.known_key,
        flags.is_snapshot_begin(),
        flags.is_snapshot_end(),
        inbound.ready,
        transaction,
    ) {
        (true, ..) => Transition::DropSymbol,
        (false, false, true, ..) => Transition::StartSnapshot,
        (false, false, false, true, ..) => Transition::StartSnapshot,
        (false, false, false, false, ..) => Transition::Ignore,
        (false, true, true, ..) if inbound.duplicate_pair => Transition::RetainDuplicate,
        (false, true, true, ..) => Transition::RestartSnapshot,
        (false, true, false, false, true, true) => Transition::AccumulateTransaction,
        (false, true, false, false, true, false) => Transition::ForwardUpdate,
        (false, true, false, _, _, _) => Transition::Accumulate,
    }
}

/// What remains to do once a message was applied to a per-source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Zero flags on a broken buffer: it is consistent again, complete it
    Heal,
    /// Already consistent mid-accumulation
    Idle,
    /// Transaction continues; keep merging
    HoldTransaction,
    /// Snapshot end without a pending transaction
    Complete,
    /// Ambiguous message: mark the buffer broken
    Break,
}

/// Decide the follow-up for applied `flags` given the buffer's `state`.
///
/// `SNAPSHOT_BEGIN` is ignored here; it was already acted upon by [`classify`].
pub fn settle(flags: EventFlags, state: SnapshotState) -> Settlement {
    let flags = flags.difference(EventFlags::SNAPSHOT_BEGIN);
    match (
        flags.is_empty(),
        state,
        flags.is_tx_pending(),
        flags.is_remove_event(),
        flags.is_snapshot_end(),
    ) {
        (true, SnapshotState::Broken, ..) => Settlement::Heal,
        (true, SnapshotState::Unbroken, ..) => Settlement::Idle,
        (false, _, true, false, _) => Settlement::HoldTransaction,
        (false, _, false, _, true) => Settlement::Complete,
        _ => Settlement::Break,
    }
}
