//! Error types for the CRDT engine.

use thiserror::Error;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, CrdtError>;

/// Errors the engine can return.
///
/// `PositionOutOfRange` is the only variant a normal caller should expect to
/// see in practice: it means a local insert or delete addressed a position
/// past the visible end of the document. The other two variants indicate
/// that a caller bypassed the causal-readiness contract (`canInsert`) before
/// calling [`crate::Doc::remote_insert`] or [`crate::Doc::merge_into`]; they
/// are programming errors at the engine boundary, not something a correctly
/// wired caller should ever observe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CrdtError {
    /// `pos` addressed a position past the visible end of the document.
    #[error("position {pos} is out of range")]
    PositionOutOfRange {
        /// The requested position.
        pos: u64,
    },

    /// An item arrived at [`crate::Doc::remote_insert`] whose `seq` is not
    /// exactly `version[agent] + 1`. Callers must route remote items
    /// through [`crate::Doc::merge_into`], which only ever calls integrate
    /// once `can_insert` holds.
    #[error("item ({agent}, {got}) is out of causal order: expected seq {expected}")]
    OutOfOrder {
        /// The item's agent.
        agent: Box<str>,
        /// The seq the engine expected next for this agent.
        expected: u64,
        /// The seq the item actually carried.
        got: u64,
    },

    /// A merge drain pass integrated zero items while items remained
    /// pending: the source document is not causally closed with respect to
    /// the destination.
    #[error("merge stalled with {remaining} item(s) still not insertable")]
    MergeStalled {
        /// How many pending items remained un-integrated.
        remaining: usize,
    },
}
