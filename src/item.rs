//! The unit of replication: one Unicode scalar value plus its identity,
//! origins, and tombstone flag.

use crate::id::{Id, OriginLeft, OriginRight};

/// A single character in the document, with enough context to reconstruct
/// its position relative to concurrent inserts.
///
/// Once inserted, an item lives in [`crate::Doc::items`] forever. Only
/// `deleted` ever changes, and only from `false` to `true`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: Id,
    pub content: char,
    pub origin_left: OriginLeft,
    pub origin_right: OriginRight,
    pub deleted: bool,
}

impl Item {
    /// Construct a fresh, non-deleted item.
    pub fn new(id: Id, content: char, origin_left: OriginLeft, origin_right: OriginRight) -> Item {
        return Item {
            id,
            content,
            origin_left,
            origin_right,
            deleted: false,
        };
    }
}
