//! Document state: the ordered item sequence, the per-agent version vector,
//! and the local-editing operations built on top of them.

use rustc_hash::FxHashMap;

use crate::error::{CrdtError, Result};
use crate::id::{Id, OriginLeft, OriginRight};
use crate::item::Item;

/// A replica's view of the shared text.
///
/// `items` is a total ordering of every item this document has ever
/// observed, including tombstoned ones; `version[a]` is the highest `seq`
/// contiguously observed from agent `a` (absent agents read as zero).
#[derive(Clone, Debug)]
pub struct Doc {
    pub(crate) agent: Box<str>,
    pub(crate) items: Vec<Item>,
    pub(crate) version: FxHashMap<Box<str>, u64>,
}

impl Doc {
    /// Create a new, empty document authored locally by `agent`.
    pub fn new(agent: &str) -> Doc {
        return Doc {
            agent: agent.into(),
            items: Vec::new(),
            version: FxHashMap::default(),
        };
    }

    /// The agent this document authors new items as.
    pub fn agent(&self) -> &str {
        return &self.agent;
    }

    /// A read-only view of every item this document has observed, in
    /// document order, including tombstones.
    pub fn items(&self) -> &[Item] {
        return &self.items;
    }

    /// The highest `seq` observed from `agent`, or 0 if none.
    pub fn version_of(&self, agent: &str) -> u64 {
        return self.version.get(agent).copied().unwrap_or(0);
    }

    /// Concatenate the content of every non-deleted item, in sequence
    /// order.
    pub fn string_content(&self) -> String {
        return self
            .items
            .iter()
            .filter(|item| !item.deleted)
            .map(|item| item.content)
            .collect();
    }

    /// Allocate the next ID this document would author: `(agent,
    /// version[agent] + 1)`.
    pub(crate) fn next_id(&self) -> Id {
        return Id::new(&self.agent, self.version_of(&self.agent) + 1);
    }

    /// Translate a user-facing position (counting only non-deleted items)
    /// into an internal `items` index.
    ///
    /// `for_insert = true` means "insertion point at pos": the walk returns
    /// the current index the instant the remaining count hits zero, even if
    /// that lands on a tombstone — insertion anchors against the first
    /// visible boundary reached rather than skipping past trailing
    /// tombstones. `for_insert = false` means "the visible item at pos":
    /// tombstones are skipped without decrementing the count.
    pub(crate) fn find_visible_index(&self, pos: u64, for_insert: bool) -> Result<usize> {
        let mut remaining = pos;
        let mut i = 0;
        while i < self.items.len() {
            if for_insert && remaining == 0 {
                return Ok(i);
            } else if self.items[i].deleted {
                i += 1;
                continue;
            } else if remaining == 0 {
                return Ok(i);
            }
            remaining -= 1;
            i += 1;
        }
        if remaining == 0 {
            return Ok(i);
        }
        return Err(CrdtError::PositionOutOfRange { pos });
    }

    /// Insert `text` at visible position `pos`.
    ///
    /// Each Unicode scalar value in `text` becomes its own item, with a
    /// freshly allocated ID and origins captured from the current state at
    /// its insertion point. Fails with `PositionOutOfRange` if any
    /// character's position resolution fails; earlier characters in the
    /// same call remain inserted (local edits are not transactional across
    /// characters, matching `local_delete`'s contract).
    pub fn local_insert_text(&mut self, text: &str, pos: u64) -> Result<()> {
        for (i, ch) in text.chars().enumerate() {
            let index = self.find_visible_index(pos + i as u64, true)?;

            let origin_left = if index > 0 {
                OriginLeft::Ref(self.items[index - 1].id.clone())
            } else {
                OriginLeft::DocBeginning
            };
            let origin_right = if index < self.items.len() {
                OriginRight::Ref(self.items[index].id.clone())
            } else {
                OriginRight::DocEnding
            };

            let item = Item::new(self.next_id(), ch, origin_left, origin_right);
            self.integrate(item)?;
        }
        return Ok(());
    }

    /// Tombstone `n` visible characters starting at `pos`.
    ///
    /// `pos` is re-resolved on every iteration rather than advanced,
    /// because tombstoning the current character slides the next visible
    /// character into the same position. Non-transactional: if resolution
    /// fails partway through, already-applied tombstones remain.
    pub fn local_delete(&mut self, pos: u64, n: u64) -> Result<()> {
        for _ in 0..n {
            let index = self.find_visible_index(pos, false)?;
            self.items[index].deleted = true;
        }
        return Ok(());
    }
}
