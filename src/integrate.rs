//! Integration: placing a new item among existing items using the
//! origin-based interleaving rule. This is the heart of the engine — see
//! spec.md §4.4 for the prose derivation of the placement rule below.

use crate::doc::Doc;
use crate::error::{CrdtError, Result};
use crate::id::{Id, OriginLeft, OriginRight};
use crate::item::Item;

impl Doc {
    /// Is `id` already reflected in this document's version vector?
    pub fn is_in_version(&self, id: &Id) -> bool {
        return self.version_of(&id.agent) >= id.seq;
    }

    /// Can `item` be integrated right now? True iff it is not already
    /// present, its same-agent predecessor (if any) is present, and both
    /// origin anchors are present.
    pub fn can_insert(&self, item: &Item) -> bool {
        let left_ok = match &item.origin_left {
            OriginLeft::DocBeginning => true,
            OriginLeft::Ref(id) => self.is_in_version(id),
        };
        let right_ok = match &item.origin_right {
            OriginRight::DocEnding => true,
            OriginRight::Ref(id) => self.is_in_version(id),
        };
        let causal_prior_present = item.id.seq == 1
            || self.is_in_version(&Id::new(&item.id.agent, item.id.seq - 1));

        return !self.is_in_version(&item.id) && causal_prior_present && left_ok && right_ok;
    }

    /// Resolve an origin to an `items` index, with `DocBeginning` at `-1`
    /// and `DocEnding` at `items.len()` as sentinels either side of the
    /// real range.
    fn origin_left_index(&self, origin: &OriginLeft) -> isize {
        return match origin {
            OriginLeft::DocBeginning => -1,
            OriginLeft::Ref(id) => self.find_index_by_id(id) as isize,
        };
    }

    fn origin_right_index(&self, origin: &OriginRight) -> isize {
        return match origin {
            OriginRight::DocEnding => self.items.len() as isize,
            OriginRight::Ref(id) => self.find_index_by_id(id) as isize,
        };
    }

    /// Linear scan for an item by ID. Acceptable for the reference
    /// implementation per spec.md §9; a large-document replica would pair
    /// this with an auxiliary ID→position index instead.
    fn find_index_by_id(&self, id: &Id) -> usize {
        return self
            .items
            .iter()
            .position(|existing| &existing.id == id)
            .expect("origin id not present in document: causal readiness was violated");
    }

    /// Integrate a remote item: an item whose `id`, `content`, and origins
    /// are already set, arriving directly (bypassing local authoring).
    ///
    /// Calling this with an item that is not causally ready (see
    /// [`Doc::can_insert`]) is a logic error at the engine boundary and
    /// returns [`CrdtError::OutOfOrder`] rather than corrupting the version
    /// vector; callers that cannot guarantee readiness should go through
    /// [`Doc::merge_into`] instead, which only calls this once
    /// `can_insert` holds.
    pub fn remote_insert(&mut self, item: Item) -> Result<()> {
        return self.integrate(item);
    }

    pub(crate) fn integrate(&mut self, item: Item) -> Result<()> {
        let expected = self.version_of(&item.id.agent) + 1;
        if item.id.seq != expected {
            return Err(CrdtError::OutOfOrder {
                agent: item.id.agent.clone(),
                expected,
                got: item.id.seq,
            });
        }

        tracing::trace!(agent = %item.id.agent, seq = item.id.seq, "integrating item");
        self.version.insert(item.id.agent.clone(), item.id.seq);

        let new_left = self.origin_left_index(&item.origin_left);
        let new_right = self.origin_right_index(&item.origin_right);

        let mut i = new_left + 1;
        let mut dest_index = i;
        let mut scanning = false;

        while i <= new_right {
            if !scanning {
                dest_index = i;
            }
            if i == new_right || i == self.items.len() as isize {
                break;
            }

            let existing = &self.items[i as usize];
            let e_left = self.origin_left_index(&existing.origin_left);
            let e_right = self.origin_right_index(&existing.origin_right);

            if e_left < new_left {
                // The existing item's left anchor precedes ours: we've
                // found our spot.
                break;
            } else if e_left == new_left {
                if e_right < new_right {
                    // Might insert after this one, but can't tell yet.
                    scanning = true;
                    tracing::trace!(i, "scanning: existing right anchor precedes ours");
                } else if e_right == new_right {
                    // Direct conflict: tie-break on agent string.
                    if item.id.agent < existing.id.agent {
                        break;
                    } else {
                        scanning = false;
                    }
                } else {
                    // existing's right anchor reaches past ours.
                    scanning = false;
                }
            }
            // e_left > new_left: existing belongs after us; keep looking
            // without touching `scanning`.

            i += 1;
        }

        self.items.insert(dest_index as usize, item);
        return Ok(());
    }
}
