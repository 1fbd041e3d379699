//! Idempotent document-to-document merge: ingest another document's items
//! respecting causal order, then reconcile tombstones.

use crate::doc::Doc;
use crate::error::{CrdtError, Result};
use crate::item::Item;

impl Doc {
    /// Idempotently ingest `src`'s items into `self`, then propagate
    /// deletion flags.
    ///
    /// Phase 1 collects every `src` item this document hasn't seen yet.
    /// Phase 2 repeatedly drains that pending set, integrating whatever
    /// has become causally ready, until either it's empty or a full pass
    /// integrates nothing — which means `src` isn't causally closed with
    /// respect to `self` and is reported as [`CrdtError::MergeStalled`].
    /// Phase 3 walks both item sequences in lockstep and copies `deleted`
    /// flags onto this document's matching items; this never un-deletes.
    ///
    /// `src` is only read, never mutated.
    pub fn merge_into(&mut self, src: &Doc) -> Result<()> {
        let mut pending: Vec<Item> = src
            .items
            .iter()
            .filter(|item| !self.is_in_version(&item.id))
            .cloned()
            .collect();

        tracing::debug!(pending = pending.len(), "merge: collected pending items");

        while !pending.is_empty() {
            let mut merged_any = false;
            let mut still_pending = Vec::with_capacity(pending.len());

            for item in pending {
                if self.can_insert(&item) {
                    self.integrate(item)?;
                    merged_any = true;
                } else {
                    still_pending.push(item);
                }
            }

            if !merged_any {
                tracing::warn!(remaining = still_pending.len(), "merge stalled");
                return Err(CrdtError::MergeStalled {
                    remaining: still_pending.len(),
                });
            }

            pending = still_pending;
        }

        // Phase 3: reconcile deletes. After phase 2, every src item is
        // present in self.items in the same relative order, so a single
        // forward cursor suffices.
        let mut dest_index = 0;
        for src_item in &src.items {
            while self.items[dest_index].id != src_item.id {
                dest_index += 1;
            }
            if src_item.deleted {
                self.items[dest_index].deleted = true;
            }
            dest_index += 1;
        }

        return Ok(());
    }
}
