//! Property-based tests for the universal properties in spec.md §8:
//! convergence, idempotence, commutativity, and monotone tombstones across
//! randomly interleaved edits.

use proptest::prelude::*;
use weave::Doc;

/// A single local edit: either insert `text` at `pos`, or delete `len`
/// visible characters starting at `pos`. Positions are taken modulo the
/// document's current visible length so every generated op is always
/// resolvable (no PositionOutOfRange noise in the property itself).
#[derive(Clone, Debug)]
enum Edit {
    Insert { pos_seed: u32, ch: char },
    Delete { pos_seed: u32 },
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (any::<u32>(), "[a-z]").prop_map(|(pos_seed, s)| Edit::Insert {
            pos_seed,
            ch: s.chars().next().unwrap(),
        }),
        any::<u32>().prop_map(|pos_seed| Edit::Delete { pos_seed }),
    ]
}

/// The full internal ordering a replica settled on: each item's ID paired
/// with its tombstone flag, in document order. Two replicas that agree on
/// visible text but disagree here would still violate spec.md §8 property 1
/// ("`items` agree on ID order and `deleted` flags").
fn id_order(doc: &Doc) -> Vec<(weave::Id, bool)> {
    return doc
        .items()
        .iter()
        .map(|item| (item.id.clone(), item.deleted))
        .collect();
}

fn apply_edits(doc: &mut Doc, edits: &[Edit]) {
    for edit in edits {
        match edit {
            Edit::Insert { pos_seed, ch } => {
                let len = doc.string_content().chars().count() as u64;
                let pos = *pos_seed as u64 % (len + 1);
                doc.local_insert_text(&ch.to_string(), pos).unwrap();
            }
            Edit::Delete { pos_seed } => {
                let len = doc.string_content().chars().count() as u64;
                if len == 0 {
                    continue;
                }
                let pos = *pos_seed as u64 % len;
                doc.local_delete(pos, 1).unwrap();
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Convergence (property 1): two documents edited independently and
    /// then merged both ways agree on visible content.
    #[test]
    fn merging_both_ways_converges(
        edits_a in prop::collection::vec(edit_strategy(), 0..20),
        edits_b in prop::collection::vec(edit_strategy(), 0..20),
    ) {
        let mut a = Doc::new("agent-a");
        apply_edits(&mut a, &edits_a);
        let mut b = Doc::new("agent-b");
        apply_edits(&mut b, &edits_b);

        a.merge_into(&b).unwrap();
        b.merge_into(&a).unwrap();

        prop_assert_eq!(a.string_content(), b.string_content());
        prop_assert_eq!(id_order(&a), id_order(&b));
    }

    /// Idempotence (property 2): merging the same source twice is the
    /// same as merging it once.
    #[test]
    fn merge_twice_equals_merge_once(
        edits_a in prop::collection::vec(edit_strategy(), 0..20),
        edits_b in prop::collection::vec(edit_strategy(), 0..20),
    ) {
        let mut a = Doc::new("agent-a");
        apply_edits(&mut a, &edits_a);
        let mut b = Doc::new("agent-b");
        apply_edits(&mut b, &edits_b);

        let mut dest = Doc::new("dest");
        dest.merge_into(&a).unwrap();
        dest.merge_into(&b).unwrap();
        let once = dest.string_content();
        let once_len = dest.items().len();

        dest.merge_into(&a).unwrap();
        dest.merge_into(&b).unwrap();

        prop_assert_eq!(dest.string_content(), once);
        prop_assert_eq!(dest.items().len(), once_len);
    }

    /// Commutativity (property 3): for disjoint-agent documents, merge
    /// order doesn't matter.
    #[test]
    fn merge_order_is_commutative(
        edits_a in prop::collection::vec(edit_strategy(), 0..15),
        edits_b in prop::collection::vec(edit_strategy(), 0..15),
        edits_c in prop::collection::vec(edit_strategy(), 0..15),
    ) {
        let mut a = Doc::new("agent-a");
        apply_edits(&mut a, &edits_a);
        let mut b = Doc::new("agent-b");
        apply_edits(&mut b, &edits_b);
        let mut c = Doc::new("agent-c");
        apply_edits(&mut c, &edits_c);

        let mut dest1 = Doc::new("dest1");
        dest1.merge_into(&a).unwrap();
        dest1.merge_into(&b).unwrap();
        dest1.merge_into(&c).unwrap();

        let mut dest2 = Doc::new("dest2");
        dest2.merge_into(&c).unwrap();
        dest2.merge_into(&a).unwrap();
        dest2.merge_into(&b).unwrap();

        prop_assert_eq!(dest1.string_content(), dest2.string_content());
        prop_assert_eq!(id_order(&dest1), id_order(&dest2));
    }

    /// Monotone tombstones (property 4): once an item is deleted in a
    /// source document, merging never un-deletes it, across any number of
    /// merges.
    #[test]
    fn tombstones_never_revert(
        edits_a in prop::collection::vec(edit_strategy(), 1..20),
    ) {
        let mut a = Doc::new("agent-a");
        apply_edits(&mut a, &edits_a);

        let mut b = Doc::new("agent-b");
        b.merge_into(&a).unwrap();
        let deleted_ids: Vec<_> = b
            .items()
            .iter()
            .filter(|item| item.deleted)
            .map(|item| item.id.clone())
            .collect();

        // Merge again and from a third, freshly-synced replica; tombstoned
        // items must stay tombstoned.
        b.merge_into(&a).unwrap();
        let mut c = Doc::new("agent-c");
        c.merge_into(&a).unwrap();
        b.merge_into(&c).unwrap();

        for id in &deleted_ids {
            let item = b.items().iter().find(|item| &item.id == id).unwrap();
            prop_assert!(item.deleted);
        }
    }
}
