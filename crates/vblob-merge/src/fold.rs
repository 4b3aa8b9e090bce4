//! Writing an edit into an existing layer.
//!
//! Folding keeps diff chains shallow: successive edits of one logical
//! version collapse into a single flat layer instead of stacking
//! diff-of-diff.

use tracing::trace;
use vblob_types::Replacement;

use crate::set::ReplacementSet;

impl<T: Clone> ReplacementSet<T> {
    /// Apply `edit` after this layer and return the combined flat layer.
    ///
    /// `edit` is expressed in this layer's post-edit space, i.e. against the
    /// sequence this layer produces. Entries whose spans overlap or merely
    /// touch `[edit.offset, edit.offset + edit.length]` are collapsed with
    /// the edit into a single entry; entries to the right shift by
    /// `edit.delta()`.
    pub fn fold(&self, edit: Replacement<T>) -> ReplacementSet<T> {
        if edit.is_noop() {
            return self.clone();
        }

        let entries = self.as_slice();
        let lo = edit.offset;
        let hi = edit.consumed_end();
        let shift = edit.delta();

        // First entry ending at or after `lo`, one past the last entry
        // starting at or before `hi`.
        let first = entries.partition_point(|e| e.end() < lo);
        let past_last = entries.partition_point(|e| e.offset <= hi);

        let mut out = Vec::with_capacity(entries.len() + 1);
        out.extend_from_slice(&entries[..first]);

        if first == past_last {
            out.push(edit);
        } else {
            let head = &entries[first];
            let tail = &entries[past_last - 1];
            let start = lo.min(head.offset);
            let end = hi.max(tail.end());
            let affected_delta: isize = entries[first..past_last]
                .iter()
                .map(Replacement::delta)
                .sum();

            let mut payload = Vec::with_capacity(end - start + edit.payload.len());
            if head.offset < lo {
                payload.extend_from_slice(&head.payload[..lo - head.offset]);
            }
            payload.extend(edit.payload);
            if hi < tail.end() {
                payload.extend_from_slice(&tail.payload[hi - tail.offset..]);
            }

            let merged = Replacement {
                offset: start,
                length: ((end - start) as isize - affected_delta) as usize,
                payload,
            };
            trace!(
                collapsed = past_last - first,
                offset = merged.offset,
                length = merged.length,
                "folded edit into layer"
            );
            if !merged.is_noop() {
                out.push(merged);
            }
        }

        out.extend(entries[past_last..].iter().map(|e| Replacement {
            offset: (e.offset as isize + shift) as usize,
            length: e.length,
            payload: e.payload.clone(),
        }));

        ReplacementSet::from_sorted(out)
    }

    /// Fold every entry of `later`, a layer stacked on top of this one, into
    /// this layer.
    ///
    /// Entries are folded left to right: once every entry before `k` is
    /// folded, the sequence left of `later[k].offset` already matches
    /// `later`'s output, so its offset is valid against the partial result.
    pub fn compose(&self, later: &ReplacementSet<T>) -> ReplacementSet<T> {
        later
            .iter()
            .fold(self.clone(), |acc, edit| acc.fold(edit.clone()))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn apply(set: &ReplacementSet<u8>, parent: &[u8]) -> Vec<u8> {
        set.apply(parent).unwrap()
    }

    /// Reference splice of one edit into a full sequence.
    fn splice(base: &[u8], edit: &Replacement<u8>) -> Vec<u8> {
        let mut out = base[..edit.offset].to_vec();
        out.extend_from_slice(&edit.payload);
        out.extend_from_slice(&base[edit.consumed_end()..]);
        out
    }

    #[test]
    fn fold_into_empty_inserts() {
        let set = ReplacementSet::new().fold(Replacement::new(0, 5, b"HELLO".to_vec()));
        assert_eq!(set.len(), 1);
        assert_eq!(apply(&set, b"hello world"), b"HELLO world");
    }

    #[test]
    fn fold_inside_existing_span_rewrites_payload() {
        let set = ReplacementSet::single(Replacement::new(0, 5, b"HELLO".to_vec()))
            .fold(Replacement::new(0, 1, b"J".to_vec()));
        assert_eq!(set.as_slice(), &[Replacement::new(0, 5, b"JELLO".to_vec())]);
        assert_eq!(apply(&set, b"hello world"), b"JELLO world");
    }

    #[test]
    fn fold_extending_past_span_edges_grows_length() {
        // "abcdefgh" -> "aXYdefgh", then overwrite "Ydef" with "Z".
        let set = ReplacementSet::single(Replacement::new(1, 2, b"XY".to_vec()))
            .fold(Replacement::new(2, 4, b"Z".to_vec()));
        assert_eq!(set.as_slice(), &[Replacement::new(1, 5, b"XZ".to_vec())]);
        assert_eq!(apply(&set, b"abcdefgh"), b"aXZgh");
    }

    #[test]
    fn adjacent_edits_coalesce() {
        let set = ReplacementSet::single(Replacement::new(2, 1, b"C".to_vec()))
            .fold(Replacement::new(3, 1, b"D".to_vec()));
        assert_eq!(set.as_slice(), &[Replacement::new(2, 2, b"CD".to_vec())]);

        let before = ReplacementSet::single(Replacement::new(2, 1, b"C".to_vec()))
            .fold(Replacement::insertion(2, b"_".to_vec()));
        assert_eq!(before.as_slice(), &[Replacement::new(2, 1, b"_C".to_vec())]);
    }

    #[test]
    fn edit_spanning_several_entries_collapses_them() {
        let set = ReplacementSet::from_entries(vec![
            Replacement::new(1, 1, b"B".to_vec()),
            Replacement::deletion(3, 2),
            Replacement::new(5, 1, b"HH".to_vec()),
        ])
        .unwrap();
        let parent = b"abcdefghij";
        assert_eq!(apply(&set, parent), b"aBcfgHHij");

        let folded = set.fold(Replacement::new(1, 5, b"-".to_vec()));
        assert_eq!(folded.len(), 1);
        assert_eq!(folded.as_slice()[0].length, 7);
        assert_eq!(folded.as_slice()[0].payload, b"-H".to_vec());
        assert_eq!(apply(&folded, parent), b"a-Hij");
    }

    #[test]
    fn later_entries_shift_by_edit_delta() {
        let set = ReplacementSet::single(Replacement::new(6, 1, b"W".to_vec()))
            .fold(Replacement::insertion(0, b">>".to_vec()));
        assert_eq!(
            set.as_slice(),
            &[
                Replacement::insertion(0, b">>".to_vec()),
                Replacement::new(8, 1, b"W".to_vec()),
            ]
        );
        assert_eq!(apply(&set, b"hello world"), b">>hello World");
    }

    #[test]
    fn undoing_an_insertion_drops_the_entry() {
        let set = ReplacementSet::single(Replacement::insertion(3, b"xyz".to_vec()))
            .fold(Replacement::deletion(3, 3));
        assert!(set.is_empty());
    }

    #[test]
    fn noop_edit_leaves_set_unchanged() {
        let set = ReplacementSet::single(Replacement::new(0, 1, b"a".to_vec()));
        assert_eq!(set.fold(Replacement::new(9, 0, Vec::new())), set);
    }

    #[test]
    fn fold_works_for_chars() {
        let set = ReplacementSet::single(Replacement::new(0, 1, vec!['h']))
            .fold(Replacement::insertion(1, vec!['é']));
        let parent: Vec<char> = "hat".chars().collect();
        let out: String = set.apply(&parent).unwrap().into_iter().collect();
        assert_eq!(out, "héat");
    }

    #[test]
    fn compose_matches_sequential_application() {
        let base = b"the quick brown fox".to_vec();
        let first = ReplacementSet::from_entries(vec![
            Replacement::new(4, 5, b"slow".to_vec()),
            Replacement::deletion(14, 4),
        ])
        .unwrap();
        let mid = apply(&first, &base);
        assert_eq!(mid, b"the slow brown");
        let later = ReplacementSet::from_entries(vec![
            Replacement::insertion(0, b"** ".to_vec()),
            Replacement::new(12, 5, b"red".to_vec()),
        ])
        .unwrap();
        let expected = apply(&later, &mid);
        let composed = first.compose(&later);
        assert!(composed.is_well_formed());
        assert_eq!(apply(&composed, &base), expected);
    }

    fn arb_edit(len: usize) -> impl Strategy<Value = Replacement<u8>> {
        (0..=len).prop_flat_map(move |offset| {
            (
                Just(offset),
                0..=(len - offset),
                prop::collection::vec(any::<u8>(), 0..6),
            )
                .prop_map(|(offset, length, payload)| Replacement::new(offset, length, payload))
        })
    }

    fn arb_two_layers() -> impl Strategy<Value = (Vec<u8>, Replacement<u8>, Replacement<u8>)> {
        prop::collection::vec(any::<u8>(), 0..30)
            .prop_flat_map(|base| {
                let len = base.len();
                (Just(base), arb_edit(len))
            })
            .prop_flat_map(|(base, first)| {
                let mid_len = (base.len() as isize + first.delta()) as usize;
                (Just(base), Just(first), arb_edit(mid_len))
            })
    }

    fn arb_edits() -> impl Strategy<Value = (Vec<u8>, Vec<(f64, f64, Vec<u8>)>)> {
        (
            prop::collection::vec(any::<u8>(), 0..40),
            prop::collection::vec(
                (0.0..=1.0f64, 0.0..=1.0f64, prop::collection::vec(any::<u8>(), 0..6)),
                1..20,
            ),
        )
    }

    fn scaled_edit(len: usize, (pos, span, payload): &(f64, f64, Vec<u8>)) -> Replacement<u8> {
        let offset = ((pos * len as f64) as usize).min(len);
        let length = ((span * (len - offset) as f64) as usize).min(len - offset);
        Replacement::new(offset, length, payload.clone())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Folding changes representation only, never observable content.
        #[test]
        fn fold_is_transparent((base, edits) in arb_edits()) {
            let mut set = ReplacementSet::new();
            let mut expected = base.clone();
            for raw in &edits {
                let edit = scaled_edit(expected.len(), raw);
                expected = splice(&expected, &edit);
                set = set.fold(edit);
                prop_assert!(set.is_well_formed());
                prop_assert_eq!(apply(&set, &base), expected.clone());
            }
        }

        #[test]
        fn single_fold_matches_stacked_layers((base, first, second) in arb_two_layers()) {
            let layer = ReplacementSet::single(first);
            let mid = apply(&layer, &base);
            let stacked = apply(&ReplacementSet::single(second.clone()), &mid);
            let folded = layer.fold(second);
            prop_assert!(folded.is_well_formed());
            prop_assert_eq!(apply(&folded, &base), stacked);
        }
    }
}
