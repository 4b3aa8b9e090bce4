//! Longest-common-subsequence alignment, generic over the element type.

use vblob_merge::{MergeResult, ReplacementSet};
use vblob_types::Replacement;

/// Two sequences with their common prefix and suffix split off.
///
/// Only the differing middles take part in the quadratic alignment.
#[derive(Clone, Copy, Debug)]
pub struct Alignment<'a, T> {
    prefix: usize,
    before: &'a [T],
    after: &'a [T],
}

impl<'a, T: PartialEq + Clone> Alignment<'a, T> {
    pub fn new(before: &'a [T], after: &'a [T]) -> Self {
        let prefix = before
            .iter()
            .zip(after)
            .take_while(|(a, b)| a == b)
            .count();
        let (before, after) = (&before[prefix..], &after[prefix..]);
        let suffix = before
            .iter()
            .rev()
            .zip(after.iter().rev())
            .take_while(|(a, b)| a == b)
            .count();
        Self {
            prefix,
            before: &before[..before.len() - suffix],
            after: &after[..after.len() - suffix],
        }
    }

    /// Length of the shared prefix.
    pub fn prefix(&self) -> usize {
        self.prefix
    }

    /// Cells in the table [`Alignment::replacements`] will build;
    /// saturates instead of overflowing.
    pub fn cells(&self) -> usize {
        (self.before.len() + 1).saturating_mul(self.after.len() + 1)
    }

    /// Edits in parent coordinates, ascending, one per maximal mismatch run.
    pub fn parent_edits(&self) -> Vec<Replacement<T>> {
        let (before, after) = (self.before, self.after);
        let (n, m) = (before.len(), after.len());
        if n == 0 && m == 0 {
            return Vec::new();
        }

        // table[i * width + j] is the LCS length of before[i..] and after[j..].
        let width = m + 1;
        let mut table = vec![0usize; (n + 1) * width];
        for i in (0..n).rev() {
            for j in (0..m).rev() {
                table[i * width + j] = if before[i] == after[j] {
                    table[(i + 1) * width + j + 1] + 1
                } else {
                    table[(i + 1) * width + j].max(table[i * width + j + 1])
                };
            }
        }

        let mut edits = Vec::new();
        let mut run: Option<Replacement<T>> = None;
        let (mut i, mut j) = (0, 0);
        while i < n || j < m {
            if i < n && j < m && before[i] == after[j] {
                edits.extend(run.take());
                i += 1;
                j += 1;
            } else if j < m && (i == n || table[i * width + j + 1] >= table[(i + 1) * width + j])
            {
                run.get_or_insert_with(|| Replacement::insertion(self.prefix + i, Vec::new()))
                    .payload
                    .push(after[j].clone());
                j += 1;
            } else {
                run.get_or_insert_with(|| Replacement::insertion(self.prefix + i, Vec::new()))
                    .length += 1;
                i += 1;
            }
        }
        edits.extend(run);
        edits
    }

    /// The alignment as one replacement layer over `before`.
    pub fn replacements(&self) -> MergeResult<ReplacementSet<T>> {
        ReplacementSet::from_parent_edits(self.parent_edits())
    }
}

/// Replacement layer turning `before` into `after`, with no bound on the
/// table size.
pub fn lcs_replacements<T: PartialEq + Clone>(
    before: &[T],
    after: &[T],
) -> MergeResult<ReplacementSet<T>> {
    Alignment::new(before, after).replacements()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use similar::{capture_diff_slices, Algorithm, DiffOp};

    use super::*;

    fn matched(before: &[u8], set: &ReplacementSet<u8>) -> usize {
        before.len() - set.iter().map(|e| e.length).sum::<usize>()
    }

    fn oracle_lcs(before: &[u8], after: &[u8]) -> usize {
        capture_diff_slices(Algorithm::Lcs, before, after)
            .iter()
            .map(|op| match op {
                DiffOp::Equal { len, .. } => *len,
                _ => 0,
            })
            .sum()
    }

    #[test]
    fn disjoint_inputs_become_one_replacement() {
        let set = lcs_replacements(b"abcde", b"12").unwrap();
        assert_eq!(set.as_slice(), &[Replacement::new(0, 5, b"12".to_vec())]);
        assert_eq!(set.apply(b"abcde").unwrap(), b"12");
    }

    #[test]
    fn identical_inputs_need_no_edits() {
        let set = lcs_replacements(b"same", b"same").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn prefix_and_suffix_are_trimmed() {
        let alignment = Alignment::new(b"hello world".as_slice(), b"hello there world".as_slice());
        assert_eq!(alignment.prefix(), 6);
        assert_eq!(alignment.cells(), 7);
        let set = alignment.replacements().unwrap();
        assert_eq!(set.apply(b"hello world").unwrap(), b"hello there world");
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].length, 0);
    }

    #[test]
    fn matched_runs_split_replacements() {
        let before = b"kitten sitting";
        let after = b"sitting kitten";
        let set = lcs_replacements(before, after).unwrap();
        assert!(set.is_well_formed());
        assert_eq!(set.apply(before).unwrap(), after);
        assert_eq!(matched(before, &set), oracle_lcs(before, after));
    }

    #[test]
    fn works_over_chars() {
        let before: Vec<char> = "naïve café".chars().collect();
        let after: Vec<char> = "native cafés".chars().collect();
        let set = lcs_replacements(&before, &after).unwrap();
        assert_eq!(set.apply(&before).unwrap(), after);
    }

    #[test]
    fn empty_sides() {
        let grow = lcs_replacements(b"", b"abc").unwrap();
        assert_eq!(grow.as_slice(), &[Replacement::insertion(0, b"abc".to_vec())]);
        let shrink = lcs_replacements(b"abc", b"").unwrap();
        assert_eq!(shrink.as_slice(), &[Replacement::deletion(0, 3)]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Applying the derived layer reproduces `after` exactly.
        #[test]
        fn lcs_replay(
            before in prop::collection::vec(0u8..4, 0..40),
            after in prop::collection::vec(0u8..4, 0..40),
        ) {
            let set = lcs_replacements(&before, &after).unwrap();
            prop_assert!(set.is_well_formed());
            prop_assert_eq!(set.apply(&before).unwrap(), after);
        }

        /// The alignment keeps a longest common subsequence.
        #[test]
        fn lcs_is_longest(
            before in prop::collection::vec(0u8..3, 0..30),
            after in prop::collection::vec(0u8..3, 0..30),
        ) {
            let set = lcs_replacements(&before, &after).unwrap();
            prop_assert_eq!(matched(&before, &set), oracle_lcs(&before, &after));
        }
    }
}
