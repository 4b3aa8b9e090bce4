//! Byte-snapshot diffing into [`Blob`] layers.

use tracing::debug;
use vblob_store::Blob;

use crate::config::DifferConfig;
use crate::error::{DiffError, DiffResult};
use crate::lcs::Alignment;

/// Derives a diff blob between two full byte snapshots.
#[derive(Clone, Debug, Default)]
pub struct SnapshotDiffer {
    config: DifferConfig,
}

impl SnapshotDiffer {
    pub fn new(config: DifferConfig) -> Self {
        Self { config }
    }

    /// A diff over `Root(before)` that reads back as `after`.
    pub fn diff(&self, before: &[u8], after: &[u8]) -> DiffResult<Blob> {
        self.diff_against(&Blob::root(before.to_vec()), after)
    }

    /// A diff whose parent is the existing `parent` blob and that reads
    /// back as `after`.
    ///
    /// The result's parent is `parent` itself, so a diff against a ledger's
    /// latest version can be appended directly.
    pub fn diff_against(&self, parent: &Blob, after: &[u8]) -> DiffResult<Blob> {
        let before = parent.read_all();
        let alignment = Alignment::new(&before, after);
        let cells = alignment.cells();
        if cells > self.config.max_cells {
            return Err(DiffError::InputTooLarge {
                cells,
                limit: self.config.max_cells,
            });
        }

        let replacements = alignment.replacements()?;
        debug!(
            before = before.len(),
            after = after.len(),
            prefix = alignment.prefix(),
            cells,
            entries = replacements.len(),
            "diffed snapshots"
        );
        Ok(Blob::from_parts(parent.clone(), replacements)?)
    }
}

/// Diff two snapshots with no bound on the alignment table.
pub fn diff_of(before: &[u8], after: &[u8]) -> DiffResult<Blob> {
    SnapshotDiffer::new(DifferConfig::unbounded()).diff(before, after)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use vblob_types::Replacement;

    use super::*;

    #[test]
    fn unrelated_snapshots_become_one_replacement() {
        let diff = diff_of(b"abcde", b"12").unwrap();
        assert_eq!(diff.read_all(), b"12");
        assert_eq!(diff.size(), 2);
        assert_eq!(diff.parent().unwrap().read_all(), b"abcde");
        assert_eq!(
            diff.replacements().unwrap().as_slice(),
            &[Replacement::new(0, 5, b"12".to_vec())]
        );
    }

    #[test]
    fn diff_against_keeps_the_parent_handle() {
        let parent = Blob::root(b"the quick brown fox".to_vec())
            .replace(4, 5, b"slow".to_vec())
            .unwrap();
        let diff = SnapshotDiffer::default()
            .diff_against(&parent, b"the slow red fox")
            .unwrap();
        assert!(Blob::ptr_eq(diff.parent().unwrap(), &parent));
        assert_eq!(diff.read_all(), b"the slow red fox");
    }

    #[test]
    fn oversized_tables_are_rejected() {
        let differ = SnapshotDiffer::new(DifferConfig { max_cells: 10 });
        let err = differ.diff(b"abcdef", b"uvwxyz").unwrap_err();
        assert_eq!(
            err,
            DiffError::InputTooLarge {
                cells: 49,
                limit: 10
            }
        );
        // Trimming keeps a long but nearly identical pair under the bound.
        let long = vec![b'a'; 1_000];
        let mut edited = long.clone();
        edited[500] = b'b';
        assert_eq!(differ.diff(&long, &edited).unwrap().read_all(), edited);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn snapshot_diff_replays(
            before in prop::collection::vec(any::<u8>(), 0..48),
            after in prop::collection::vec(any::<u8>(), 0..48),
        ) {
            let diff = diff_of(&before, &after).unwrap();
            prop_assert_eq!(diff.size(), after.len());
            prop_assert_eq!(diff.read_all(), after);
        }
    }
}
