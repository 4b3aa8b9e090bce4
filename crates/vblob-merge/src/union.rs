//! Combining two layers produced independently against one parent.

use std::ops::Range;

use tracing::debug;
use vblob_types::Replacement;

use crate::error::{MergeError, MergeResult};
use crate::set::ReplacementSet;

/// An entry re-expressed against the shared parent.
struct ParentEdit<'a, T> {
    start: usize,
    length: usize,
    payload: &'a [T],
}

impl<T> ParentEdit<'_, T> {
    fn end(&self) -> usize {
        self.start + self.length
    }

    fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Overlapping consumed ranges, or two insertions at the same point
    /// whose relative order would be ambiguous.
    fn conflicts_with(&self, other: &ParentEdit<'_, T>) -> bool {
        let overlap = self.start < other.end() && other.start < self.end();
        let same_point = self.length == 0 && other.length == 0 && self.start == other.start;
        overlap || same_point
    }
}

fn parent_edits<T>(set: &ReplacementSet<T>) -> impl Iterator<Item = ParentEdit<'_, T>> {
    set.iter()
        .zip(set.parent_starts())
        .map(|(entry, &start)| ParentEdit {
            start,
            length: entry.length,
            payload: &entry.payload,
        })
}

impl<T: Clone> ReplacementSet<T> {
    /// Merge two layers that were built against the same parent.
    ///
    /// Both layers are walked in parent coordinates with one cursor each;
    /// the entry ending first is emitted, exactly adjacent entries are
    /// concatenated, and any overlap is a [`MergeError::Conflict`]. There is
    /// no automatic conflict resolution.
    pub fn union(&self, other: &ReplacementSet<T>) -> MergeResult<ReplacementSet<T>> {
        let mut left = parent_edits(self).peekable();
        let mut right = parent_edits(other).peekable();
        let mut ordered = Vec::with_capacity(self.len() + other.len());

        loop {
            let next = match (left.peek(), right.peek()) {
                (None, None) => break,
                (Some(_), None) => left.next(),
                (None, Some(_)) => right.next(),
                (Some(l), Some(r)) => {
                    if l.conflicts_with(r) {
                        return Err(MergeError::Conflict {
                            left: l.range(),
                            right: r.range(),
                        });
                    }
                    if (l.end(), l.start) <= (r.end(), r.start) {
                        left.next()
                    } else {
                        right.next()
                    }
                }
            };
            let Some(edit) = next else { break };
            ordered.push(Replacement::new(edit.start, edit.length, edit.payload.to_vec()));
        }

        // Adjacent frontier entries are concatenated here.
        let input = ordered.len();
        let merged = ReplacementSet::from_parent_edits(ordered)?;
        debug!(
            left = self.len(),
            right = other.len(),
            merged = merged.len(),
            joined = input - merged.len(),
            "unioned independent layers"
        );
        Ok(merged)
    }
}
