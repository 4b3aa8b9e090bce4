//! The [`ReplacementSet`] container and its read-side queries.

use std::ops::Range;

use vblob_types::Replacement;

use crate::error::{MergeError, MergeResult};

/// Sorted, disjoint, non-adjacent replacements forming one diff layer.
///
/// Alongside the entries the set caches each entry's start in parent
/// coordinates, so translating a post-edit index into the parent is a
/// binary search rather than a delta summation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplacementSet<T> {
    entries: Vec<Replacement<T>>,
    /// `bases[k]` is where `entries[k]` starts in parent coordinates.
    bases: Vec<usize>,
}

/// Where a post-edit index resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Located {
    /// Inside the payload of entry `entry`, at payload index `at`.
    Payload { entry: usize, at: usize },
    /// Untouched; read the parent at this index.
    Parent(usize),
}

/// A contiguous piece of a post-edit range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Elements `range` of the payload of entry `entry`.
    Payload { entry: usize, range: Range<usize> },
    /// Elements `range` of the parent, in parent coordinates.
    Parent(Range<usize>),
}

impl<T> Default for ReplacementSet<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            bases: Vec::new(),
        }
    }
}

impl<T: Clone> ReplacementSet<T> {
    /// An empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// A layer holding one edit. A no-op edit yields an empty layer.
    pub fn single(edit: Replacement<T>) -> Self {
        if edit.is_noop() {
            return Self::new();
        }
        Self::from_sorted(vec![edit])
    }

    /// Build a layer from entries, checking the ordering invariant.
    pub fn from_entries(entries: Vec<Replacement<T>>) -> MergeResult<Self> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.is_noop() {
                return Err(MergeError::NoopEntry { index });
            }
            if index > 0 && entries[index - 1].end() >= entry.offset {
                return Err(MergeError::Unordered { index });
            }
        }
        Ok(Self::from_sorted(entries))
    }

    /// Build a layer from edits whose offsets are *parent* coordinates.
    ///
    /// Edits must be in ascending parent order. Edits that touch are
    /// concatenated, no-op edits are skipped, and offsets are re-expressed
    /// in the layer's post-edit space.
    pub fn from_parent_edits(
        edits: impl IntoIterator<Item = Replacement<T>>,
    ) -> MergeResult<Self> {
        let mut merged: Vec<Replacement<T>> = Vec::new();
        for (index, edit) in edits.into_iter().enumerate() {
            if edit.is_noop() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.consumed_end() == edit.offset => {
                    last.length += edit.length;
                    last.payload.extend(edit.payload);
                }
                Some(last) if last.consumed_end() > edit.offset => {
                    return Err(MergeError::Unordered { index });
                }
                _ => merged.push(edit),
            }
        }

        let mut shift = 0isize;
        for entry in &mut merged {
            let delta = entry.delta();
            entry.offset = (entry.offset as isize + shift) as usize;
            shift += delta;
        }
        Ok(Self::from_sorted(merged))
    }

    /// Build a layer from entries already known to satisfy the invariant.
    pub(crate) fn from_sorted(entries: Vec<Replacement<T>>) -> Self {
        debug_assert!(Self::well_formed(&entries));
        let mut bases = Vec::with_capacity(entries.len());
        let mut shift = 0isize;
        for entry in &entries {
            bases.push((entry.offset as isize - shift) as usize);
            shift += entry.delta();
        }
        Self { entries, bases }
    }

    /// Materialize this layer over a full parent sequence.
    pub fn apply(&self, parent: &[T]) -> MergeResult<Vec<T>> {
        let required = self.parent_extent();
        if required > parent.len() {
            return Err(MergeError::ParentTooShort {
                required,
                actual: parent.len(),
            });
        }

        let size = (parent.len() as isize + self.total_delta()) as usize;
        let mut out = Vec::with_capacity(size);
        let mut cursor = 0;
        for (entry, &base) in self.entries.iter().zip(&self.bases) {
            out.extend_from_slice(&parent[cursor..base]);
            out.extend_from_slice(&entry.payload);
            cursor = base + entry.length;
        }
        out.extend_from_slice(&parent[cursor..]);
        Ok(out)
    }
}

impl<T> ReplacementSet<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Replacement<T>> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Replacement<T>] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<Replacement<T>> {
        self.entries
    }

    /// Start of each entry in parent coordinates.
    pub fn parent_starts(&self) -> &[usize] {
        &self.bases
    }

    /// Net size change of the whole layer.
    pub fn total_delta(&self) -> isize {
        self.entries.iter().map(Replacement::delta).sum()
    }

    /// Total payload elements carried by the layer.
    pub fn payload_len(&self) -> usize {
        self.entries.iter().map(|e| e.payload.len()).sum()
    }

    /// Smallest parent length this layer can be applied to.
    pub fn parent_extent(&self) -> usize {
        match (self.entries.last(), self.bases.last()) {
            (Some(entry), Some(base)) => base + entry.length,
            _ => 0,
        }
    }

    /// Check the ordering invariant.
    pub fn is_well_formed(&self) -> bool {
        Self::well_formed(&self.entries)
    }

    fn well_formed(entries: &[Replacement<T>]) -> bool {
        entries.iter().all(|e| !e.is_noop())
            && entries.windows(2).all(|w| w[0].end() < w[1].offset)
    }

    /// Index of the first entry whose span ends after `index`.
    fn first_ending_after(&self, index: usize) -> usize {
        self.entries.partition_point(|e| e.end() <= index)
    }

    /// Translate `index` into parent space given that `following` is the
    /// first entry ending after it and `index` is not inside that entry.
    fn parent_index(&self, following: usize, index: usize) -> usize {
        match following.checked_sub(1) {
            None => index,
            Some(prev) => {
                let entry = &self.entries[prev];
                self.bases[prev] + entry.length + (index - entry.end())
            }
        }
    }

    /// Resolve a post-edit index to a payload element or a parent index.
    pub fn locate(&self, index: usize) -> Located {
        let k = self.first_ending_after(index);
        match self.entries.get(k) {
            Some(entry) if entry.offset <= index => Located::Payload {
                entry: k,
                at: index - entry.offset,
            },
            _ => Located::Parent(self.parent_index(k, index)),
        }
    }

    /// Split a post-edit range into payload pieces and parent ranges, in order.
    pub fn segments(&self, range: Range<usize>) -> Vec<Segment> {
        let mut out = Vec::new();
        let mut pos = range.start;
        let mut k = self.first_ending_after(pos);
        while pos < range.end {
            // Zero-width deletions sitting at `pos` carry no content.
            while self.entries.get(k).is_some_and(|e| e.end() <= pos) {
                k += 1;
            }
            match self.entries.get(k) {
                Some(entry) if entry.offset <= pos => {
                    let stop = entry.end().min(range.end);
                    out.push(Segment::Payload {
                        entry: k,
                        range: pos - entry.offset..stop - entry.offset,
                    });
                    pos = stop;
                }
                next => {
                    let stop = next.map_or(range.end, |e| e.offset.min(range.end));
                    let start = self.parent_index(k, pos);
                    out.push(Segment::Parent(start..start + (stop - pos)));
                    pos = stop;
                }
            }
        }
        out
    }
}

impl<'a, T> IntoIterator for &'a ReplacementSet<T> {
    type Item = &'a Replacement<T>;
    type IntoIter = std::slice::Iter<'a, Replacement<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(entries: Vec<Replacement<u8>>) -> ReplacementSet<u8> {
        ReplacementSet::from_entries(entries).unwrap()
    }

    #[test]
    fn from_entries_rejects_adjacent_entries() {
        let err = ReplacementSet::from_entries(vec![
            Replacement::new(0, 1, b"ab".to_vec()),
            Replacement::new(2, 1, b"c".to_vec()),
        ])
        .unwrap_err();
        assert_eq!(err, MergeError::Unordered { index: 1 });
    }

    #[test]
    fn from_entries_rejects_noop() {
        let err =
            ReplacementSet::from_entries(vec![Replacement::<u8>::new(3, 0, vec![])]).unwrap_err();
        assert_eq!(err, MergeError::NoopEntry { index: 0 });
    }

    #[test]
    fn parent_starts_undo_earlier_deltas() {
        // "hello world" -> "HEY world!!"
        let s = set(vec![
            Replacement::new(0, 5, b"HEY".to_vec()),
            Replacement::insertion(9, b"!!".to_vec()),
        ]);
        assert_eq!(s.parent_starts(), &[0, 11]);
        assert_eq!(s.apply(b"hello world").unwrap(), b"HEY world!!");
        assert_eq!(s.total_delta(), 0);
    }

    #[test]
    fn locate_translates_gap_indices() {
        let s = set(vec![
            Replacement::new(1, 3, b"X".to_vec()),
            Replacement::deletion(4, 2),
        ]);
        assert_eq!(s.apply(b"abcdefghij").unwrap(), b"aXefij");
        assert_eq!(s.locate(0), Located::Parent(0));
        assert_eq!(s.locate(1), Located::Payload { entry: 0, at: 0 });
        assert_eq!(s.locate(2), Located::Parent(4));
        assert_eq!(s.locate(4), Located::Parent(8));
        assert_eq!(s.locate(5), Located::Parent(9));
    }

    #[test]
    fn segments_cover_range_in_order() {
        let s = set(vec![
            Replacement::new(1, 3, b"XY".to_vec()),
            Replacement::deletion(4, 2),
        ]);
        assert_eq!(
            s.segments(0..7),
            vec![
                Segment::Parent(0..1),
                Segment::Payload {
                    entry: 0,
                    range: 0..2
                },
                Segment::Parent(4..5),
                Segment::Parent(7..10),
            ]
        );
    }

    #[test]
    fn parent_edits_are_shifted_and_coalesced() {
        let s = ReplacementSet::from_parent_edits(vec![
            Replacement::new(1, 3, b"X".to_vec()),
            Replacement::new(4, 1, b"YY".to_vec()),
            Replacement::deletion(7, 2),
        ])
        .unwrap();
        assert_eq!(
            s.as_slice(),
            &[
                Replacement::new(1, 4, b"XYY".to_vec()),
                Replacement::deletion(6, 2),
            ]
        );
        assert_eq!(s.apply(b"abcdefghij").unwrap(), b"aXYYfgj");
    }

    #[test]
    fn parent_edits_must_ascend() {
        let err = ReplacementSet::from_parent_edits(vec![
            Replacement::new(4, 3, b"X".to_vec()),
            Replacement::new(5, 1, b"Y".to_vec()),
        ])
        .unwrap_err();
        assert_eq!(err, MergeError::Unordered { index: 1 });
    }

    #[test]
    fn apply_rejects_short_parent() {
        let s = set(vec![Replacement::new(2, 4, b"x".to_vec())]);
        assert_eq!(
            s.apply(b"abc").unwrap_err(),
            MergeError::ParentTooShort {
                required: 6,
                actual: 3
            }
        );
    }
}
