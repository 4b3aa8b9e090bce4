//! Error types for the replacement-set algebra.

use std::ops::Range;

/// Errors produced while building or combining replacement sets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// Two independent edits touch overlapping parent ranges.
    #[error("conflicting replacements over parent ranges {left:?} and {right:?}")]
    Conflict {
        /// Parent-space range consumed by the left-hand entry.
        left: Range<usize>,
        /// Parent-space range consumed by the right-hand entry.
        right: Range<usize>,
    },

    /// Entries supplied to a checked constructor break the ordering invariant.
    #[error("replacement {index} overlaps, touches, or precedes its predecessor")]
    Unordered { index: usize },

    /// Entry supplied to a checked constructor changes nothing.
    #[error("replacement {index} is a no-op")]
    NoopEntry { index: usize },

    /// The parent sequence is shorter than the ranges the set consumes.
    #[error("set consumes parent elements up to {required}, parent has {actual}")]
    ParentTooShort { required: usize, actual: usize },
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;
