use std::ops::Range;

use vblob_merge::MergeError;

/// Errors from blob reads and edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobError {
    /// A single-byte read outside `[0, size)`.
    #[error("index {index} out of range for blob of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// A range read reaching past the end of the blob.
    #[error("range {range:?} out of range for blob of size {size}")]
    RangeOutOfRange { range: Range<usize>, size: usize },

    /// Arguments that can never describe a valid edit or merge.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Combining replacement layers failed.
    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),
}

impl BlobError {
    /// Returns `true` for overlapping edits rejected by a merge.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Merge(MergeError::Conflict { .. }))
    }
}

/// Result alias for blob operations.
pub type BlobResult<T> = Result<T, BlobError>;
