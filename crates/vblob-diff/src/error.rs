//! Error types for the diff crate.

use vblob_merge::MergeError;
use vblob_store::BlobError;

/// Errors that can occur while diffing snapshots.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// The alignment table would exceed the configured bound.
    #[error("diff needs {cells} table cells, limit is {limit}")]
    InputTooLarge { cells: usize, limit: usize },

    /// Building the replacement layer failed.
    #[error("merge error: {0}")]
    Merge(#[from] MergeError),

    /// Attaching the layer to its parent blob failed.
    #[error("blob error: {0}")]
    Blob(#[from] BlobError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
