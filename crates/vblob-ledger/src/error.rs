use vblob_merge::MergeError;
use vblob_store::BlobError;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("version {version} out of range, ledger has {versions} versions")]
    VersionOutOfRange { version: usize, versions: usize },

    /// The appended blob does not descend from the latest version.
    #[error("non-sequential put: blob does not descend from latest version {latest}")]
    NonSequentialPut { latest: usize },

    #[error("blob error: {0}")]
    Blob(#[from] BlobError),

    #[error("merge error: {0}")]
    Merge(#[from] MergeError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
