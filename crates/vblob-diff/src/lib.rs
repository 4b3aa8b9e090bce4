//! Snapshot differ for vblob.
//!
//! Given two full snapshots, derives a single replacement layer that turns
//! the first into the second. The alignment is a longest common subsequence
//! computed with the classic dynamic-programming table after trimming the
//! common prefix and suffix.
//!
//! # Key Types
//!
//! - [`SnapshotDiffer`] -- byte differ producing [`vblob_store::Blob`] diffs
//! - [`DifferConfig`] -- bound on the size of the alignment table
//! - [`lcs_replacements`] -- the generic alignment core, for any `T: PartialEq + Clone`

pub mod config;
pub mod error;
pub mod lcs;
pub mod snapshot;

pub use config::DifferConfig;
pub use error::{DiffError, DiffResult};
pub use lcs::{lcs_replacements, Alignment};
pub use snapshot::{diff_of, SnapshotDiffer};
