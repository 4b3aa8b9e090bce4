//! Immutable, structurally shared byte blobs.
//!
//! A [`Blob`] is either a *root* owning a contiguous byte array, or a
//! *diff*: one layer of sorted, disjoint replacements over a shared parent
//! blob. Writing to a blob never mutates it; it returns a new handle that
//! shares everything it did not change.
//!
//! # Design Rules
//!
//! 1. Blobs are immutable once built; handles are cheap `Arc` clones.
//! 2. Writing to a diff folds into that diff's layer and keeps its parent,
//!    so one logical version is always one layer. [`Blob::derive`] is the
//!    only way to stack a new layer.
//! 3. Identity is handle identity ([`Blob::ptr_eq`]), never content.
//! 4. Reads walk the parent chain iteratively.
//! 5. Blobs are `Send + Sync` and need no locking to read.

pub mod blob;
pub mod error;

pub use blob::{Blob, BlobKind};
pub use error::{BlobError, BlobResult};
