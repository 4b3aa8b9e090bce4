//! Replacement-set algebra for vblob.
//!
//! A [`ReplacementSet`] is a sorted, pairwise-disjoint, non-adjacent array
//! of [`Replacement`] entries expressed in the post-edit coordinate space of
//! the layer that owns it. This crate implements, once and generically over
//! the payload element type, every operation that combines such sets:
//!
//! - [`ReplacementSet::fold`] -- write one more edit into a layer without
//!   stacking a new one
//! - [`ReplacementSet::compose`] -- fold a whole later layer into an earlier one
//! - [`ReplacementSet::union`] -- merge two layers produced independently
//!   against the same parent, failing on overlap
//! - [`ReplacementSet::apply`] -- materialize a layer over a full parent sequence
//!
//! # Invariants
//!
//! 1. Entries are strictly increasing by offset.
//! 2. For consecutive entries `a`, `b`: `a.end() < b.offset` (no overlap,
//!    no adjacency; touching entries are always coalesced).
//! 3. No entry is a no-op (zero length and empty payload).
//!
//! Every constructor either checks these or preserves them by construction.
//!
//! [`Replacement`]: vblob_types::Replacement

pub mod error;
pub mod fold;
pub mod set;
pub mod union;

pub use error::{MergeError, MergeResult};
pub use set::{Located, ReplacementSet, Segment};
