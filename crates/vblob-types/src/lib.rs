//! Foundation types for vblob.
//!
//! This crate provides the value types shared by every other vblob crate.
//! It has no knowledge of blobs or ledgers; it only describes edits and
//! content identity.
//!
//! # Key Types
//!
//! - [`Replacement`] -- one atomic, length-changing range edit, generic over
//!   the payload element type
//! - [`ContentId`] -- BLAKE3 fingerprint of a byte sequence

pub mod content;
pub mod error;
pub mod replacement;

pub use content::ContentId;
pub use error::TypeError;
pub use replacement::Replacement;
