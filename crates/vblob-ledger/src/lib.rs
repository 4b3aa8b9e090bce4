//! Append-only version ledger for vblob.
//!
//! A [`Ledger`] records a linear history of blob states. Version 0 is the
//! seed; every later version is appended as a diff whose ancestry reaches
//! the previous version. This crate provides:
//! - [`Ledger`] with random access to any committed version
//! - a byte [`Journal`] holding each version's flattened replacement layer
//! - `VersionReader` / `VersionWriter` trait boundaries
//! - deterministic replay and verification from the seed ([`ReplayEngine`])
//! - [`LedgerConfig`] for journal sizing and checkpointing

pub mod config;
pub mod error;
pub mod journal;
pub mod ledger;
pub mod replay;
pub mod traits;
pub mod validation;

pub use config::LedgerConfig;
pub use error::{LedgerError, LedgerResult};
pub use journal::Journal;
pub use ledger::{Ledger, VersionInfo};
pub use replay::ReplayEngine;
pub use traits::{VersionReader, VersionWriter};
pub use validation::{Mismatch, ValidationReport};
