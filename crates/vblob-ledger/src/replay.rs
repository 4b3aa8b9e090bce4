use tracing::{debug, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::traits::VersionReader;
use crate::validation::{Mismatch, ValidationReport};

/// Deterministic replay of a ledger's journal from its seed.
///
/// Replay never reads committed diff blobs past version 0: each version is
/// rebuilt by applying its journaled replacements to the previous version's
/// bytes, so it cross-checks the journal against the committed blobs.
pub struct ReplayEngine;

impl ReplayEngine {
    /// Rebuild the bytes of `version`.
    pub fn replay_to<R: VersionReader + ?Sized>(
        reader: &R,
        version: usize,
    ) -> LedgerResult<Vec<u8>> {
        let versions = reader.versions();
        if version >= versions {
            return Err(LedgerError::VersionOutOfRange { version, versions });
        }
        let mut bytes = reader.get(0)?.read_all();
        for v in 1..=version {
            bytes = reader.edits(v)?.apply(&bytes)?;
        }
        Ok(bytes)
    }

    /// Replay every version and compare it with what the ledger serves.
    pub fn verify<R: VersionReader + ?Sized>(reader: &R) -> LedgerResult<ValidationReport> {
        let versions = reader.versions();
        let mut mismatches = Vec::new();
        let mut bytes = reader.get(0)?.read_all();
        for v in 1..versions {
            bytes = reader.edits(v)?.apply(&bytes)?;
            let committed = reader.get(v)?.read_all();
            if let Some(mismatch) = Mismatch::between(v, &bytes, &committed) {
                warn!(version = v, "replayed bytes differ from committed version");
                mismatches.push(mismatch);
            }
        }
        debug!(versions, mismatches = mismatches.len(), "verified ledger");
        Ok(ValidationReport {
            versions,
            mismatches,
        })
    }
}
