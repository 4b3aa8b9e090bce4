use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use vblob_merge::ReplacementSet;
use vblob_store::{Blob, BlobKind};
use vblob_types::ContentId;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::journal::Journal;

/// Summary of one committed version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: usize,
    pub size: usize,
    /// Replacements that produced this version from the previous one.
    pub edit_count: usize,
    /// Payload bytes those replacements carry.
    pub payload_bytes: usize,
    pub fingerprint: ContentId,
}

/// Linear, append-only history of blob versions.
///
/// Version 0 is the seed. Each append must be a diff (or chain of diffs,
/// see [`Blob::derive`]) descending from the latest version; its layers are
/// flattened into one replacement set, journaled, and committed as the
/// next version.
///
/// The latest version is reachable through two handles: the blob the ledger
/// serves from [`Ledger::latest`], and the blob the caller last appended.
/// Either one anchors the next append, so a writer may keep building on its
/// own handle even when the ledger stored a flattened or checkpointed copy.
#[derive(Debug)]
pub struct Ledger {
    config: LedgerConfig,
    journal: Journal,
    /// Committed blobs; `committed[v]` is version `v`, and journal record
    /// `v - 1` produced it.
    committed: Vec<Blob>,
    /// The handle last passed to `append` (the seed before any append).
    tip: Blob,
}

impl Ledger {
    /// A ledger whose version 0 is `seed`.
    pub fn new(seed: Blob) -> Self {
        Self::with_config(seed, LedgerConfig::default())
    }

    pub fn with_config(seed: Blob, config: LedgerConfig) -> Self {
        debug!(size = seed.size(), "seeded ledger");
        Self {
            journal: Journal::with_capacity(config.initial_capacity),
            config,
            tip: seed.clone(),
            committed: vec![seed],
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn versions(&self) -> usize {
        self.committed.len()
    }

    pub fn get(&self, version: usize) -> LedgerResult<Blob> {
        self.committed
            .get(version)
            .cloned()
            .ok_or(LedgerError::VersionOutOfRange {
                version,
                versions: self.versions(),
            })
    }

    /// The most recently committed version. Start the next one with
    /// `ledger.latest().derive()`.
    pub fn latest(&self) -> Blob {
        self.committed[self.committed.len() - 1].clone()
    }

    /// Commit `blob` as the next version and return its index.
    ///
    /// Fails with [`LedgerError::NonSequentialPut`] unless walking `blob`'s
    /// parent chain reaches the latest version, either the committed handle
    /// or the last appended one, by handle identity through at least one
    /// diff. The ledger is unchanged on failure.
    pub fn append(&mut self, blob: Blob) -> LedgerResult<usize> {
        let latest = self.latest();
        let latest_version = self.versions() - 1;

        let mut layers = Vec::new();
        let mut node = &blob;
        while !Blob::ptr_eq(node, &latest) && !Blob::ptr_eq(node, &self.tip) {
            match node.kind() {
                BlobKind::Diff {
                    parent,
                    replacements,
                } => {
                    layers.push(replacements);
                    node = parent;
                }
                BlobKind::Root(_) => {
                    warn!(latest = latest_version, "rejected blob from another lineage");
                    return Err(LedgerError::NonSequentialPut {
                        latest: latest_version,
                    });
                }
            }
        }
        if layers.is_empty() {
            warn!(latest = latest_version, "rejected re-append of latest version");
            return Err(LedgerError::NonSequentialPut {
                latest: latest_version,
            });
        }

        // A chain anchored on the tip is re-parented onto the committed
        // handle, so reads never walk the caller's own history.
        let direct = layers.len() == 1 && Blob::ptr_eq(node, &latest);
        let depth = layers.len();
        let flattened = layers
            .iter()
            .rev()
            .fold(ReplacementSet::new(), |acc, layer| acc.compose(layer));
        let version = latest_version + 1;
        let checkpoint = self.config.is_checkpoint(version);
        let committed = if checkpoint {
            Blob::root(blob.read_all())
        } else if direct {
            blob.clone()
        } else {
            Blob::from_parts(latest, flattened.clone())?
        };

        self.journal.record(&flattened);
        self.committed.push(committed);
        self.tip = blob;
        debug!(
            version,
            layers = depth,
            edits = flattened.len(),
            checkpoint,
            journal_bytes = self.journal.payload_bytes(),
            "committed ledger version"
        );
        Ok(version)
    }

    /// The flattened replacements that produced `version` from the previous
    /// version. Empty for version 0.
    pub fn edits(&self, version: usize) -> LedgerResult<ReplacementSet<u8>> {
        if version >= self.versions() {
            return Err(LedgerError::VersionOutOfRange {
                version,
                versions: self.versions(),
            });
        }
        match version.checked_sub(1).and_then(|record| self.journal.layer(record)) {
            Some(layer) => Ok(layer?),
            None => Ok(ReplacementSet::new()),
        }
    }

    pub fn info(&self, version: usize) -> LedgerResult<VersionInfo> {
        let blob = self.get(version)?;
        let edits = self.edits(version)?;
        Ok(VersionInfo {
            version,
            size: blob.size(),
            edit_count: edits.len(),
            payload_bytes: edits.payload_len(),
            fingerprint: blob.fingerprint(),
        })
    }

    /// [`VersionInfo`] for every version, oldest first.
    pub fn history(&self) -> LedgerResult<Vec<VersionInfo>> {
        (0..self.versions()).map(|v| self.info(v)).collect()
    }
}
