use vblob_merge::ReplacementSet;
use vblob_store::Blob;

use crate::error::LedgerResult;
use crate::ledger::Ledger;

/// Read boundary for version queries and replay.
pub trait VersionReader: Send + Sync {
    fn versions(&self) -> usize;

    fn get(&self, version: usize) -> LedgerResult<Blob>;

    fn latest(&self) -> Blob;

    /// Replacements that produced `version` from `version - 1`.
    fn edits(&self, version: usize) -> LedgerResult<ReplacementSet<u8>>;
}

/// Write boundary for committing new versions.
pub trait VersionWriter: Send + Sync {
    fn append(&mut self, blob: Blob) -> LedgerResult<usize>;
}

impl VersionReader for Ledger {
    fn versions(&self) -> usize {
        Ledger::versions(self)
    }

    fn get(&self, version: usize) -> LedgerResult<Blob> {
        Ledger::get(self, version)
    }

    fn latest(&self) -> Blob {
        Ledger::latest(self)
    }

    fn edits(&self, version: usize) -> LedgerResult<ReplacementSet<u8>> {
        Ledger::edits(self, version)
    }
}

impl VersionWriter for Ledger {
    fn append(&mut self, blob: Blob) -> LedgerResult<usize> {
        Ledger::append(self, blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_write<W: VersionWriter + VersionReader>(
        store: &mut W,
        offset: usize,
        byte: u8,
    ) -> LedgerResult<usize> {
        let next = store.latest().derive().write(offset, byte)?;
        store.append(next)
    }

    #[test]
    fn ledger_is_usable_through_trait_objects() {
        let mut ledger = Ledger::new(Blob::root(b"....".to_vec()));
        for (i, byte) in b"abcd".iter().enumerate() {
            assert_eq!(commit_write(&mut ledger, i, *byte).unwrap(), i + 1);
        }
        let reader: &dyn VersionReader = &ledger;
        assert_eq!(reader.versions(), 5);
        assert_eq!(reader.latest().read_all(), b"abcd");
        assert_eq!(reader.get(2).unwrap().read_all(), b"ab..");
        assert_eq!(reader.edits(3).unwrap().len(), 1);
    }
}
