//! Byte journal of committed replacement layers.
//!
//! Payload bytes of every layer are appended to one contiguous buffer; an
//! offset index records where each entry's payload lives and which entries
//! belong to which record.
//!
//! Layout:
//! ```text
//! buffer:  [payload 0][payload 1][payload 2]...
//! entries: {offset, length, bytes: start..end} per replacement
//! records: entries range per committed layer
//! ```

use std::ops::Range;

use tracing::debug;
use vblob_merge::{MergeResult, ReplacementSet};
use vblob_types::Replacement;

/// One journaled replacement, payload stored out of line.
#[derive(Clone, Debug, PartialEq, Eq)]
struct IndexEntry {
    offset: usize,
    length: usize,
    bytes: Range<usize>,
}

/// Append-only store of replacement layers.
#[derive(Debug)]
pub struct Journal {
    buffer: Vec<u8>,
    entries: Vec<IndexEntry>,
    records: Vec<Range<usize>>,
}

impl Journal {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            entries: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Payload bytes held across all records.
    pub fn payload_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Allocated buffer size in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Copy `layer` into the journal and return its record index.
    pub fn record(&mut self, layer: &ReplacementSet<u8>) -> usize {
        self.reserve(layer.payload_len());
        let first = self.entries.len();
        for entry in layer {
            let start = self.buffer.len();
            self.buffer.extend_from_slice(&entry.payload);
            self.entries.push(IndexEntry {
                offset: entry.offset,
                length: entry.length,
                bytes: start..self.buffer.len(),
            });
        }
        self.records.push(first..self.entries.len());
        self.records.len() - 1
    }

    /// Read record `index` back as a replacement layer.
    pub fn layer(&self, index: usize) -> Option<MergeResult<ReplacementSet<u8>>> {
        let range = self.records.get(index)?.clone();
        let entries = self.entries[range]
            .iter()
            .map(|e| Replacement::new(e.offset, e.length, self.buffer[e.bytes.clone()].to_vec()))
            .collect();
        Some(ReplacementSet::from_entries(entries))
    }

    /// Grow the buffer geometrically so appends stay amortized O(1).
    fn reserve(&mut self, additional: usize) {
        let needed = self.payload_bytes() + additional;
        let capacity = self.capacity();
        if needed <= capacity {
            return;
        }
        let target = needed.max(capacity.saturating_mul(2));
        self.buffer.reserve_exact(target - self.buffer.len());
        debug!(
            from = capacity,
            to = self.capacity(),
            "grew journal buffer"
        );
    }
}
