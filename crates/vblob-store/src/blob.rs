use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use tracing::debug;
use vblob_merge::{Located, ReplacementSet, Segment};
use vblob_types::{ContentId, Replacement};

use crate::error::{BlobError, BlobResult};

/// Immutable byte sequence with structural sharing.
///
/// Cloning a `Blob` clones a handle, not bytes. A diff holds its parent by
/// handle, so any number of diffs can branch off one parent without
/// copying it.
#[derive(Clone)]
pub struct Blob(Arc<Node>);

enum Node {
    Root {
        bytes: Vec<u8>,
    },
    Diff {
        parent: Blob,
        replacements: ReplacementSet<u8>,
        size: usize,
    },
}

/// Borrowed view of a blob's variant, for exhaustive matching by callers.
#[derive(Clone, Copy, Debug)]
pub enum BlobKind<'a> {
    Root(&'a [u8]),
    Diff {
        parent: &'a Blob,
        replacements: &'a ReplacementSet<u8>,
    },
}

/// Pending work for an in-order range read.
enum Job<'a> {
    Copy(&'a [u8]),
    Read(&'a Blob, Range<usize>),
}

impl Blob {
    /// A root blob owning `bytes`.
    pub fn root(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::new(Node::Root {
            bytes: bytes.into(),
        }))
    }

    /// A zero-length root.
    pub fn empty() -> Self {
        Self::root(Vec::new())
    }

    /// A diff layer over `parent`.
    ///
    /// Fails with [`BlobError::InvalidArgument`] if the layer consumes
    /// parent bytes past the parent's end.
    pub fn from_parts(parent: Blob, replacements: ReplacementSet<u8>) -> BlobResult<Self> {
        let extent = replacements.parent_extent();
        if extent > parent.size() {
            return Err(BlobError::InvalidArgument(format!(
                "layer consumes {extent} parent bytes, parent has {}",
                parent.size()
            )));
        }
        Ok(Self::layer(parent, replacements))
    }

    fn layer(parent: Blob, replacements: ReplacementSet<u8>) -> Self {
        let size = (parent.size() as isize + replacements.total_delta()) as usize;
        Self(Arc::new(Node::Diff {
            parent,
            replacements,
            size,
        }))
    }

    pub fn size(&self) -> usize {
        match &*self.0 {
            Node::Root { bytes } => bytes.len(),
            Node::Diff { size, .. } => *size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn kind(&self) -> BlobKind<'_> {
        match &*self.0 {
            Node::Root { bytes } => BlobKind::Root(bytes),
            Node::Diff {
                parent,
                replacements,
                ..
            } => BlobKind::Diff {
                parent,
                replacements,
            },
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(&*self.0, Node::Root { .. })
    }

    /// The parent of a diff; `None` for a root.
    pub fn parent(&self) -> Option<&Blob> {
        match &*self.0 {
            Node::Root { .. } => None,
            Node::Diff { parent, .. } => Some(parent),
        }
    }

    /// The replacement layer of a diff; `None` for a root.
    pub fn replacements(&self) -> Option<&ReplacementSet<u8>> {
        match &*self.0 {
            Node::Root { .. } => None,
            Node::Diff { replacements, .. } => Some(replacements),
        }
    }

    /// Number of diff layers between this blob and its root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self;
        while let Some(parent) = node.parent() {
            depth += 1;
            node = parent;
        }
        depth
    }

    /// Whether two handles refer to the very same blob.
    pub fn ptr_eq(a: &Blob, b: &Blob) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    /// Read the byte at `index`.
    pub fn read(&self, index: usize) -> BlobResult<u8> {
        let size = self.size();
        if index >= size {
            return Err(BlobError::IndexOutOfRange { index, size });
        }

        let mut node = self;
        let mut index = index;
        loop {
            match &*node.0 {
                Node::Root { bytes } => {
                    return bytes
                        .get(index)
                        .copied()
                        .ok_or(BlobError::IndexOutOfRange {
                            index,
                            size: bytes.len(),
                        });
                }
                Node::Diff {
                    parent,
                    replacements,
                    ..
                } => match replacements.locate(index) {
                    Located::Payload { entry, at } => {
                        return Ok(replacements.as_slice()[entry].payload[at]);
                    }
                    Located::Parent(translated) => {
                        node = parent;
                        index = translated;
                    }
                },
            }
        }
    }

    /// Read `len` bytes starting at `start`.
    pub fn read_range(&self, start: usize, len: usize) -> BlobResult<Vec<u8>> {
        let end = start.checked_add(len).ok_or_else(|| {
            BlobError::InvalidArgument(format!("range {start}+{len} overflows"))
        })?;
        let size = self.size();
        if end > size {
            return Err(BlobError::RangeOutOfRange {
                range: start..end,
                size,
            });
        }
        let mut out = Vec::with_capacity(len);
        self.read_into(start..end, &mut out);
        Ok(out)
    }

    /// Materialize the whole blob.
    pub fn read_all(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.read_into(0..self.size(), &mut out);
        out
    }

    /// Fingerprint of the blob's current contents.
    pub fn fingerprint(&self) -> ContentId {
        ContentId::of(&self.read_all())
    }

    /// Append `range` (already bounds-checked) to `out`.
    ///
    /// Uses an explicit stack so long parent chains do not grow the call
    /// stack. Jobs are pushed in reverse so they pop in byte order.
    fn read_into(&self, range: Range<usize>, out: &mut Vec<u8>) {
        let mut jobs = vec![Job::Read(self, range)];
        while let Some(job) = jobs.pop() {
            match job {
                Job::Copy(bytes) => out.extend_from_slice(bytes),
                Job::Read(blob, range) => match &*blob.0 {
                    Node::Root { bytes } => out.extend_from_slice(&bytes[range]),
                    Node::Diff {
                        parent,
                        replacements,
                        ..
                    } => {
                        for segment in replacements.segments(range).into_iter().rev() {
                            jobs.push(match segment {
                                Segment::Payload { entry, range } => {
                                    Job::Copy(&replacements.as_slice()[entry].payload[range])
                                }
                                Segment::Parent(range) => Job::Read(parent, range),
                            });
                        }
                    }
                },
            }
        }
    }

    // ---------------------------------------------------------------
    // Edits
    // ---------------------------------------------------------------

    /// Overwrite the byte at `index`.
    pub fn write(&self, index: usize, value: u8) -> BlobResult<Blob> {
        self.replace(index, 1, vec![value])
    }

    /// Replace `length` bytes at `offset` with `payload`.
    ///
    /// On a root this yields a one-entry diff over the root. On a diff the
    /// edit is folded into the existing layer and the parent is kept.
    ///
    /// Edits are elastic: an `offset` past the end zero-fills the gap before
    /// the payload, and a range running past the end consumes only the bytes
    /// that exist.
    ///
    /// The zero fill is materialized in the payload, so its cost is
    /// proportional to the gap. A gap that cannot be allocated is
    /// [`BlobError::InvalidArgument`].
    pub fn replace(
        &self,
        offset: usize,
        length: usize,
        payload: impl Into<Vec<u8>>,
    ) -> BlobResult<Blob> {
        if offset.checked_add(length).is_none() {
            return Err(BlobError::InvalidArgument(format!(
                "replacement {offset}+{length} overflows"
            )));
        }
        let payload = payload.into();
        let size = self.size();
        let edit = if offset > size {
            let gap = offset - size;
            debug!(offset, size, gap, "write past end grows blob");
            let total = gap.checked_add(payload.len()).ok_or_else(|| {
                BlobError::InvalidArgument(format!("padding {gap} bytes overflows"))
            })?;
            let mut padded = Vec::new();
            padded.try_reserve_exact(total).map_err(|e| {
                BlobError::InvalidArgument(format!("cannot pad {gap} bytes: {e}"))
            })?;
            padded.resize(gap, 0);
            padded.extend(payload);
            Replacement::insertion(size, padded)
        } else {
            Replacement::new(offset, length.min(size - offset), payload)
        };

        Ok(match &*self.0 {
            Node::Root { .. } => Self::layer(self.clone(), ReplacementSet::single(edit)),
            Node::Diff {
                parent,
                replacements,
                ..
            } => Self::layer(parent.clone(), replacements.fold(edit)),
        })
    }

    /// Insert `payload` before `offset`.
    pub fn insert(&self, offset: usize, payload: impl Into<Vec<u8>>) -> BlobResult<Blob> {
        self.replace(offset, 0, payload)
    }

    /// Remove `length` bytes at `offset`.
    pub fn delete(&self, offset: usize, length: usize) -> BlobResult<Blob> {
        self.replace(offset, length, Vec::new())
    }

    /// Start a new, empty diff layer on top of this blob.
    ///
    /// Writes to the returned blob fold into the new layer, leaving this
    /// blob as the fixed parent. This is how the next ledger version is
    /// started from the latest committed one.
    pub fn derive(&self) -> Blob {
        Self::layer(self.clone(), ReplacementSet::new())
    }

    /// Union two diffs built independently against the same parent.
    ///
    /// Fails with [`BlobError::InvalidArgument`] unless both blobs are diffs
    /// over the identical parent handle, and with a conflict if any of their
    /// replacements overlap.
    pub fn merge(&self, other: &Blob) -> BlobResult<Blob> {
        match (&*self.0, &*other.0) {
            (
                Node::Diff {
                    parent,
                    replacements,
                    ..
                },
                Node::Diff {
                    parent: other_parent,
                    replacements: other_replacements,
                    ..
                },
            ) => {
                if !Blob::ptr_eq(parent, other_parent) {
                    return Err(BlobError::InvalidArgument(
                        "merged diffs must share the same parent".into(),
                    ));
                }
                let merged = replacements.union(other_replacements)?;
                debug!(entries = merged.len(), "merged sibling diffs");
                Ok(Self::layer(parent.clone(), merged))
            }
            _ => Err(BlobError::InvalidArgument(
                "only diffs can be merged".into(),
            )),
        }
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            Node::Root { bytes } => f.debug_struct("Root").field("size", &bytes.len()).finish(),
            Node::Diff {
                replacements, size, ..
            } => f
                .debug_struct("Diff")
                .field("size", size)
                .field("entries", &replacements.len())
                .field("depth", &self.depth())
                .finish(),
        }
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self::root(bytes)
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Self::root(bytes.to_vec())
    }
}
