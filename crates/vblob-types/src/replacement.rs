use serde::{Deserialize, Serialize};

/// One atomic range edit.
///
/// A replacement says: the `length` parent elements that sit at `offset`
/// are replaced by `payload`. The `offset` is expressed in the coordinate
/// space of the sequence *after* the edit (the owning diff's own space), so
/// in that space the entry occupies `[offset, offset + payload.len())`.
///
/// The element type is generic so the same edit algebra serves bytes,
/// characters, or any other cloneable element.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Replacement<T> {
    /// Start of the edit in post-edit coordinates.
    pub offset: usize,
    /// Number of parent elements consumed.
    pub length: usize,
    /// Elements written in place of the consumed range.
    pub payload: Vec<T>,
}

impl<T> Replacement<T> {
    /// Create a replacement of `length` elements at `offset`.
    pub fn new(offset: usize, length: usize, payload: impl Into<Vec<T>>) -> Self {
        Self {
            offset,
            length,
            payload: payload.into(),
        }
    }

    /// Pure insertion: consumes nothing.
    pub fn insertion(offset: usize, payload: impl Into<Vec<T>>) -> Self {
        Self::new(offset, 0, payload)
    }

    /// Pure deletion: writes nothing.
    pub fn deletion(offset: usize, length: usize) -> Self {
        Self::new(offset, length, Vec::new())
    }

    /// Exclusive end of the entry's span in post-edit coordinates.
    pub fn end(&self) -> usize {
        self.offset + self.payload.len()
    }

    /// Exclusive end of the consumed range, measured from `offset`.
    pub fn consumed_end(&self) -> usize {
        self.offset + self.length
    }

    /// Signed size change contributed by this edit.
    pub fn delta(&self) -> isize {
        self.payload.len() as isize - self.length as isize
    }

    /// Returns `true` if applying the edit changes nothing.
    pub fn is_noop(&self) -> bool {
        self.length == 0 && self.payload.is_empty()
    }
}

impl Replacement<u8> {
    /// Single-byte overwrite.
    pub fn byte(offset: usize, value: u8) -> Self {
        Self::new(offset, 1, vec![value])
    }
}
