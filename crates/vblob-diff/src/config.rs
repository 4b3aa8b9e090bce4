use serde::{Deserialize, Serialize};

/// Limits applied by [`SnapshotDiffer`](crate::SnapshotDiffer).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferConfig {
    /// Largest alignment table, in cells, a single diff may allocate.
    /// Counted after the common prefix and suffix are trimmed.
    pub max_cells: usize,
}

impl DifferConfig {
    /// No bound on the table size.
    pub fn unbounded() -> Self {
        Self {
            max_cells: usize::MAX,
        }
    }
}

impl Default for DifferConfig {
    fn default() -> Self {
        Self {
            max_cells: 16 * 1024 * 1024,
        }
    }
}
