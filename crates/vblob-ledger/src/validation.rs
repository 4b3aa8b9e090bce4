/// Result of replaying a ledger against its committed versions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    pub versions: usize,
    pub mismatches: Vec<Mismatch>,
}

impl ValidationReport {
    /// Returns `true` if every version replayed to its committed bytes.
    pub fn is_valid(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// A version whose replayed bytes differ from the committed blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    pub version: usize,
    pub expected_size: usize,
    pub actual_size: usize,
    /// First differing byte index; `None` when one side is a prefix of
    /// the other.
    pub first_difference: Option<usize>,
}

impl Mismatch {
    /// Compare replayed bytes (`expected`) with committed bytes (`actual`).
    pub fn between(version: usize, expected: &[u8], actual: &[u8]) -> Option<Self> {
        if expected == actual {
            return None;
        }
        Some(Self {
            version,
            expected_size: expected.len(),
            actual_size: actual.len(),
            first_difference: expected.iter().zip(actual).position(|(a, b)| a != b),
        })
    }
}
