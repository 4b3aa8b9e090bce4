use serde::{Deserialize, Serialize};

/// Configuration for a [`Ledger`](crate::Ledger).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Initial journal buffer size in bytes (default: 4 KiB).
    pub initial_capacity: usize,
    /// Materialize every N-th version as a root blob, bounding the parent
    /// chain that reads walk. 0 disables checkpoints.
    pub checkpoint_interval: usize,
}

impl LedgerConfig {
    pub fn is_checkpoint(&self, version: usize) -> bool {
        self.checkpoint_interval > 0 && version % self.checkpoint_interval == 0
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 4 * 1024,
            checkpoint_interval: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = LedgerConfig::default();
        assert_eq!(c.initial_capacity, 4096);
        assert_eq!(c.checkpoint_interval, 64);
        assert!(c.is_checkpoint(128));
        assert!(!c.is_checkpoint(65));
    }

    #[test]
    fn zero_interval_disables_checkpoints() {
        let c = LedgerConfig {
            checkpoint_interval: 0,
            ..LedgerConfig::default()
        };
        assert!(!c.is_checkpoint(0));
        assert!(!c.is_checkpoint(64));
    }

    #[test]
    fn partial_config_deserializes() {
        let c: LedgerConfig = serde_json::from_str(r#"{"checkpoint_interval": 8}"#).unwrap();
        assert_eq!(c.checkpoint_interval, 8);
        assert_eq!(c.initial_capacity, 4096);
    }
}
