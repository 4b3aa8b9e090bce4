//! JSON edit scripts: a list of versions, each a list of edits.
//!
//! ```json
//! [
//!   [{"offset": 0, "length": 5, "text": "HELLO"}],
//!   [{"offset": 0, "length": 1, "text": "J"}, {"offset": 11, "text": "!"}]
//! ]
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vblob_ledger::Ledger;

/// One `replace(offset, length, text)` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEdit {
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditScript {
    pub versions: Vec<Vec<ScriptEdit>>,
}

impl EditScript {
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parsing edit script")
    }

    /// Commit one ledger version per script entry. Edits within an entry
    /// apply in order, each against the result of the previous one.
    pub fn apply(&self, ledger: &mut Ledger) -> anyhow::Result<()> {
        for (index, edits) in self.versions.iter().enumerate() {
            let mut next = ledger.latest().derive();
            for edit in edits {
                next = next
                    .replace(edit.offset, edit.length, edit.text.as_bytes().to_vec())
                    .with_context(|| format!("script entry {index}: {edit:?}"))?;
            }
            let version = ledger.append(next)?;
            debug!(version, edits = edits.len(), "applied script entry");
        }
        Ok(())
    }
}
