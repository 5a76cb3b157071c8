//! Persistent record of which cats have been observed

use crate::error::Result;
use crate::kind::CatKind;
use crate::seed::Seed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Set of observed `(kind, seed)` pairs backed by a JSON file
///
/// Renderers never consult the ledger; callers translate it into the
/// `OBSERVED` request flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationLedger {
    observed: BTreeSet<(CatKind, Seed)>,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl ObservationLedger {
    /// Empty in-memory ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a ledger, starting empty if the file does not exist yet
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut ledger = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<Self>(&content)?
        } else {
            debug!(path = %path.display(), "No ledger yet, starting empty");
            Self::default()
        };

        ledger.path = Some(path.to_path_buf());
        Ok(ledger)
    }

    /// Write back to the file this ledger was loaded from
    ///
    /// A ledger created with [`ObservationLedger::new`] has nowhere to go and
    /// saving it is a no-op.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        self.save_to(path)
    }

    /// Write to an explicit path
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Record an observation; returns `false` if it was already recorded
    pub fn mark(&mut self, kind: CatKind, seed: Seed) -> bool {
        let inserted = self.observed.insert((kind, seed));
        if inserted {
            info!(kind = kind.label(), seed = seed.value(), "Cat observed");
        }
        inserted
    }

    pub fn is_observed(&self, kind: CatKind, seed: Seed) -> bool {
        self.observed.contains(&(kind, seed))
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Observed pairs in kind, then seed order
    pub fn iter(&self) -> impl Iterator<Item = (CatKind, Seed)> + '_ {
        self.observed.iter().copied()
    }
}
