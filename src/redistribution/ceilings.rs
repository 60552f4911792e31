//! Learned per-team multiplier ceilings.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::cli::types::TeamCode;
use crate::core::try_read_to_string;

/// `team -> ceiling`. Only ceilings of at least 1.0 are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamCeilings(BTreeMap<TeamCode, f64>);

impl TeamCeilings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        let raw: BTreeMap<String, f64> = serde_json::from_str(contents)?;
        let mut ceilings = Self::new();
        for (team, ceiling) in raw {
            ceilings.insert(TeamCode::new(&team), ceiling);
        }
        Ok(ceilings)
    }

    /// Load from disk. A missing or malformed file is an empty table.
    pub fn load_or_empty(path: &Path) -> Self {
        let Some(contents) = try_read_to_string(path) else {
            if path.exists() {
                warn!(path = %path.display(), "team ceilings unreadable, ignoring");
            }
            return Self::new();
        };
        match Self::from_json(&contents) {
            Ok(ceilings) => {
                debug!(teams = ceilings.0.len(), "loaded team ceilings");
                ceilings
            }
            Err(e) => {
                warn!(path = %path.display(), "team ceilings malformed, ignoring: {}", e);
                Self::new()
            }
        }
    }

    pub fn insert(&mut self, team: TeamCode, ceiling: f64) {
        if ceiling.is_finite() && ceiling >= 1.0 {
            self.0.insert(team, ceiling);
        } else {
            warn!(%team, ceiling, "ignoring team ceiling below 1.0");
        }
    }

    pub fn ceiling_for(&self, team: &TeamCode) -> Option<f64> {
        self.0.get(team).copied()
    }
}
