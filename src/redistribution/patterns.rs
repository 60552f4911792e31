//! Historical with/without tables for specific absences.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::cli::types::{PlayerId, TeamCode};
use crate::core::{try_read_to_string, RedistributionConfig};

use super::{AdjustmentMap, RosterSlate, TypicalRole};

/// How one teammate produced with and without a given player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub with_player: f64,
    pub without_player: f64,
    /// Games observed without the player.
    #[serde(alias = "sample_size_without", default)]
    pub sample_size: u32,
}

impl PatternEntry {
    /// `without / with`, or `None` when the with-value is not positive.
    pub fn ratio(&self) -> Option<f64> {
        (self.with_player > 0.0 && self.without_player.is_finite())
            .then(|| self.without_player / self.with_player)
    }

    pub fn confidence(&self) -> &'static str {
        if self.sample_size >= 2 {
            "high"
        } else {
            "medium"
        }
    }
}

type TeammateImpacts = BTreeMap<PlayerId, PatternEntry>;

/// `team -> missing player -> teammate -> entry`, with normalized keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoricalPatternTable(BTreeMap<TeamCode, BTreeMap<PlayerId, TeammateImpacts>>);

impl HistoricalPatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON form, normalizing team and player keys.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        let raw: BTreeMap<String, BTreeMap<String, BTreeMap<String, PatternEntry>>> =
            serde_json::from_str(contents)?;

        let mut table = Self::new();
        for (team, absences) in raw {
            for (missing, impacts) in absences {
                for (teammate, entry) in impacts {
                    table.insert(
                        TeamCode::new(&team),
                        PlayerId::new(&missing),
                        PlayerId::new(&teammate),
                        entry,
                    );
                }
            }
        }
        Ok(table)
    }

    /// Load from disk. A missing or malformed file is an empty table.
    pub fn load_or_empty(path: &Path) -> Self {
        let Some(contents) = try_read_to_string(path) else {
            if path.exists() {
                warn!(path = %path.display(), "pattern table unreadable, ignoring");
            } else {
                debug!(path = %path.display(), "no pattern table");
            }
            return Self::new();
        };
        match Self::from_json(&contents) {
            Ok(table) => {
                debug!(teams = table.0.len(), "loaded historical patterns");
                table
            }
            Err(e) => {
                warn!(path = %path.display(), "pattern table malformed, ignoring: {}", e);
                Self::new()
            }
        }
    }

    pub fn insert(
        &mut self,
        team: TeamCode,
        missing: PlayerId,
        teammate: PlayerId,
        entry: PatternEntry,
    ) {
        self.0
            .entry(team)
            .or_default()
            .entry(missing)
            .or_default()
            .insert(teammate, entry);
    }

    /// Teammate impacts recorded for `missing` being out for `team`.
    pub fn impacts(&self, team: &TeamCode, missing: &PlayerId) -> Option<&TeammateImpacts> {
        self.0.get(team)?.get(missing)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Pattern-derived multipliers, or `None` when the table does not cover
/// every missing player.
///
/// For each missing player and each active teammate with an entry the
/// multiplier is `without / with`, clamped to the configured range and kept
/// only when it moves more than the minimum deviation. Multipliers implied by
/// several absences are averaged. The result is applied to every configured
/// pattern stat.
pub fn pattern_adjustments(
    table: &HistoricalPatternTable,
    team: &TeamCode,
    missing: &[&TypicalRole],
    slate: &RosterSlate,
    policy: &RedistributionConfig,
) -> Option<AdjustmentMap> {
    if missing.is_empty() {
        return None;
    }
    let impacts: Vec<(&PlayerId, &TeammateImpacts)> = missing
        .iter()
        .map(|m| {
            table
                .impacts(team, &m.player_id)
                .map(|impacts| (&m.player_id, impacts))
        })
        .collect::<Option<_>>()?;

    let mut implied: BTreeMap<&PlayerId, Vec<f64>> = BTreeMap::new();
    for (missing_id, teammates) in impacts {
        for (teammate, entry) in teammates.iter().filter(|(t, _)| slate.contains(t)) {
            let Some(ratio) = entry.ratio() else {
                continue;
            };
            let multiplier = ratio.clamp(policy.pattern_floor, policy.pattern_ceiling);
            if (multiplier - 1.0).abs() <= policy.pattern_min_deviation {
                continue;
            }
            debug!(
                %team,
                missing = %missing_id,
                %teammate,
                multiplier,
                confidence = entry.confidence(),
                "pattern match"
            );
            implied.entry(teammate).or_default().push(multiplier);
        }
    }

    Some(
        implied
            .into_iter()
            .map(|(teammate, values)| {
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                let stats = policy.pattern_stats.iter().map(|s| (*s, mean)).collect();
                (teammate.clone(), stats)
            })
            .collect(),
    )
}
