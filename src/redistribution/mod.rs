//! Usage redistribution for absent players
//!
//! For one team's slate, production a missing regular would have produced is
//! handed to the active teammates as per-stat multipliers:
//! - `typical`: typical-role baselines and the vacated production pool
//! - `patterns`: externally maintained with/without tables (preferred path)
//! - `ceilings`: per-team multiplier ceilings for the generic path
//! - `generic`: minute-share fallback when no pattern covers the absence
//! - `assists`: playmaker override for assists, points and rebounds
//!
//! Nothing here returns an error. Missing inputs or degenerate numbers yield
//! fewer (or no) adjustments, reported through `tracing`.

pub mod assists;
pub mod ceilings;
pub mod generic;
pub mod patterns;
pub mod typical;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::cli::types::{PlayerId, StatKind, TeamCode};
use crate::core::EngineConfig;
use crate::storage::{DailyRecord, StatLine};

pub use assists::assist_override;
pub use ceilings::TeamCeilings;
pub use generic::generic_fallback;
pub use patterns::{pattern_adjustments, HistoricalPatternTable, PatternEntry};
pub use typical::{missing_players, production_pool, typical_roles, TypicalRole};

/// Per-player, per-stat multipliers keyed by player
pub type AdjustmentMap = BTreeMap<PlayerId, BTreeMap<StatKind, f64>>;

/// Players a team is fielding on one date with their projected minutes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSlate {
    pub team: TeamCode,
    pub players: BTreeMap<PlayerId, f64>,
}

impl RosterSlate {
    pub fn new(team: TeamCode) -> Self {
        Self {
            team,
            players: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with_player(mut self, player: &str, minutes: f64) -> Self {
        self.insert(PlayerId::new(player), minutes);
        self
    }

    /// Add or replace a player. Later entries win.
    pub fn insert(&mut self, player: PlayerId, minutes: f64) {
        self.players.insert(player, minutes);
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.players.contains_key(player)
    }

    pub fn minutes(&self, player: &PlayerId) -> Option<f64> {
        self.players.get(player).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Slate implied by the rows a team fielded in one snapshot.
    pub fn from_records<'a>(
        team: &TeamCode,
        records: impl IntoIterator<Item = &'a DailyRecord>,
    ) -> Self {
        let mut slate = Self::new(team.clone());
        for record in records.into_iter().filter(|r| &r.team == team) {
            slate.insert(record.player_id.clone(), record.minutes);
        }
        slate
    }
}

/// Multipliers to apply to one active player's projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsenceAdjustment {
    pub player_id: PlayerId,
    pub multipliers: BTreeMap<StatKind, f64>,
}

impl AbsenceAdjustment {
    /// Multiplier for `stat`, 1.0 when not adjusted.
    pub fn multiplier(&self, stat: StatKind) -> f64 {
        self.multipliers.get(&stat).copied().unwrap_or(1.0)
    }

    /// Scale every base stat on `line`. PRA follows from the scaled
    /// components.
    pub fn apply(&self, line: &StatLine) -> StatLine {
        let mut out = StatLine::new();
        for (stat, value) in line.iter() {
            out.set(stat, value * self.multiplier(stat));
        }
        out
    }
}

/// Externally maintained inputs to redistribution
#[derive(Debug, Clone, Default)]
pub struct RedistributionTables {
    pub patterns: HistoricalPatternTable,
    pub ceilings: TeamCeilings,
}

/// Compute absence adjustments for one team's slate.
///
/// `history` may hold every team; only `team`'s rows are used to build the
/// typical-role baseline. Returns an empty map when the slate is empty, the
/// team has no baseline, or nobody significant is missing.
pub fn compute_usage_adjustments(
    history: &[DailyRecord],
    team: &TeamCode,
    slate: &RosterSlate,
    config: &EngineConfig,
    tables: &RedistributionTables,
) -> BTreeMap<PlayerId, AbsenceAdjustment> {
    if slate.is_empty() {
        debug!(%team, "empty slate, no redistribution");
        return BTreeMap::new();
    }

    let policy = &config.redistribution;
    let baseline = typical_roles(history, team, policy.significance_minutes);
    if baseline.is_empty() {
        debug!(%team, "no typical-role data, no redistribution");
        return BTreeMap::new();
    }

    let missing = missing_players(&baseline, slate, policy.significance_minutes);
    if missing.is_empty() {
        debug!(%team, "no significant absences");
        return BTreeMap::new();
    }
    debug!(
        %team,
        missing = ?missing.iter().map(|m| m.player_id.as_str()).collect::<Vec<_>>(),
        "detected absences"
    );

    let primary = match pattern_adjustments(&tables.patterns, team, &missing, slate, policy) {
        Some(adjustments) => {
            debug!(%team, players = adjustments.len(), "using historical patterns");
            adjustments
        }
        None => {
            let pool = production_pool(&missing);
            let ceiling = tables
                .ceilings
                .ceiling_for(team)
                .unwrap_or(policy.default_team_ceiling);
            debug!(%team, ceiling, "using generic redistribution");
            generic_fallback(&pool, &baseline, slate, policy, ceiling)
        }
    };

    let override_path = assist_override(&missing, &baseline, slate, config);
    let merged = merge_adjustments(primary, override_path);

    finalize(team, merged)
}

/// Reconcile the primary path with the assist override.
///
/// Assists take the higher of the two multipliers. Every other stat keeps
/// the primary value and the override only fills gaps.
pub fn merge_adjustments(primary: AdjustmentMap, assist_path: AdjustmentMap) -> AdjustmentMap {
    let mut merged = primary;
    for (player, stats) in assist_path {
        let entry = merged.entry(player).or_default();
        for (stat, multiplier) in stats {
            match (stat, entry.get(&stat).copied()) {
                (StatKind::Assists, Some(existing)) => {
                    entry.insert(stat, existing.max(multiplier));
                }
                (_, Some(_)) => {}
                (_, None) => {
                    entry.insert(stat, multiplier);
                }
            }
        }
    }
    merged
}

fn finalize(team: &TeamCode, merged: AdjustmentMap) -> BTreeMap<PlayerId, AbsenceAdjustment> {
    merged
        .into_iter()
        .filter_map(|(player_id, stats)| {
            let multipliers: BTreeMap<StatKind, f64> = stats
                .into_iter()
                .filter(|(stat, m)| {
                    let keep = m.is_finite() && *m > 0.0;
                    if !keep {
                        warn!(
                            %team,
                            player = %player_id,
                            %stat,
                            multiplier = m,
                            "discarding degenerate multiplier"
                        );
                    }
                    keep
                })
                .collect();
            (!multipliers.is_empty()).then(|| {
                (
                    player_id.clone(),
                    AbsenceAdjustment {
                        player_id,
                        multipliers,
                    },
                )
            })
        })
        .collect()
}
