//! Typical-role baselines built from a team's history.

use std::collections::BTreeMap;

use crate::cli::types::{PlayerId, StatKind, TeamCode};
use crate::storage::{DailyRecord, StatLine};

use super::RosterSlate;

/// A player's usual minutes and per-stat production for one team
#[derive(Debug, Clone, PartialEq)]
pub struct TypicalRole {
    pub player_id: PlayerId,
    pub minutes: f64,
    pub stats: StatLine,
    /// Rows the baseline was built from.
    pub games: usize,
}

impl TypicalRole {
    pub fn stat(&self, stat: StatKind) -> Option<f64> {
        self.stats.get(stat)
    }
}

/// Baseline for every player who has appeared for `team`.
///
/// The mean runs over rows with minutes at or above `significance_minutes`.
/// A player who never reached that mark gets the mean over all of their
/// rows, so reserves still have a baseline.
pub fn typical_roles(
    history: &[DailyRecord],
    team: &TeamCode,
    significance_minutes: f64,
) -> BTreeMap<PlayerId, TypicalRole> {
    let mut by_player: BTreeMap<&PlayerId, Vec<&DailyRecord>> = BTreeMap::new();
    for record in history.iter().filter(|r| &r.team == team) {
        by_player.entry(&record.player_id).or_default().push(record);
    }

    by_player
        .into_iter()
        .map(|(player_id, rows)| {
            let significant: Vec<&DailyRecord> = rows
                .iter()
                .copied()
                .filter(|r| r.minutes >= significance_minutes)
                .collect();
            let used = if significant.is_empty() {
                rows
            } else {
                significant
            };
            (player_id.clone(), mean_role(player_id, &used))
        })
        .collect()
}

fn mean_role(player_id: &PlayerId, rows: &[&DailyRecord]) -> TypicalRole {
    let minutes = rows.iter().map(|r| r.minutes).sum::<f64>() / rows.len() as f64;

    let mut stats = StatLine::new();
    for stat in StatKind::BASE {
        let values: Vec<f64> = rows.iter().filter_map(|r| r.stats.get(stat)).collect();
        if !values.is_empty() {
            stats.set(stat, values.iter().sum::<f64>() / values.len() as f64);
        }
    }

    TypicalRole {
        player_id: player_id.clone(),
        minutes,
        stats,
        games: rows.len(),
    }
}

/// Baseline players with a significant role who are not on the slate.
pub fn missing_players<'a>(
    baseline: &'a BTreeMap<PlayerId, TypicalRole>,
    slate: &RosterSlate,
    significance_minutes: f64,
) -> Vec<&'a TypicalRole> {
    baseline
        .values()
        .filter(|role| role.minutes >= significance_minutes && !slate.contains(&role.player_id))
        .collect()
}

/// Sum of the missing players' typical production, per base stat.
pub fn production_pool(missing: &[&TypicalRole]) -> StatLine {
    let mut pool = StatLine::new();
    for stat in StatKind::BASE {
        let values: Vec<f64> = missing.iter().filter_map(|m| m.stat(stat)).collect();
        if !values.is_empty() {
            pool.set(stat, values.iter().sum());
        }
    }
    pool
}
