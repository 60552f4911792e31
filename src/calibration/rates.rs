//! Recency-weighted per-player expectations.

use crate::cli::types::{GameDate, PlayerId, StatKind};
use crate::storage::DailyRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::recency::{recency_weights, weighted_mean};

/// Expected production of one player for one stat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRate {
    pub player_id: PlayerId,
    pub stat: StatKind,
    /// Recency-weighted mean of the stat.
    pub expected_value: f64,
    /// Recency-weighted stat per projected minute.
    pub rate_per_minute: Option<f64>,
    /// Rows that contributed.
    pub samples: usize,
}

/// Estimate every player's expected value for `stat`.
///
/// Weights are computed per player over the dates on which that player has a
/// value for this stat, so a missing value on one date never shifts another
/// player's weights. Players with no rows for the stat are absent from the
/// result; falling back is the caller's job.
pub fn estimate_player_rates(
    history: &[DailyRecord],
    stat: StatKind,
    halflife_days: f64,
) -> BTreeMap<PlayerId, PlayerRate> {
    let mut by_player: BTreeMap<&PlayerId, Vec<(GameDate, f64, f64)>> = BTreeMap::new();
    for record in history {
        if let Some(value) = record.stats.get(stat) {
            by_player
                .entry(&record.player_id)
                .or_default()
                .push((record.date, value, record.minutes));
        }
    }

    by_player
        .into_iter()
        .map(|(player_id, rows)| {
            let dates: Vec<GameDate> = rows.iter().map(|(d, _, _)| *d).collect();
            let weights = recency_weights(&dates, halflife_days);

            let values: Vec<f64> = rows.iter().map(|(_, v, _)| *v).collect();
            let minutes: Vec<f64> = rows.iter().map(|(_, _, m)| *m).collect();

            let expected_value = weighted_mean(&values, &weights).unwrap_or(0.0);
            let rate_per_minute = weighted_mean(&minutes, &weights)
                .filter(|m| *m > 0.0)
                .map(|m| expected_value / m);

            (
                player_id.clone(),
                PlayerRate {
                    player_id: player_id.clone(),
                    stat,
                    expected_value,
                    rate_per_minute,
                    samples: rows.len(),
                },
            )
        })
        .collect()
}
