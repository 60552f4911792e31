//! League-normalized opponent strength multipliers.

use crate::cli::types::{GameDate, StatKind, TeamCode};
use crate::storage::DailyRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::recency::{recency_weights, weighted_mean};

/// Floor for a day's cross-player mean before dividing by it.
pub const DAY_MEAN_FLOOR: f64 = 1e-9;

/// How much an opponent inflates (>1) or deflates (<1) a stat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentMultiplier {
    pub opponent: TeamCode,
    pub stat: StatKind,
    pub multiplier: f64,
    pub samples: usize,
}

/// Calibrate per-opponent multipliers for `stat`.
///
/// Each row's value is divided by that date's cross-player mean, the ratios
/// are recency-weighted over the whole row set and averaged per opponent, and
/// the resulting multipliers are divided by their own unweighted mean so the
/// league average is exactly 1.0. When every ratio is zero (a stat nobody
/// recorded) all opponents are neutral.
pub fn calibrate_opponents(
    history: &[DailyRecord],
    stat: StatKind,
    halflife_days: f64,
) -> BTreeMap<TeamCode, OpponentMultiplier> {
    let rows: Vec<(GameDate, &TeamCode, f64)> = history
        .iter()
        .filter_map(|r| r.stats.get(stat).map(|v| (r.date, &r.opponent, v)))
        .collect();
    if rows.is_empty() {
        return BTreeMap::new();
    }

    let mut day_totals: BTreeMap<GameDate, (f64, usize)> = BTreeMap::new();
    for (date, _, value) in &rows {
        let entry = day_totals.entry(*date).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let dates: Vec<GameDate> = rows.iter().map(|(d, _, _)| *d).collect();
    let weights = recency_weights(&dates, halflife_days);

    // opponent -> (ratios, weights)
    let mut per_opponent: BTreeMap<&TeamCode, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for ((date, opponent, value), w) in rows.iter().zip(&weights) {
        let (sum, count) = day_totals[date];
        let day_mean = (sum / count as f64).max(DAY_MEAN_FLOOR);

        let entry = per_opponent.entry(opponent).or_default();
        entry.0.push(value / day_mean);
        entry.1.push(*w);
    }

    let raw: Vec<(&TeamCode, f64, usize)> = per_opponent
        .into_iter()
        .map(|(opponent, (ratios, weights))| {
            let value = weighted_mean(&ratios, &weights).unwrap_or(1.0);
            (opponent, value, ratios.len())
        })
        .collect();

    let mean = raw.iter().map(|(_, m, _)| m).sum::<f64>() / raw.len() as f64;
    let normalize = |m: f64| {
        if mean.is_finite() && mean > DAY_MEAN_FLOOR {
            m / mean
        } else {
            1.0
        }
    };

    raw.into_iter()
        .map(|(opponent, value, samples)| {
            (
                opponent.clone(),
                OpponentMultiplier {
                    opponent: opponent.clone(),
                    stat,
                    multiplier: normalize(value),
                    samples,
                },
            )
        })
        .collect()
}
