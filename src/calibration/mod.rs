//! History-derived calibration
//!
//! Everything here is a pure function of the history and the configuration:
//! - `recency`: exponential date weights
//! - `rates`: recency-weighted per-player expectations
//! - `opponents`: league-normalized opponent multipliers
//! - `blend`: convex blend of raw feed and calibrated estimate
//!
//! A [`Calibration`] is rebuilt from the full history after every upload and
//! never mutated afterwards.

pub mod blend;
pub mod opponents;
pub mod rates;
pub mod recency;

#[cfg(test)]
mod tests;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::cli::types::{GameDate, PlayerId, StatKind, TeamCode};
use crate::core::{BlendWeights, EngineConfig};
use crate::storage::{DailyRecord, ProjectionRow, StatLine};

pub use blend::{blend, blend_line};
pub use opponents::{calibrate_opponents, OpponentMultiplier, DAY_MEAN_FLOOR};
pub use rates::{estimate_player_rates, PlayerRate};
pub use recency::{recency_weights, weighted_mean, DEFAULT_HALFLIFE_DAYS};

/// Sizes of the per-stat tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub stat: StatKind,
    pub players: usize,
    pub opponents: usize,
}

/// Diagnostics describing one calibration build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSummary {
    pub rows_in_history: usize,
    pub distinct_players: usize,
    pub distinct_dates: usize,
    pub latest_date: Option<GameDate>,
    pub halflife_days: f64,
    pub blend: BlendWeights,
    pub scale_by_minutes: bool,
    pub stats: Vec<StatSummary>,
}

/// Player rates and opponent multipliers for every base stat
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub player_rates: BTreeMap<StatKind, BTreeMap<PlayerId, PlayerRate>>,
    pub opponent_multipliers: BTreeMap<StatKind, BTreeMap<TeamCode, OpponentMultiplier>>,
    pub summary: CalibrationSummary,
}

impl Calibration {
    /// Build from the full history. Stats are calibrated in parallel; the
    /// results land in ordered maps so the output does not depend on
    /// scheduling.
    pub fn build(history: &[DailyRecord], config: &EngineConfig) -> Self {
        let halflife = config.halflife_days;

        let per_stat: Vec<_> = StatKind::BASE[..]
            .par_iter()
            .map(|&stat| {
                let rates = estimate_player_rates(history, stat, halflife);
                let multipliers = calibrate_opponents(history, stat, halflife);
                (stat, rates, multipliers)
            })
            .collect();

        let mut player_rates = BTreeMap::new();
        let mut opponent_multipliers = BTreeMap::new();
        let mut stats = Vec::with_capacity(per_stat.len());
        for (stat, rates, multipliers) in per_stat {
            debug!(
                %stat,
                players = rates.len(),
                opponents = multipliers.len(),
                "calibrated stat"
            );
            stats.push(StatSummary {
                stat,
                players: rates.len(),
                opponents: multipliers.len(),
            });
            if !rates.is_empty() {
                player_rates.insert(stat, rates);
            }
            if !multipliers.is_empty() {
                opponent_multipliers.insert(stat, multipliers);
            }
        }

        let distinct_players: BTreeSet<&PlayerId> = history.iter().map(|r| &r.player_id).collect();
        let distinct_dates: BTreeSet<GameDate> = history.iter().map(|r| r.date).collect();

        Self {
            player_rates,
            opponent_multipliers,
            summary: CalibrationSummary {
                rows_in_history: history.len(),
                distinct_players: distinct_players.len(),
                distinct_dates: distinct_dates.len(),
                latest_date: distinct_dates.iter().next_back().copied(),
                halflife_days: halflife,
                blend: config.blend,
                scale_by_minutes: config.scale_by_minutes,
                stats,
            },
        }
    }

    pub fn player_rate(&self, player: &PlayerId, stat: StatKind) -> Option<&PlayerRate> {
        self.player_rates.get(&stat)?.get(player)
    }

    pub fn opponent_multiplier(&self, opponent: &TeamCode, stat: StatKind) -> Option<f64> {
        self.opponent_multipliers
            .get(&stat)?
            .get(opponent)
            .map(|m| m.multiplier)
    }

    /// The player estimate fed into the blend for one stat.
    fn player_estimate(&self, player: &PlayerId, stat: StatKind, minutes: f64) -> Option<f64> {
        let rate = self.player_rate(player, stat)?;
        match rate.rate_per_minute {
            Some(per_minute) if self.summary.scale_by_minutes && minutes > 0.0 => {
                Some(per_minute * minutes)
            }
            _ => Some(rate.expected_value),
        }
    }

    /// Blend a raw stat line for one player against one opponent.
    pub fn project(
        &self,
        player: &PlayerId,
        opponent: &TeamCode,
        minutes: f64,
        raw: &StatLine,
    ) -> StatLine {
        blend_line(
            raw,
            |stat| self.player_estimate(player, stat, minutes),
            |stat| self.opponent_multiplier(opponent, stat),
            self.summary.blend,
        )
    }

    /// Blend a stored feed row into a projection row.
    pub fn project_record(&self, record: &DailyRecord) -> ProjectionRow {
        ProjectionRow {
            date: record.date,
            player_id: record.player_id.clone(),
            player_name: record.player_name.clone(),
            team: record.team.clone(),
            opponent: record.opponent.clone(),
            minutes: record.minutes,
            stats: self.project(
                &record.player_id,
                &record.opponent,
                record.minutes,
                &record.stats,
            ),
        }
    }
}
