//! Minute-share redistribution used when no historical pattern applies.

use std::collections::BTreeMap;
use tracing::debug;

use crate::cli::types::PlayerId;
use crate::core::RedistributionConfig;
use crate::storage::StatLine;

use super::{AdjustmentMap, RosterSlate, TypicalRole};

/// Baselines below this are treated as zero.
const BASELINE_EPSILON: f64 = 1e-9;

/// One active player's claim on the pool
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub player_id: PlayerId,
    /// Fraction of the pool this player receives. Sums to 1 across players.
    pub weight: f64,
    pub efficiency: f64,
}

/// Split the pool across active players with enough projected minutes.
///
/// Weight is `minutes_share_weight * minute share + role_increase_weight *
/// increase share`, where the increase is projected minutes above the
/// player's typical minutes. With no increase anywhere the weight is the
/// minute share alone. Established rotation players convert at the
/// role-expansion efficiency, reserves at the replacement efficiency.
pub fn allocations(
    baseline: &BTreeMap<PlayerId, TypicalRole>,
    slate: &RosterSlate,
    policy: &RedistributionConfig,
) -> Vec<Allocation> {
    let eligible: Vec<(&PlayerId, f64, f64)> = slate
        .players
        .iter()
        .filter(|(_, minutes)| minutes.is_finite() && **minutes >= policy.eligible_minutes)
        .map(|(player, minutes)| {
            let typical_minutes = baseline.get(player).map_or(0.0, |r| r.minutes);
            (player, *minutes, (minutes - typical_minutes).max(0.0))
        })
        .collect();

    let total_minutes: f64 = eligible.iter().map(|(_, m, _)| m).sum();
    if total_minutes <= 0.0 {
        return Vec::new();
    }
    let total_increase: f64 = eligible.iter().map(|(_, _, inc)| inc).sum();

    eligible
        .into_iter()
        .map(|(player, minutes, increase)| {
            let minute_share = minutes / total_minutes;
            let weight = if total_increase > 0.0 {
                policy.minutes_share_weight * minute_share
                    + policy.role_increase_weight * (increase / total_increase)
            } else {
                minute_share
            };
            let established = baseline
                .get(player)
                .is_some_and(|r| r.minutes >= policy.significance_minutes);
            let efficiency = if established {
                policy.role_expansion_efficiency
            } else {
                policy.replacement_efficiency
            };
            Allocation {
                player_id: player.clone(),
                weight,
                efficiency,
            }
        })
        .collect()
}

/// Generic multipliers: `1 + pool * weight * efficiency / typical`, capped at
/// `ceiling`. Stats with no positive typical baseline are skipped.
pub fn generic_fallback(
    pool: &StatLine,
    baseline: &BTreeMap<PlayerId, TypicalRole>,
    slate: &RosterSlate,
    policy: &RedistributionConfig,
    ceiling: f64,
) -> AdjustmentMap {
    let mut out = AdjustmentMap::new();

    for allocation in allocations(baseline, slate, policy) {
        let Some(role) = baseline.get(&allocation.player_id) else {
            debug!(player = %allocation.player_id, "no baseline, skipping");
            continue;
        };

        let stats: BTreeMap<_, _> = pool
            .iter()
            .filter_map(|(stat, vacated)| {
                let typical = role.stat(stat).filter(|t| *t > BASELINE_EPSILON)?;
                let share = vacated * allocation.weight * allocation.efficiency;
                Some((stat, (1.0 + share / typical).min(ceiling)))
            })
            .collect();

        if !stats.is_empty() {
            out.insert(allocation.player_id, stats);
        }
    }
    out
}
