//! Reallocation when a high-usage playmaker is out.

use std::collections::BTreeMap;
use tracing::debug;

use crate::cli::types::{PlayerId, StatKind};
use crate::core::EngineConfig;

use super::{AdjustmentMap, RosterSlate, TypicalRole};

/// Assist, point and rebound multipliers for active players when any missing
/// player averages at least the configured assists in significant minutes.
///
/// Vacated assists go to active ball-handlers by rank of typical assists:
/// the primary share to the top one, the secondary share to the next, the
/// rest across everyone else by minute share. Vacated points and rebounds
/// are spread across all eligible players by minute share. Each stat has its
/// own efficiency and cap.
pub fn assist_override(
    missing: &[&TypicalRole],
    baseline: &BTreeMap<PlayerId, TypicalRole>,
    slate: &RosterSlate,
    config: &EngineConfig,
) -> AdjustmentMap {
    let policy = &config.assist_override;
    let playmakers: Vec<&TypicalRole> = missing
        .iter()
        .copied()
        .filter(|m| {
            m.minutes >= policy.min_typical_minutes
                && m.stat(StatKind::Assists)
                    .is_some_and(|a| a >= policy.min_typical_assists)
        })
        .collect();
    if playmakers.is_empty() {
        return AdjustmentMap::new();
    }

    let vacated = |stat: StatKind| -> f64 { playmakers.iter().filter_map(|m| m.stat(stat)).sum() };
    let vacated_assists = vacated(StatKind::Assists);
    let vacated_points = vacated(StatKind::Points);
    let vacated_rebounds = vacated(StatKind::Rebounds);
    debug!(
        playmakers = playmakers.len(),
        vacated_assists, "assist override triggered"
    );

    // Active players with a baseline and enough minutes, best passers first.
    let mut candidates: Vec<(&TypicalRole, f64)> = slate
        .players
        .iter()
        .filter(|(_, minutes)| **minutes >= config.redistribution.eligible_minutes)
        .filter_map(|(player, minutes)| baseline.get(player).map(|role| (role, *minutes)))
        .collect();
    if candidates.is_empty() {
        return AdjustmentMap::new();
    }
    candidates.sort_by(|(a, _), (b, _)| {
        let a_ast = a.stat(StatKind::Assists).unwrap_or(0.0);
        let b_ast = b.stat(StatKind::Assists).unwrap_or(0.0);
        b_ast
            .total_cmp(&a_ast)
            .then_with(|| a.player_id.cmp(&b.player_id))
    });

    let total_minutes: f64 = candidates.iter().map(|(_, m)| m).sum();
    let others_minutes: f64 = candidates.iter().skip(2).map(|(_, m)| m).sum();
    let others_share = (1.0 - policy.primary_share - policy.secondary_share).max(0.0);

    let mut out = AdjustmentMap::new();
    for (rank, (role, minutes)) in candidates.iter().enumerate() {
        let assist_share = match rank {
            0 => policy.primary_share,
            1 => policy.secondary_share,
            _ if others_minutes > 0.0 => others_share * minutes / others_minutes,
            _ => 0.0,
        };
        let minute_share = if total_minutes > 0.0 {
            minutes / total_minutes
        } else {
            0.0
        };

        let mut stats = BTreeMap::new();
        let targets = [
            (
                StatKind::Assists,
                vacated_assists * assist_share,
                policy.assist_efficiency,
                policy.assist_cap,
            ),
            (
                StatKind::Points,
                vacated_points * minute_share,
                policy.points_efficiency,
                policy.points_cap,
            ),
            (
                StatKind::Rebounds,
                vacated_rebounds * minute_share,
                policy.rebounds_efficiency,
                policy.rebounds_cap,
            ),
        ];
        for (stat, gained, efficiency, cap) in targets {
            let Some(typical) = role.stat(stat).filter(|t| *t > 0.0) else {
                continue;
            };
            if gained <= 0.0 {
                continue;
            }
            stats.insert(stat, (1.0 + gained * efficiency / typical).min(cap));
        }

        if !stats.is_empty() {
            out.insert(role.player_id.clone(), stats);
        }
    }
    out
}
