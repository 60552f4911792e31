//! Convex blend of the raw feed value with the calibrated estimate.

use crate::cli::types::StatKind;
use crate::core::BlendWeights;
use crate::storage::StatLine;

/// Blend one stat.
///
/// The calibrated value is `player_estimate * opponent_multiplier`, where a
/// missing estimate falls back to the raw value and a missing multiplier to
/// 1.0. The result is `etr * raw + cal * calibrated`.
pub fn blend(
    raw_value: f64,
    player_estimate: Option<f64>,
    opponent_multiplier: Option<f64>,
    weights: BlendWeights,
) -> f64 {
    let calibrated = player_estimate.unwrap_or(raw_value) * opponent_multiplier.unwrap_or(1.0);
    weights.etr * raw_value + weights.cal * calibrated
}

/// Blend every base stat present on `raw`.
///
/// Derived stats are not blended; `StatLine` recomputes them from the
/// blended components.
pub fn blend_line<E, M>(
    raw: &StatLine,
    estimate: E,
    multiplier: M,
    weights: BlendWeights,
) -> StatLine
where
    E: Fn(StatKind) -> Option<f64>,
    M: Fn(StatKind) -> Option<f64>,
{
    let mut out = StatLine::new();
    for (stat, raw_value) in raw.iter() {
        out.set(
            stat,
            blend(raw_value, estimate(stat), multiplier(stat), weights),
        );
    }
    out
}
