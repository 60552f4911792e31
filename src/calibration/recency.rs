//! Exponential recency weights anchored to the newest date in a row set.

use crate::cli::types::GameDate;
use std::collections::BTreeMap;

/// Default halflife, in distinct-date ranks.
pub const DEFAULT_HALFLIFE_DAYS: f64 = 10.0;

/// Convert a row set's dates into normalized decay weights.
///
/// Each distinct date gets a dense rank (oldest = 0). A row on rank `r` with
/// newest rank `R` gets `0.5 ^ ((R - r) / halflife_days)`, and the row weights
/// are then scaled to sum to 1. Rows sharing a date share a magnitude.
///
/// Returns an empty vector for empty input. A non-positive or non-finite
/// halflife degrades to uniform weights.
pub fn recency_weights(dates: &[GameDate], halflife_days: f64) -> Vec<f64> {
    if dates.is_empty() {
        return Vec::new();
    }

    let uniform = || vec![1.0 / dates.len() as f64; dates.len()];
    if !(halflife_days.is_finite() && halflife_days > 0.0) {
        return uniform();
    }

    let ranks: BTreeMap<GameDate, usize> = {
        let mut distinct: Vec<GameDate> = dates.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        distinct.into_iter().enumerate().map(|(r, d)| (d, r)).collect()
    };
    let max_rank = ranks.len() - 1;

    let raw: Vec<f64> = dates
        .iter()
        .map(|date| {
            let age = (max_rank - ranks[date]) as f64;
            0.5_f64.powf(age / halflife_days)
        })
        .collect();

    let total: f64 = raw.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return uniform();
    }
    raw.into_iter().map(|w| w / total).collect()
}

/// `Σ w·v / Σ w`, or `None` when the weights carry no mass.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Option<f64> {
    let (num, den) = values
        .iter()
        .zip(weights)
        .fold((0.0, 0.0), |(num, den), (v, w)| (num + v * w, den + w));
    (den > 0.0).then(|| num / den)
}
