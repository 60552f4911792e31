//! Policy knobs for calibration and usage redistribution.
//!
//! Every heuristic constant the engine uses lives here with a named field.
//! The whole tree deserializes from `config.json` in the data directory;
//! missing fields fall back to the defaults below.

use crate::cli::types::StatKind;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use super::files::try_read_to_string;

/// Tolerance for the blend-weight sum check.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Recency halflife in distinct-date ranks.
    pub halflife_days: f64,

    pub blend: BlendWeights,

    /// When true, the calibrated estimate is `rate_per_minute * minutes`
    /// instead of the recency-weighted expected value.
    pub scale_by_minutes: bool,

    pub redistribution: RedistributionConfig,

    pub assist_override: AssistOverrideConfig,
}

/// Convex weights between the raw feed value and the calibrated estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    /// Weight on the day's raw feed value.
    pub etr: f64,
    /// Weight on the calibrated (rate x opponent) value.
    pub cal: f64,
}

/// Generic and historical-pattern redistribution policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedistributionConfig {
    /// Typical minutes at or above which a player's absence is significant.
    pub significance_minutes: f64,

    /// Projected minutes an active player needs to receive vacated production.
    pub eligible_minutes: f64,

    /// Share of the allocation weight driven by projected-minute share.
    pub minutes_share_weight: f64,

    /// Share of the allocation weight driven by minutes above a player's norm.
    pub role_increase_weight: f64,

    /// Conversion of vacated production for established rotation players.
    pub role_expansion_efficiency: f64,

    /// Conversion for reserves stepping into a role they have not held.
    pub replacement_efficiency: f64,

    /// Multiplier ceiling when no learned per-team ceiling exists.
    pub default_team_ceiling: f64,

    /// Lower clamp for historical-pattern multipliers.
    pub pattern_floor: f64,

    /// Upper clamp for historical-pattern multipliers.
    pub pattern_ceiling: f64,

    /// Pattern multipliers closer to 1.0 than this are ignored.
    pub pattern_min_deviation: f64,

    /// Stats a historical-pattern multiplier is applied to.
    pub pattern_stats: Vec<StatKind>,
}

/// Reallocation of a high-usage playmaker's assists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistOverrideConfig {
    pub min_typical_assists: f64,
    pub min_typical_minutes: f64,

    /// Share of vacated assists going to the active player with the highest
    /// typical assists.
    pub primary_share: f64,
    /// Share going to the second-highest.
    pub secondary_share: f64,

    pub assist_efficiency: f64,
    pub points_efficiency: f64,
    pub rebounds_efficiency: f64,

    pub assist_cap: f64,
    pub points_cap: f64,
    pub rebounds_cap: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            halflife_days: 10.0,
            blend: BlendWeights::default(),
            scale_by_minutes: false,
            redistribution: RedistributionConfig::default(),
            assist_override: AssistOverrideConfig::default(),
        }
    }
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self { etr: 0.60, cal: 0.40 }
    }
}

impl Default for RedistributionConfig {
    fn default() -> Self {
        Self {
            significance_minutes: 20.0,
            eligible_minutes: 15.0,
            minutes_share_weight: 0.80,
            role_increase_weight: 0.20,
            role_expansion_efficiency: 0.60,
            replacement_efficiency: 0.70,
            default_team_ceiling: 1.40,
            pattern_floor: 0.90,
            pattern_ceiling: 1.50,
            pattern_min_deviation: 0.03,
            pattern_stats: vec![
                StatKind::Points,
                StatKind::Rebounds,
                StatKind::Assists,
                StatKind::Steals,
                StatKind::Blocks,
                StatKind::ThreesMade,
            ],
        }
    }
}

impl Default for AssistOverrideConfig {
    fn default() -> Self {
        Self {
            min_typical_assists: 6.0,
            min_typical_minutes: 20.0,
            primary_share: 0.45,
            secondary_share: 0.25,
            assist_efficiency: 0.70,
            points_efficiency: 0.55,
            rebounds_efficiency: 0.60,
            assist_cap: 1.50,
            points_cap: 1.35,
            rebounds_cap: 1.30,
        }
    }
}

impl BlendWeights {
    pub fn validate(&self) -> Result<()> {
        let in_range = (0.0..=1.0).contains(&self.etr) && (0.0..=1.0).contains(&self.cal);
        if !in_range || ((self.etr + self.cal) - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::InvalidBlendWeights {
                etr: self.etr,
                cal: self.cal,
            });
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Check the invariants the engine relies on. Called once at startup.
    pub fn validate(&self) -> Result<()> {
        self.blend.validate()?;

        if !(self.halflife_days.is_finite() && self.halflife_days > 0.0) {
            return Err(invalid(format!(
                "halflife_days must be positive, got {}",
                self.halflife_days
            )));
        }

        let r = &self.redistribution;
        if r.pattern_floor > r.pattern_ceiling {
            return Err(invalid(format!(
                "pattern_floor {} exceeds pattern_ceiling {}",
                r.pattern_floor, r.pattern_ceiling
            )));
        }
        if ((r.minutes_share_weight + r.role_increase_weight) - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(invalid(format!(
                "minutes_share_weight + role_increase_weight must be 1.0, got {}",
                r.minutes_share_weight + r.role_increase_weight
            )));
        }

        let a = &self.assist_override;
        if a.primary_share + a.secondary_share > 1.0 {
            return Err(invalid(format!(
                "primary_share + secondary_share must not exceed 1.0, got {}",
                a.primary_share + a.secondary_share
            )));
        }

        let caps = [
            ("default_team_ceiling", r.default_team_ceiling),
            ("pattern_ceiling", r.pattern_ceiling),
            ("assist_cap", a.assist_cap),
            ("points_cap", a.points_cap),
            ("rebounds_cap", a.rebounds_cap),
        ];
        if let Some((name, value)) = caps.iter().find(|(_, v)| *v < 1.0) {
            return Err(invalid(format!("{} must be at least 1.0, got {}", name, value)));
        }

        Ok(())
    }

    /// Load `config.json` if it exists, otherwise the defaults. The result is
    /// validated either way.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let config = match try_read_to_string(path) {
            Some(contents) => {
                debug!(path = %path.display(), "loading engine config");
                serde_json::from_str::<EngineConfig>(&contents)?
            }
            None => {
                if path.exists() {
                    warn!(path = %path.display(), "config file unreadable, using defaults");
                }
                EngineConfig::default()
            }
        };
        config.validate()?;
        Ok(config)
    }
}

fn invalid(message: String) -> EngineError {
    EngineError::InvalidConfig { message }
}
