//! Statistic kinds tracked by the projection feed.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Box-score statistics carried by a daily projection row.
///
/// `Pra` is derived (points + rebounds + assists). It is never stored or
/// calibrated on its own; it is recomputed from its components after every
/// adjustment.
///
/// # Examples
///
/// ```rust
/// use daily_proj::StatKind;
///
/// assert_eq!("3pm".parse::<StatKind>().unwrap(), StatKind::ThreesMade);
/// assert_eq!(StatKind::Points.to_string(), "PTS");
/// assert!(StatKind::Pra.is_derived());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatKind {
    #[serde(rename = "PTS")]
    Points,
    #[serde(rename = "REB")]
    Rebounds,
    #[serde(rename = "AST")]
    Assists,
    #[serde(rename = "3PM")]
    ThreesMade,
    #[serde(rename = "STL")]
    Steals,
    #[serde(rename = "BLK")]
    Blocks,
    #[serde(rename = "TO")]
    Turnovers,
    #[serde(rename = "PRA")]
    Pra,
}

impl StatKind {
    /// Every stat, derived ones included, in display order.
    pub const ALL: [StatKind; 8] = [
        StatKind::Points,
        StatKind::Rebounds,
        StatKind::Assists,
        StatKind::ThreesMade,
        StatKind::Steals,
        StatKind::Blocks,
        StatKind::Turnovers,
        StatKind::Pra,
    ];

    /// Stats that are stored and calibrated directly.
    pub const BASE: [StatKind; 7] = [
        StatKind::Points,
        StatKind::Rebounds,
        StatKind::Assists,
        StatKind::ThreesMade,
        StatKind::Steals,
        StatKind::Blocks,
        StatKind::Turnovers,
    ];

    pub fn is_derived(&self) -> bool {
        matches!(self, StatKind::Pra)
    }

    /// Short feed label, also used as the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            StatKind::Points => "PTS",
            StatKind::Rebounds => "REB",
            StatKind::Assists => "AST",
            StatKind::ThreesMade => "3PM",
            StatKind::Steals => "STL",
            StatKind::Blocks => "BLK",
            StatKind::Turnovers => "TO",
            StatKind::Pra => "PRA",
        }
    }

    /// SQLite column holding this stat.
    pub fn column_name(&self) -> &'static str {
        match self {
            StatKind::Points => "points",
            StatKind::Rebounds => "rebounds",
            StatKind::Assists => "assists",
            StatKind::ThreesMade => "threes_made",
            StatKind::Steals => "steals",
            StatKind::Blocks => "blocks",
            StatKind::Turnovers => "turnovers",
            StatKind::Pra => "pra",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for StatKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PTS" | "POINTS" => Ok(StatKind::Points),
            "REB" | "REBOUNDS" => Ok(StatKind::Rebounds),
            "AST" | "ASSISTS" => Ok(StatKind::Assists),
            "3PM" | "THREES" | "THREES_MADE" | "THREE POINTERS MADE" => Ok(StatKind::ThreesMade),
            "STL" | "STEALS" => Ok(StatKind::Steals),
            "BLK" | "BLOCKS" => Ok(StatKind::Blocks),
            "TO" | "TOV" | "TURNOVERS" => Ok(StatKind::Turnovers),
            "PRA" => Ok(StatKind::Pra),
            _ => Err(EngineError::InvalidStat {
                stat: s.to_string(),
            }),
        }
    }
}
