//! Data models for the storage layer

use crate::cli::types::{GameDate, PlayerId, StatKind, TeamCode};
use crate::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Per-stat values for one player line.
///
/// Only base stats are held. `PRA` is always derived from points, rebounds
/// and assists on read, so it can never drift from its components.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatLine(BTreeMap<StatKind, f64>);

impl StatLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, stat: StatKind, value: f64) -> Self {
        self.set(stat, value);
        self
    }

    /// Set a base stat. Derived stats are ignored since they are recomputed.
    pub fn set(&mut self, stat: StatKind, value: f64) {
        if stat.is_derived() || !value.is_finite() {
            return;
        }
        self.0.insert(stat, value);
    }

    pub fn get(&self, stat: StatKind) -> Option<f64> {
        match stat {
            StatKind::Pra => self.pra(),
            _ => self.0.get(&stat).copied(),
        }
    }

    /// Points + rebounds + assists, when all three are present.
    pub fn pra(&self) -> Option<f64> {
        let pts = self.0.get(&StatKind::Points)?;
        let reb = self.0.get(&StatKind::Rebounds)?;
        let ast = self.0.get(&StatKind::Assists)?;
        Some(pts + reb + ast)
    }

    /// Present base stats in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f64)> + '_ {
        self.0.iter().map(|(stat, value)| (*stat, *value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All stats including the derived ones, for output.
    pub fn to_full_map(&self) -> BTreeMap<StatKind, f64> {
        let mut out = self.0.clone();
        if let Some(pra) = self.pra() {
            out.insert(StatKind::Pra, pra);
        }
        out
    }
}

impl Serialize for StatLine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_full_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StatLine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<StatKind, f64>::deserialize(deserializer)?;
        let mut line = StatLine::new();
        for (stat, value) in raw {
            line.set(stat, value);
        }
        Ok(line)
    }
}

/// One player's projected stat line for one date. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: GameDate,
    pub player_id: PlayerId,
    /// Name as it last appeared in a feed, for display.
    pub player_name: String,
    pub team: TeamCode,
    pub opponent: TeamCode,
    pub minutes: f64,
    pub stats: StatLine,
}

/// A column-normalized row from an uploaded feed, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomingRow {
    pub player: Option<String>,
    pub team: Option<String>,
    pub opponent: Option<String>,
    pub minutes: Option<f64>,
    pub stats: StatLine,
}

impl IncomingRow {
    /// Validate required fields and build the stored record.
    ///
    /// `row` is the zero-based index of this row within its batch, used only
    /// for reporting.
    pub fn into_record(self, row: usize, date: GameDate) -> Result<DailyRecord, ValidationError> {
        let player = self.player.ok_or(ValidationError::MissingField {
            row,
            field: "player",
        })?;
        let player_id = PlayerId::new(&player);
        if player_id.is_empty() {
            return Err(ValidationError::EmptyPlayer { row });
        }

        let team = required_code(self.team, row, "team")?;
        let opponent = required_code(self.opponent, row, "opponent")?;

        let minutes = self.minutes.ok_or(ValidationError::MissingField {
            row,
            field: "minutes",
        })?;
        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(ValidationError::InvalidMinutes { row, minutes });
        }

        Ok(DailyRecord {
            date,
            player_id,
            player_name: player.split_whitespace().collect::<Vec<_>>().join(" "),
            team,
            opponent,
            minutes,
            stats: self.stats,
        })
    }
}

fn required_code(
    value: Option<String>,
    row: usize,
    field: &'static str,
) -> Result<TeamCode, ValidationError> {
    value
        .map(|raw| TeamCode::new(&raw))
        .filter(|code| !code.is_empty())
        .ok_or(ValidationError::MissingField { row, field })
}

/// A dropped row and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub row: usize,
    pub reason: String,
}

impl From<&ValidationError> for Rejection {
    fn from(err: &ValidationError) -> Self {
        Self {
            row: err.row(),
            reason: err.to_string(),
        }
    }
}

/// Result of merging one snapshot into the history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppendOutcome {
    pub date: GameDate,
    pub rows_accepted: usize,
    pub rows_rejected: usize,
    pub history_size: usize,
    pub rejections: Vec<Rejection>,
}

/// Row count for one stored date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateSummary {
    pub date: GameDate,
    pub rows: usize,
}

/// A player's most recent team, from the newest date they appear on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub team: TeamCode,
    pub last_seen: GameDate,
    /// Stored rows across all dates.
    pub games: usize,
}

/// Final per-player projection for a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub date: GameDate,
    pub player_id: PlayerId,
    pub player_name: String,
    pub team: TeamCode,
    pub opponent: TeamCode,
    pub minutes: f64,
    pub stats: StatLine,
}
