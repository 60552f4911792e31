//! The one table of accepted column names.

use crate::cli::types::StatKind;
use csv::StringRecord;
use std::collections::HashMap;

/// Canonical feed column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Player,
    Team,
    Opponent,
    Minutes,
    Stat(StatKind),
}

/// `canonical column -> accepted header spellings`, matched case-insensitively
/// after trimming. Earlier spellings win when a file carries several.
pub const ALIASES: &[(Column, &[&str])] = &[
    (Column::Player, &["player", "name", "player name", "player_name"]),
    (Column::Team, &["team", "tm"]),
    (Column::Opponent, &["opp", "opponent", "vs"]),
    (Column::Minutes, &["minutes", "min", "mins", "projected minutes"]),
    (Column::Stat(StatKind::Points), &["pts", "points"]),
    (Column::Stat(StatKind::Rebounds), &["reb", "rebs", "rebounds"]),
    (Column::Stat(StatKind::Assists), &["ast", "assists"]),
    (
        Column::Stat(StatKind::ThreesMade),
        &[
            "3pm",
            "three_pm",
            "3pt_made",
            "3pt",
            "threes",
            "three pointers made",
        ],
    ),
    (Column::Stat(StatKind::Steals), &["stl", "steals"]),
    (Column::Stat(StatKind::Blocks), &["blk", "blocks"]),
    (Column::Stat(StatKind::Turnovers), &["to", "tov", "turnovers"]),
    (Column::Stat(StatKind::Pra), &["pra", "pts+reb+ast"]),
];

/// Header positions of every recognised column in one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnIndex(HashMap<Column, usize>);

impl ColumnIndex {
    /// Resolve a header row against [`ALIASES`].
    pub fn resolve(headers: &StringRecord) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

        let mut index = HashMap::new();
        for (column, aliases) in ALIASES {
            let found = aliases
                .iter()
                .find_map(|alias| normalized.iter().position(|h| h == alias));
            if let Some(position) = found {
                index.insert(*column, position);
            }
        }
        Self(index)
    }

    pub fn position(&self, column: Column) -> Option<usize> {
        self.0.get(&column).copied()
    }

    pub fn contains(&self, column: Column) -> bool {
        self.0.contains_key(&column)
    }

    /// Trimmed, non-empty text in `column`.
    pub fn text(&self, record: &StringRecord, column: Column) -> Option<String> {
        let raw = record.get(self.position(column)?)?.trim();
        (!raw.is_empty()).then(|| raw.to_string())
    }

    /// Numeric value in `column`. Blank or unparseable cells are `None`.
    pub fn number(&self, record: &StringRecord, column: Column) -> Option<f64> {
        let raw = record.get(self.position(column)?)?.trim();
        raw.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Canonical header used when writing a column back out.
pub fn canonical_header(column: Column) -> &'static str {
    match column {
        Column::Player => "Player",
        Column::Team => "Team",
        Column::Opponent => "Opp",
        Column::Minutes => "Minutes",
        Column::Stat(stat) => stat.label(),
    }
}
