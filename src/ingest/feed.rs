//! Daily feed and roster slate CSV readers.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::cli::types::{PlayerId, StatKind, TeamCode};
use crate::error::{EngineError, Result};
use crate::redistribution::RosterSlate;
use crate::storage::{IncomingRow, StatLine};

use super::aliases::{canonical_header, Column, ColumnIndex};

/// Read an uploaded feed into unvalidated rows.
///
/// Player, team and opponent headers are required; a file without one of
/// them fails as a whole. Everything else is optional per row and left for
/// [`IncomingRow::into_record`] to judge. `PRA` columns are accepted but not
/// carried, since PRA is always recomputed.
pub fn read_feed<R: Read>(rdr: R) -> Result<Vec<IncomingRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let index = ColumnIndex::resolve(reader.headers()?);
    require(&index, &[Column::Player, Column::Team, Column::Opponent])?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut stats = StatLine::new();
        for stat in StatKind::BASE {
            if let Some(value) = index.number(&record, Column::Stat(stat)) {
                stats.set(stat, value);
            }
        }
        rows.push(IncomingRow {
            player: index.text(&record, Column::Player),
            team: index.text(&record, Column::Team),
            opponent: index.text(&record, Column::Opponent),
            minutes: index.number(&record, Column::Minutes),
            stats,
        });
    }
    debug!(rows = rows.len(), "read feed");
    Ok(rows)
}

pub fn read_feed_file(path: &Path) -> Result<Vec<IncomingRow>> {
    read_feed(File::open(path)?)
}

/// Read a roster slate: player, team and projected minutes per row, grouped
/// into one slate per team.
///
/// Rows without a player, a team or positive minutes are skipped; a player
/// listed twice for a team keeps the later minutes.
pub fn read_slates<R: Read>(rdr: R) -> Result<Vec<RosterSlate>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let index = ColumnIndex::resolve(reader.headers()?);
    require(&index, &[Column::Player, Column::Team, Column::Minutes])?;

    let mut slates: BTreeMap<TeamCode, RosterSlate> = BTreeMap::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let player = index.text(&record, Column::Player).map(|p| PlayerId::new(&p));
        let team = index.text(&record, Column::Team).map(|t| TeamCode::new(&t));
        let minutes = index
            .number(&record, Column::Minutes)
            .filter(|m| *m > 0.0);

        match (player, team, minutes) {
            (Some(player), Some(team), Some(minutes)) if !player.is_empty() => {
                slates
                    .entry(team.clone())
                    .or_insert_with(|| RosterSlate::new(team))
                    .insert(player, minutes);
            }
            _ => debug!(row, "skipping incomplete slate row"),
        }
    }
    Ok(slates.into_values().collect())
}

pub fn read_slates_file(path: &Path) -> Result<Vec<RosterSlate>> {
    read_slates(File::open(path)?)
}

fn require(index: &ColumnIndex, columns: &[Column]) -> Result<()> {
    match columns.iter().find(|c| !index.contains(**c)) {
        Some(column) => Err(EngineError::MissingColumn {
            column: canonical_header(*column).to_string(),
        }),
        None => Ok(()),
    }
}
