//! CSV export command implementations

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{
    cli::types::GameDate,
    storage::{DailyRecord, ProjectionRow},
    Result,
};

use super::{csv_writer, format_value, open_engine, stat_cells, stat_headers};

/// Write one stored date's rows as CSV.
pub fn handle_export_date(
    data_dir: Option<PathBuf>,
    date: GameDate,
    out: Option<PathBuf>,
) -> Result<()> {
    let (_, engine) = open_engine(data_dir)?;
    let records = engine.store().records_for_date(date)?;
    if records.is_empty() {
        eprintln!("No rows stored for {}", date);
        return Ok(());
    }

    let mut writer = csv_writer(out.as_deref())?;
    write_records(&mut writer, &records)?;
    writer.flush()?;
    report_written(out.as_deref(), records.len());
    Ok(())
}

/// Write the latest stored projections as CSV.
pub fn handle_export_latest(data_dir: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let (_, engine) = open_engine(data_dir)?;
    let Some((as_of, projections)) = engine.stored_projections()? else {
        eprintln!("No projections stored yet. Upload a feed first.");
        return Ok(());
    };

    let mut writer = csv_writer(out.as_deref())?;
    write_projections(&mut writer, &projections)?;
    writer.flush()?;
    if out.is_some() {
        println!("Projections as of {}", as_of);
    }
    report_written(out.as_deref(), projections.len());
    Ok(())
}

pub fn write_records<W: Write>(writer: &mut csv::Writer<W>, records: &[DailyRecord]) -> Result<()> {
    writer.write_record(header())?;
    for r in records {
        writer.write_record(row(
            r.date,
            &r.player_name,
            r.team.as_str(),
            r.opponent.as_str(),
            r.minutes,
            stat_cells(&r.stats),
        ))?;
    }
    Ok(())
}

pub fn write_projections<W: Write>(
    writer: &mut csv::Writer<W>,
    projections: &[ProjectionRow],
) -> Result<()> {
    writer.write_record(header())?;
    for p in projections {
        writer.write_record(row(
            p.date,
            &p.player_name,
            p.team.as_str(),
            p.opponent.as_str(),
            p.minutes,
            stat_cells(&p.stats),
        ))?;
    }
    Ok(())
}

fn header() -> Vec<String> {
    let mut cols: Vec<String> = ["Date", "Player", "Team", "Opp", "Minutes"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    cols.extend(stat_headers());
    cols
}

fn row(
    date: GameDate,
    player: &str,
    team: &str,
    opponent: &str,
    minutes: f64,
    stats: Vec<String>,
) -> Vec<String> {
    let mut cells = vec![
        date.to_string(),
        player.to_string(),
        team.to_string(),
        opponent.to_string(),
        format_value(minutes),
    ];
    cells.extend(stats);
    cells
}

fn report_written(out: Option<&Path>, rows: usize) {
    if let Some(path) = out {
        println!("✓ Wrote {} rows to {}", rows, path.display());
    }
}
