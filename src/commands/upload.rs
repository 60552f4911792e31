//! Upload command implementation

use std::path::{Path, PathBuf};

use crate::{cli::types::GameDate, ingest::read_feed_file, Result};

use super::open_engine;

/// Parameters for the upload command
#[derive(Debug, Clone)]
pub struct UploadParams {
    pub data_dir: Option<PathBuf>,
    pub csv: PathBuf,
    /// Snapshot date; today when absent.
    pub date: Option<GameDate>,
    pub redistribute: bool,
    pub as_json: bool,
}

/// Handle the upload command: merge, retrain, persist artifacts.
pub fn handle_upload(params: UploadParams) -> Result<()> {
    let date = params.date.unwrap_or_default();
    let rows = read_feed_file(&params.csv)?;

    let (paths, mut engine) = open_engine(params.data_dir)?;
    let report = engine.append(rows, date, params.redistribute)?;

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_upload_summary(&params.csv, paths.root(), &report);
    Ok(())
}

fn print_upload_summary(csv: &Path, data_dir: &Path, report: &crate::engine::UploadReport) {
    let outcome = &report.outcome;
    println!("✓ Uploaded {} for {}", csv.display(), outcome.date);
    println!(
        "  rows accepted: {}, rejected: {}, history size: {}",
        outcome.rows_accepted, outcome.rows_rejected, outcome.history_size
    );
    for rejection in &outcome.rejections {
        println!("  - {}", rejection.reason);
    }
    println!(
        "  calibrated {} players over {} dates",
        report.summary.distinct_players, report.summary.distinct_dates
    );
    match report.projected_date {
        Some(projected) => println!(
            "  stored {} projections for {} ({} adjusted for absences)",
            report.projections, projected, report.adjusted_players
        ),
        None => println!("  no projections stored"),
    }
    println!("  data directory: {}", data_dir.display());
}
