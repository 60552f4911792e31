//! Library and status command implementations

use serde::Serialize;
use std::path::PathBuf;

use crate::{
    cli::types::GameDate,
    storage::{DateSummary, HistoryStore},
    Result,
};

use super::open_engine;

/// Dates shown by the status command.
const RECENT_DATES: usize = 5;

/// List stored dates with row counts, newest first.
pub fn handle_library(data_dir: Option<PathBuf>, as_json: bool) -> Result<()> {
    let (_, engine) = open_engine(data_dir)?;
    let dates = engine.store().date_summaries()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&dates)?);
        return Ok(());
    }

    if dates.is_empty() {
        println!("No dates stored yet.");
        return Ok(());
    }
    println!("{:<12} {:>6}", "Date", "Rows");
    for summary in &dates {
        println!("{:<12} {:>6}", summary.date.to_string(), summary.rows);
    }
    Ok(())
}

/// Health snapshot of a data directory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub data_dir: PathBuf,
    pub history_size: usize,
    pub recent_dates: Vec<DateSummary>,
    pub artifacts_as_of: Option<GameDate>,
}

impl StatusReport {
    pub fn collect(data_dir: PathBuf, store: &HistoryStore) -> Result<Self> {
        let mut recent_dates = store.date_summaries()?;
        recent_dates.truncate(RECENT_DATES);
        Ok(Self {
            data_dir,
            history_size: store.len()?,
            recent_dates,
            artifacts_as_of: store.latest_artifact_date()?,
        })
    }

    pub fn has_artifacts(&self) -> bool {
        self.artifacts_as_of.is_some()
    }
}

pub fn handle_status(data_dir: Option<PathBuf>, as_json: bool) -> Result<()> {
    let (paths, engine) = open_engine(data_dir)?;
    let report = StatusReport::collect(paths.root().to_path_buf(), engine.store())?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Data directory: {}", report.data_dir.display());
    println!("History rows:   {}", report.history_size);
    let recent = report
        .recent_dates
        .iter()
        .map(|d| d.date.to_string())
        .collect::<Vec<_>>();
    println!(
        "Recent dates:   {}",
        if recent.is_empty() {
            "-".to_string()
        } else {
            recent.join(", ")
        }
    );
    match report.artifacts_as_of {
        Some(as_of) => println!("Artifacts:      yes (as of {})", as_of),
        None => println!("Artifacts:      no"),
    }
    Ok(())
}
