//! Command implementations for the daily projection CLI

pub mod calibrate;
pub mod export;
pub mod library;
pub mod players;
pub mod project;
pub mod upload;
pub mod usage;


use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{
    cli::types::StatKind,
    core::{default_data_dir, DataPaths},
    engine::CalibrationEngine,
    storage::StatLine,
    Result, DATA_DIR_ENV_VAR,
};

/// Resolve the data directory: explicit flag, then `DAILY_PROJ_DATA_DIR`,
/// then the platform default.
pub fn resolve_data_dir(data_dir: Option<PathBuf>) -> PathBuf {
    data_dir
        .or_else(|| {
            std::env::var(DATA_DIR_ENV_VAR)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(default_data_dir)
}

/// Open the engine for a resolved data directory.
pub fn open_engine(data_dir: Option<PathBuf>) -> Result<(DataPaths, CalibrationEngine)> {
    let paths = DataPaths::new(resolve_data_dir(data_dir));
    let engine = CalibrationEngine::open(&paths)?;
    Ok((paths, engine))
}

/// CSV destination: a file when given, stdout otherwise.
pub(crate) fn csv_writer(out: Option<&Path>) -> Result<csv::Writer<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Box::new(File::create(path)?)
        }
        None => Box::new(io::stdout()),
    };
    Ok(csv::Writer::from_writer(sink))
}

/// Stat cells in [`StatKind::ALL`] order; missing stats are blank.
pub(crate) fn stat_cells(stats: &StatLine) -> Vec<String> {
    StatKind::ALL
        .iter()
        .map(|stat| stats.get(*stat).map(format_value).unwrap_or_default())
        .collect()
}

/// Stat headers in [`StatKind::ALL`] order.
pub(crate) fn stat_headers() -> Vec<String> {
    StatKind::ALL.iter().map(|s| s.label().to_string()).collect()
}

/// Round for display and export.
pub(crate) fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}

/// One-line text rendering of a stat line.
pub(crate) fn describe_line(stats: &StatLine) -> String {
    StatKind::ALL
        .iter()
        .filter_map(|stat| stats.get(*stat).map(|v| format!("{} {}", stat, format_value(v))))
        .collect::<Vec<_>>()
        .join(", ")
}
