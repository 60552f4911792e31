//! Calibrate command implementation

use std::path::PathBuf;

use crate::{calibration::CalibrationSummary, Result};

use super::open_engine;

/// Rebuild the calibration from the stored history and print its summary.
pub fn handle_calibrate(data_dir: Option<PathBuf>, as_json: bool) -> Result<()> {
    let (_, engine) = open_engine(data_dir)?;
    let calibration = engine.rebuild_calibration()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&calibration.summary)?);
    } else {
        print_summary(&calibration.summary);
    }
    Ok(())
}

pub(crate) fn print_summary(summary: &CalibrationSummary) {
    if summary.rows_in_history == 0 {
        println!("History is empty. Upload a feed first.");
        return;
    }

    println!(
        "History: {} rows, {} players, {} dates (latest {})",
        summary.rows_in_history,
        summary.distinct_players,
        summary.distinct_dates,
        summary
            .latest_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Halflife: {} days, blend: {:.2} raw / {:.2} calibrated{}",
        summary.halflife_days,
        summary.blend.etr,
        summary.blend.cal,
        if summary.scale_by_minutes {
            ", minute-scaled"
        } else {
            ""
        }
    );
    println!();
    println!("{:<5} {:>8} {:>10}", "Stat", "Players", "Opponents");
    for stat in &summary.stats {
        println!(
            "{:<5} {:>8} {:>10}",
            stat.stat.label(),
            stat.players,
            stat.opponents
        );
    }
}
