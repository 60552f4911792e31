//! Entry point: parse CLI and dispatch to command handlers.

use anyhow::Context;
use clap::Parser;
use daily_proj::{
    cli::{Commands, DailyProj},
    commands::{
        calibrate::handle_calibrate,
        export::{handle_export_date, handle_export_latest},
        library::{handle_library, handle_status},
        players::{handle_players, PlayersParams},
        project::{handle_project, ProjectParams},
        upload::{handle_upload, UploadParams},
        usage::{handle_usage, UsageParams},
    },
};
use tracing_subscriber::EnvFilter;

/// Run the CLI.
fn main() -> anyhow::Result<()> {
    let app = DailyProj::parse();
    init_tracing(app.verbose);

    let data_dir = app.data_dir;
    match app.command {
        Commands::Upload {
            csv,
            date,
            redistribute,
            json,
        } => handle_upload(UploadParams {
            data_dir,
            csv: csv.clone(),
            date,
            redistribute,
            as_json: json,
        })
        .with_context(|| format!("upload of {} failed", csv.display()))?,

        Commands::Calibrate { json } => {
            handle_calibrate(data_dir, json).context("calibration failed")?
        }

        Commands::Project {
            player,
            opponent,
            minutes,
            raw,
            json,
        } => handle_project(ProjectParams {
            data_dir,
            player,
            opponent,
            minutes,
            raw: raw.to_stat_line(),
            as_json: json,
        })
        .context("projection failed")?,

        Commands::Usage { slate, team, json } => handle_usage(UsageParams {
            data_dir,
            slate: slate.clone(),
            team,
            as_json: json,
        })
        .with_context(|| format!("usage adjustments for {} failed", slate.display()))?,

        Commands::Library { json } => handle_library(data_dir, json)?,

        Commands::Players { team, out, json } => handle_players(PlayersParams {
            data_dir,
            team,
            out,
            as_json: json,
        })
        .context("players listing failed")?,

        Commands::ExportDate { date, out } => handle_export_date(data_dir, date, out)
            .with_context(|| format!("export of {} failed", date))?,

        Commands::ExportLatest { out } => {
            handle_export_latest(data_dir, out).context("export of latest projections failed")?
        }

        Commands::Status { json } => handle_status(data_dir, json)?,
    }

    Ok(())
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
