//! CLI argument definitions and parsing.

pub mod types;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use types::{GameDate, StatKind, TeamCode};

use crate::storage::StatLine;

/// Raw per-stat values supplied on the command line
#[derive(Debug, Args)]
pub struct RawStats {
    /// Raw points.
    #[clap(long)]
    pub pts: Option<f64>,

    /// Raw rebounds.
    #[clap(long)]
    pub reb: Option<f64>,

    /// Raw assists.
    #[clap(long)]
    pub ast: Option<f64>,

    /// Raw threes made.
    #[clap(long)]
    pub threes: Option<f64>,

    /// Raw steals.
    #[clap(long)]
    pub stl: Option<f64>,

    /// Raw blocks.
    #[clap(long)]
    pub blk: Option<f64>,

    /// Raw turnovers.
    #[clap(long)]
    pub tov: Option<f64>,
}

impl RawStats {
    pub fn to_stat_line(&self) -> StatLine {
        let mut line = StatLine::new();
        let values = [
            (StatKind::Points, self.pts),
            (StatKind::Rebounds, self.reb),
            (StatKind::Assists, self.ast),
            (StatKind::ThreesMade, self.threes),
            (StatKind::Steals, self.stl),
            (StatKind::Blocks, self.blk),
            (StatKind::Turnovers, self.tov),
        ];
        for (stat, value) in values {
            if let Some(v) = value {
                line.set(stat, v);
            }
        }
        line
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge a daily feed into the history, retrain, and store projections.
    ///
    /// The CSV needs Player, Team and Opp columns (common aliases accepted);
    /// rows without positive minutes are rejected and reported.
    Upload {
        /// Feed CSV file.
        #[clap(long)]
        csv: PathBuf,

        /// Snapshot date (YYYY-MM-DD, MM/DD/YYYY, MM-DD-YYYY, YYYY/MM/DD). Defaults to today.
        #[clap(long, short)]
        date: Option<GameDate>,

        /// Apply absence redistribution to the stored projections.
        #[clap(long)]
        redistribute: bool,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Rebuild calibration from the full history and print its summary.
    Calibrate {
        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Blend a raw stat line for one player against the current calibration.
    Project {
        /// Player name.
        #[clap(long, short)]
        player: String,

        /// Opponent team code.
        #[clap(long, short)]
        opponent: TeamCode,

        /// Projected minutes.
        #[clap(long, short)]
        minutes: f64,

        #[clap(flatten)]
        raw: RawStats,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Compute absence adjustments for roster slates.
    ///
    /// The slate CSV needs Player, Team and Minutes columns.
    Usage {
        /// Slate CSV file.
        #[clap(long)]
        slate: PathBuf,

        /// Only this team.
        #[clap(long, short)]
        team: Option<TeamCode>,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// List stored dates with row counts, newest first.
    Library {
        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// List every player with the team of their newest stored row.
    Players {
        /// Only players whose newest row is for this team.
        #[clap(long, short)]
        team: Option<TeamCode>,

        /// Write the list as CSV to this file.
        #[clap(long)]
        out: Option<PathBuf>,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Export one stored date as CSV.
    ExportDate {
        /// Date to export.
        #[clap(long, short)]
        date: GameDate,

        /// Output file; stdout when omitted.
        #[clap(long)]
        out: Option<PathBuf>,
    },

    /// Export the latest stored projections as CSV.
    ExportLatest {
        /// Output file; stdout when omitted.
        #[clap(long)]
        out: Option<PathBuf>,
    },

    /// Show the data directory, history size and artifact state.
    Status {
        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },
}

#[derive(Debug, Parser)]
#[clap(
    name = "daily-proj",
    about = "Daily projection calibration and usage redistribution"
)]
pub struct DailyProj {
    /// Data directory (or set `DAILY_PROJ_DATA_DIR` env var).
    #[clap(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[clap(long, short, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}
