//! Daily Projection Calibration Library
//!
//! Keeps a deduplicated history of daily per-player projection feeds, learns
//! recency-weighted player rates and opponent multipliers from it, blends
//! them against each day's raw feed, and redistributes the production of
//! absent players onto their active teammates.
//!
//! ## Features
//!
//! - **History Store**: Idempotent last-write-wins merge of daily snapshots in SQLite
//! - **Calibration**: Recency weighting, player rates, league-normalized opponent multipliers
//! - **Blending**: Fixed convex blend of raw feed and calibrated estimate, PRA always derived
//! - **Usage Redistribution**: Historical patterns, generic minute-share fallback, assist override
//! - **CSV Ingestion**: One declarative column-alias table for feeds and roster slates
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use daily_proj::{core::DataPaths, engine::CalibrationEngine, ingest::read_feed_file, GameDate};
//!
//! # fn example() -> daily_proj::Result<()> {
//! let paths = DataPaths::new("/tmp/daily-proj");
//! let mut engine = CalibrationEngine::open(&paths)?;
//!
//! let rows = read_feed_file(std::path::Path::new("feed.csv"))?;
//! let report = engine.append(rows, "2025-01-15".parse::<GameDate>()?, false)?;
//! println!("{} rows in history", report.outcome.history_size);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Set the data directory to avoid passing it in every command:
//! ```bash
//! export DAILY_PROJ_DATA_DIR=~/projections
//! ```

pub mod calibration;
pub mod cli;
pub mod commands;
pub mod core;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod redistribution;
pub mod storage;

// Re-export commonly used types
pub use calibration::{Calibration, CalibrationSummary};
pub use cli::types::{GameDate, PlayerId, StatKind, TeamCode};
pub use core::EngineConfig;
pub use engine::{CalibrationEngine, UploadReport};
pub use error::{EngineError, Result, ValidationError};
pub use redistribution::{AbsenceAdjustment, RosterSlate};
pub use storage::{DailyRecord, HistoryStore, IncomingRow, ProjectionRow, StatLine};

pub const DATA_DIR_ENV_VAR: &str = "DAILY_PROJ_DATA_DIR";
