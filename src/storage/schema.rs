//! Database schema and connection management

use rusqlite::Connection;
use std::path::Path;

use crate::cli::types::StatKind;
use crate::error::Result;

/// Durable, deduplicated ledger of daily snapshots plus the calibration
/// artifacts derived from it.
///
/// `(date, player_id)` is the primary key of `daily_records`, so the history
/// can never hold two rows for the same player on the same date.
pub struct HistoryStore {
    pub(crate) conn: Connection,
}

impl HistoryStore {
    /// Open (or create) the database file and ensure tables exist
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// In-memory store for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        // Commit means the batch is on disk.
        self.conn.pragma_update(None, "synchronous", "FULL")?;

        self.conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS daily_records (
                    date TEXT NOT NULL,
                    player_id TEXT NOT NULL,
                    player_name TEXT NOT NULL,
                    team TEXT NOT NULL,
                    opponent TEXT NOT NULL,
                    minutes REAL NOT NULL,
                    {}
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL,
                    PRIMARY KEY (date, player_id)
                )",
                stat_column_defs(&StatKind::BASE)
            ),
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_daily_records_team
             ON daily_records(team, date)",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS player_rates (
                as_of TEXT NOT NULL,
                player_id TEXT NOT NULL,
                stat TEXT NOT NULL,
                expected_value REAL NOT NULL,
                rate_per_minute REAL,
                samples INTEGER NOT NULL,
                PRIMARY KEY (as_of, player_id, stat)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS opponent_multipliers (
                as_of TEXT NOT NULL,
                opponent TEXT NOT NULL,
                stat TEXT NOT NULL,
                multiplier REAL NOT NULL,
                samples INTEGER NOT NULL,
                PRIMARY KEY (as_of, opponent, stat)
            )",
            [],
        )?;

        // `date` is the history date the rows were blended from, which can
        // differ from the upload date in `as_of`.
        self.conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS projections (
                    as_of TEXT NOT NULL,
                    date TEXT NOT NULL,
                    player_id TEXT NOT NULL,
                    player_name TEXT NOT NULL,
                    team TEXT NOT NULL,
                    opponent TEXT NOT NULL,
                    minutes REAL NOT NULL,
                    {}
                    PRIMARY KEY (as_of, player_id)
                )",
                stat_column_defs(&StatKind::ALL)
            ),
            [],
        )?;

        // `run_id` only grows, so the newest write is always the max even
        // when two uploads land in the same second.
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS calibration_runs (
                run_id INTEGER PRIMARY KEY AUTOINCREMENT,
                as_of TEXT NOT NULL UNIQUE,
                summary TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}

/// Nullable REAL column definitions for `stats`, each followed by a comma.
fn stat_column_defs(stats: &[StatKind]) -> String {
    stats
        .iter()
        .map(|s| format!("{} REAL,", s.column_name()))
        .collect::<Vec<_>>()
        .join("\n")
}
