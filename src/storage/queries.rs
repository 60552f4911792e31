//! Merge and read operations on the daily history

use super::{models::*, schema::HistoryStore};
use crate::cli::types::{GameDate, PlayerId, StatKind, TeamCode};
use crate::error::{EngineError, Result};
use chrono::NaiveDate;
use rusqlite::{
    params_from_iter,
    types::{Type, Value},
    Row,
};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Offset of the first stat column in [`record_columns`].
const FIRST_STAT_COLUMN: usize = 6;

/// Column list matching [`row_to_record`].
fn record_columns() -> String {
    format!(
        "date, player_id, player_name, team, opponent, minutes, {}",
        stat_column_list(&StatKind::BASE)
    )
}

/// Comma-separated SQLite columns for `stats`, in order.
pub(crate) fn stat_column_list(stats: &[StatKind]) -> String {
    stats
        .iter()
        .map(|s| s.column_name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Bind values for `stats`, in order; missing stats bind NULL.
pub(crate) fn stat_values<'a>(
    line: &'a StatLine,
    stats: &'a [StatKind],
) -> impl Iterator<Item = Value> + 'a {
    stats.iter().map(move |s| Value::from(line.get(*s)))
}

/// `?, ?, …` with `n` placeholders.
pub(crate) fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

/// Keep only the last occurrence of every `(date, player_id)` key, ordered by
/// that key.
///
/// Used before every merge so a snapshot that lists a player twice resolves
/// the same way a later upload would: last write wins.
pub fn resolve_duplicates(records: Vec<DailyRecord>) -> Vec<DailyRecord> {
    let mut latest: HashMap<(GameDate, PlayerId), DailyRecord> = HashMap::new();
    for record in records {
        latest.insert((record.date, record.player_id.clone()), record);
    }
    let mut out: Vec<DailyRecord> = latest.into_values().collect();
    out.sort_by(|a, b| (a.date, &a.player_id).cmp(&(b.date, &b.player_id)));
    out
}

impl HistoryStore {
    /// Merge one snapshot for `date` into the history.
    ///
    /// Invalid rows are dropped and reported, never fatal. Valid rows replace
    /// any stored row with the same `(date, player_id)`; all other rows are
    /// untouched. The merge runs in one transaction, so it is on disk when
    /// this returns and readers never see half of it. Re-appending the same
    /// snapshot is a no-op.
    ///
    /// Fails with [`EngineError::NoValidRows`] when nothing survives
    /// validation.
    pub fn append(&mut self, rows: Vec<IncomingRow>, date: GameDate) -> Result<AppendOutcome> {
        let mut records = Vec::with_capacity(rows.len());
        let mut rejections = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            match row.into_record(index, date) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(%date, "dropping row: {}", err);
                    rejections.push(Rejection::from(&err));
                }
            }
        }

        if records.is_empty() {
            return Err(EngineError::NoValidRows {
                rejected: rejections.len(),
            });
        }

        let records = resolve_duplicates(records);
        self.upsert_records(&records)?;
        let history_size = self.len()?;

        info!(
            %date,
            accepted = records.len(),
            rejected = rejections.len(),
            history_size,
            "merged snapshot"
        );

        Ok(AppendOutcome {
            date,
            rows_accepted: records.len(),
            rows_rejected: rejections.len(),
            history_size,
            rejections,
        })
    }

    /// Insert or replace records by `(date, player_id)`, preserving the
    /// first `created_at` of replaced rows.
    pub fn upsert_records(&mut self, records: &[DailyRecord]) -> Result<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        let sql = format!(
            "INSERT OR REPLACE INTO daily_records
             ({}, created_at, updated_at)
             VALUES ({},
                     COALESCE((SELECT created_at FROM daily_records
                               WHERE date = ? AND player_id = ?), ?), ?)",
            record_columns(),
            placeholders(FIRST_STAT_COLUMN + StatKind::BASE.len())
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for record in records {
                let date = record.date.to_string();
                let mut values = vec![
                    Value::from(date.clone()),
                    Value::from(record.player_id.as_str().to_string()),
                    Value::from(record.player_name.clone()),
                    Value::from(record.team.as_str().to_string()),
                    Value::from(record.opponent.as_str().to_string()),
                    Value::from(record.minutes),
                ];
                values.extend(stat_values(&record.stats, &StatKind::BASE));
                values.extend([
                    Value::from(date),
                    Value::from(record.player_id.as_str().to_string()),
                    Value::from(now),
                    Value::from(now),
                ]);
                stmt.execute(params_from_iter(values))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Every stored record, ordered by date then player.
    pub fn all(&self) -> Result<Vec<DailyRecord>> {
        self.query_records(
            &format!(
                "SELECT {} FROM daily_records ORDER BY date, player_id",
                record_columns()
            ),
            &[],
        )
    }

    /// Records for one date, ordered by team then player.
    pub fn records_for_date(&self, date: GameDate) -> Result<Vec<DailyRecord>> {
        self.query_records(
            &format!(
                "SELECT {} FROM daily_records
                 WHERE date = ? ORDER BY team, player_id",
                record_columns()
            ),
            &[&date.to_string() as &dyn rusqlite::ToSql],
        )
    }

    /// Records a team has fielded, ordered by date then player.
    pub fn records_for_team(&self, team: &TeamCode) -> Result<Vec<DailyRecord>> {
        self.query_records(
            &format!(
                "SELECT {} FROM daily_records
                 WHERE team = ? ORDER BY date, player_id",
                record_columns()
            ),
            &[&team.as_str() as &dyn rusqlite::ToSql],
        )
    }

    /// Stored dates with row counts, newest first.
    pub fn date_summaries(&self) -> Result<Vec<DateSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT date, COUNT(*) FROM daily_records GROUP BY date ORDER BY date DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DateSummary {
                date: date_column(row, 0)?,
                rows: row.get::<_, i64>(1)? as usize,
            })
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }

    /// Every player with the team of their newest stored row, ordered by
    /// player. `team` narrows the list to that team's current players.
    pub fn players_master(&self, team: Option<&TeamCode>) -> Result<Vec<PlayerEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT r.player_id, r.player_name, r.team, r.date, seen.games
             FROM daily_records r
             JOIN (SELECT player_id, MAX(date) AS last_date, COUNT(*) AS games
                   FROM daily_records GROUP BY player_id) seen
               ON r.player_id = seen.player_id AND r.date = seen.last_date
             WHERE ?1 IS NULL OR r.team = ?1
             ORDER BY r.player_id",
        )?;
        let rows = stmt.query_map([team.map(|t| t.as_str())], |row| {
            Ok(PlayerEntry {
                player_id: PlayerId::new(&row.get::<_, String>(0)?),
                player_name: row.get(1)?,
                team: TeamCode::new(&row.get::<_, String>(2)?),
                last_seen: date_column(row, 3)?,
                games: row.get::<_, i64>(4)? as usize,
            })
        })?;

        let mut players = Vec::new();
        for row in rows {
            players.push(row?);
        }
        Ok(players)
    }

    pub fn latest_date(&self) -> Result<Option<GameDate>> {
        let latest: Option<String> = self
            .conn
            .query_row("SELECT MAX(date) FROM daily_records", [], |row| row.get(0))?;
        latest.map(|s| s.parse::<GameDate>()).transpose()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM daily_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn query_records(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<DailyRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

/// Parse an ISO date column.
pub(crate) fn date_column(row: &Row, idx: usize) -> rusqlite::Result<GameDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map(GameDate::new)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read nullable stat columns starting at `first` in [`StatKind::BASE`] order.
pub(crate) fn stat_columns(row: &Row, first: usize) -> rusqlite::Result<StatLine> {
    let mut stats = StatLine::new();
    for (offset, stat) in StatKind::BASE.iter().enumerate() {
        if let Some(value) = row.get::<_, Option<f64>>(first + offset)? {
            stats.set(*stat, value);
        }
    }
    Ok(stats)
}

fn row_to_record(row: &Row) -> rusqlite::Result<DailyRecord> {
    Ok(DailyRecord {
        date: date_column(row, 0)?,
        player_id: PlayerId::new(&row.get::<_, String>(1)?),
        player_name: row.get(2)?,
        team: TeamCode::new(&row.get::<_, String>(3)?),
        opponent: TeamCode::new(&row.get::<_, String>(4)?),
        minutes: row.get(5)?,
        stats: stat_columns(row, FIRST_STAT_COLUMN)?,
    })
}
