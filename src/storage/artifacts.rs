//! Calibration artifacts versioned by the upload date that produced them

use super::{
    models::*,
    queries::{date_column, placeholders, stat_column_list, stat_columns, stat_values},
    schema::HistoryStore,
};
use crate::calibration::{Calibration, CalibrationSummary};
use crate::cli::types::{GameDate, PlayerId, StatKind, TeamCode};
use crate::error::Result;
use rusqlite::{params, params_from_iter, types::Value, OptionalExtension, Row};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

impl HistoryStore {
    /// Replace the artifacts for `as_of` with a fresh calibration and its
    /// projections, in one transaction.
    pub fn save_artifacts(
        &mut self,
        as_of: GameDate,
        calibration: &Calibration,
        projections: &[ProjectionRow],
    ) -> Result<()> {
        let as_of_str = as_of.to_string();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        let summary = serde_json::to_string(&calibration.summary)?;

        let tx = self.conn.transaction()?;
        for table in ["player_rates", "opponent_multipliers", "projections"] {
            tx.execute(
                &format!("DELETE FROM {table} WHERE as_of = ?"),
                params![as_of_str],
            )?;
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO player_rates
                 (as_of, player_id, stat, expected_value, rate_per_minute, samples)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            for rate in calibration.player_rates.values().flat_map(|m| m.values()) {
                stmt.execute(params![
                    as_of_str,
                    rate.player_id.as_str(),
                    rate.stat.label(),
                    rate.expected_value,
                    rate.rate_per_minute,
                    rate.samples as i64
                ])?;
            }
        }

        {
            let mut stmt = tx.prepare(
                "INSERT INTO opponent_multipliers
                 (as_of, opponent, stat, multiplier, samples)
                 VALUES (?, ?, ?, ?, ?)",
            )?;
            for m in calibration
                .opponent_multipliers
                .values()
                .flat_map(|m| m.values())
            {
                stmt.execute(params![
                    as_of_str,
                    m.opponent.as_str(),
                    m.stat.label(),
                    m.multiplier,
                    m.samples as i64
                ])?;
            }
        }

        {
            let mut stmt = tx.prepare(&format!(
                "INSERT OR REPLACE INTO projections
                 (as_of, date, player_id, player_name, team, opponent, minutes, {})
                 VALUES ({})",
                stat_column_list(&StatKind::ALL),
                placeholders(7 + StatKind::ALL.len())
            ))?;
            for row in projections {
                let mut values = vec![
                    Value::from(as_of_str.clone()),
                    Value::from(row.date.to_string()),
                    Value::from(row.player_id.as_str().to_string()),
                    Value::from(row.player_name.clone()),
                    Value::from(row.team.as_str().to_string()),
                    Value::from(row.opponent.as_str().to_string()),
                    Value::from(row.minutes),
                ];
                values.extend(stat_values(&row.stats, &StatKind::ALL));
                stmt.execute(params_from_iter(values))?;
            }
        }

        tx.execute(
            "INSERT OR REPLACE INTO calibration_runs (as_of, summary, created_at)
             VALUES (?, ?, ?)",
            params![as_of_str, summary, now],
        )?;
        tx.commit()?;

        info!(
            %as_of,
            projections = projections.len(),
            "saved calibration artifacts"
        );
        Ok(())
    }

    /// Most recently written artifact version, if any upload has produced one.
    ///
    /// Rewriting a version gives it a fresh `run_id`, so a re-upload of an
    /// older date becomes the latest.
    pub fn latest_artifact_date(&self) -> Result<Option<GameDate>> {
        let latest: Option<String> = self
            .conn
            .query_row(
                "SELECT as_of FROM calibration_runs
                 ORDER BY run_id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        latest.map(|s| s.parse::<GameDate>()).transpose()
    }

    /// Projections stored for `as_of`, ordered by team then player.
    pub fn projections_for(&self, as_of: GameDate) -> Result<Vec<ProjectionRow>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT date, player_id, player_name, team, opponent, minutes, {}
             FROM projections
             WHERE as_of = ?
             ORDER BY team, player_id",
            stat_column_list(&StatKind::BASE)
        ))?;
        let rows = stmt.query_map(params![as_of.to_string()], row_to_projection)?;

        let mut projections = Vec::new();
        for row in rows {
            projections.push(row?);
        }
        Ok(projections)
    }

    /// Latest projections together with the upload date that produced them.
    pub fn latest_projections(&self) -> Result<Option<(GameDate, Vec<ProjectionRow>)>> {
        match self.latest_artifact_date()? {
            Some(as_of) => Ok(Some((as_of, self.projections_for(as_of)?))),
            None => Ok(None),
        }
    }

    /// Summary saved alongside the artifacts for `as_of`.
    pub fn calibration_summary(&self, as_of: GameDate) -> Result<Option<CalibrationSummary>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT summary FROM calibration_runs WHERE as_of = ?",
                params![as_of.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        raw.map(|s| serde_json::from_str(&s).map_err(Into::into))
            .transpose()
    }
}

fn row_to_projection(row: &Row) -> rusqlite::Result<ProjectionRow> {
    Ok(ProjectionRow {
        date: date_column(row, 0)?,
        player_id: PlayerId::new(&row.get::<_, String>(1)?),
        player_name: row.get(2)?,
        team: TeamCode::new(&row.get::<_, String>(3)?),
        opponent: TeamCode::new(&row.get::<_, String>(4)?),
        minutes: row.get(5)?,
        stats: stat_columns(row, 6)?,
    })
}
