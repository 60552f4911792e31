//! The calibration engine: one object owning the history store and the
//! policy, exposing upload, calibration, projection and redistribution.
//!
//! The engine caches nothing derived. Every call that needs player rates or
//! opponent multipliers rebuilds them from the stored history, so a read can
//! never see a calibration older than the last completed upload.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::calibration::{Calibration, CalibrationSummary};
use crate::cli::types::{GameDate, PlayerId, TeamCode};
use crate::core::{DataPaths, EngineConfig};
use crate::error::Result;
use crate::redistribution::{
    compute_usage_adjustments, AbsenceAdjustment, HistoricalPatternTable, RedistributionTables,
    RosterSlate, TeamCeilings,
};
use crate::storage::{
    AppendOutcome, DailyRecord, HistoryStore, IncomingRow, ProjectionRow, StatLine,
};

#[cfg(test)]
mod tests;

/// Everything an upload produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReport {
    pub outcome: AppendOutcome,
    pub summary: CalibrationSummary,
    /// Date whose rows the stored projections describe.
    pub projected_date: Option<GameDate>,
    pub projections: usize,
    /// Players whose projections were scaled by absence adjustments.
    pub adjusted_players: usize,
}

pub struct CalibrationEngine {
    store: HistoryStore,
    config: EngineConfig,
    tables: RedistributionTables,
}

impl CalibrationEngine {
    /// Build an engine around an open store. Fails on an invalid config.
    pub fn new(store: HistoryStore, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            tables: RedistributionTables::default(),
        })
    }

    /// Open the store, config and redistribution tables in a data directory.
    pub fn open(paths: &DataPaths) -> Result<Self> {
        let config = EngineConfig::load_or_default(&paths.config())?;
        let store = HistoryStore::open(&paths.database())?;
        let tables = RedistributionTables {
            patterns: HistoricalPatternTable::load_or_empty(&paths.patterns()),
            ceilings: TeamCeilings::load_or_empty(&paths.team_ceilings()),
        };
        Ok(Self::new(store, config)?.with_tables(tables))
    }

    pub fn with_tables(mut self, tables: RedistributionTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Merge a snapshot, retrain, and store fresh artifacts versioned by
    /// `date`. Nothing is returned until all three are on disk.
    ///
    /// The merge and the artifact write commit separately. If the artifact
    /// write fails the merged history stays, the error is returned, and the
    /// next upload or `calibrate` rebuilds from it.
    ///
    /// With `redistribute`, each team's rows on the latest date act as its
    /// roster slate and absence adjustments are folded into the stored
    /// projections.
    pub fn append(
        &mut self,
        rows: Vec<IncomingRow>,
        date: GameDate,
        redistribute: bool,
    ) -> Result<UploadReport> {
        let outcome = self.store.append(rows, date)?;

        let history = self.store.all()?;
        let calibration = Calibration::build(&history, &self.config);
        let (projected_date, projections, adjusted_players) =
            self.latest_projections(&history, &calibration, redistribute)?;

        if let Err(e) = self.store.save_artifacts(date, &calibration, &projections) {
            warn!(
                %date,
                history_size = outcome.history_size,
                "snapshot merged but artifacts were not saved: {}",
                e
            );
            return Err(e);
        }

        info!(
            %date,
            accepted = outcome.rows_accepted,
            rejected = outcome.rows_rejected,
            history_size = outcome.history_size,
            projections = projections.len(),
            adjusted_players,
            "upload complete"
        );

        Ok(UploadReport {
            outcome,
            summary: calibration.summary,
            projected_date,
            projections: projections.len(),
            adjusted_players,
        })
    }

    /// Rebuild player rates and opponent multipliers from the full history.
    pub fn rebuild_calibration(&self) -> Result<Calibration> {
        let history = self.store.all()?;
        Ok(Calibration::build(&history, &self.config))
    }

    /// Blend one raw stat line against the current calibration.
    pub fn project(
        &self,
        player: &PlayerId,
        opponent: &TeamCode,
        minutes: f64,
        raw: &StatLine,
    ) -> Result<StatLine> {
        Ok(self
            .rebuild_calibration()?
            .project(player, opponent, minutes, raw))
    }

    /// Absence adjustments for one team's slate. Never fails: an unreadable
    /// history is logged and treated as no adjustments.
    pub fn compute_usage_adjustments(
        &self,
        team: &TeamCode,
        slate: &RosterSlate,
    ) -> BTreeMap<PlayerId, AbsenceAdjustment> {
        match self.store.records_for_team(team) {
            Ok(history) => {
                compute_usage_adjustments(&history, team, slate, &self.config, &self.tables)
            }
            Err(e) => {
                warn!(%team, "history unavailable, skipping redistribution: {}", e);
                BTreeMap::new()
            }
        }
    }

    /// Projections stored by the most recent upload, with that upload's date.
    /// Each row carries the history date it was blended from.
    pub fn stored_projections(&self) -> Result<Option<(GameDate, Vec<ProjectionRow>)>> {
        self.store.latest_projections()
    }

    /// Blend the latest date's rows, optionally applying redistribution.
    fn latest_projections(
        &self,
        history: &[DailyRecord],
        calibration: &Calibration,
        redistribute: bool,
    ) -> Result<(Option<GameDate>, Vec<ProjectionRow>, usize)> {
        let Some(latest) = self.store.latest_date()? else {
            return Ok((None, Vec::new(), 0));
        };
        let rows = self.store.records_for_date(latest)?;
        let mut projections: Vec<ProjectionRow> =
            rows.iter().map(|r| calibration.project_record(r)).collect();

        let mut adjusted = 0;
        if redistribute {
            let adjustments = self.adjustments_for_rows(history, &rows);
            for projection in projections.iter_mut() {
                if let Some(adjustment) = adjustments.get(&projection.player_id) {
                    projection.stats = adjustment.apply(&projection.stats);
                    adjusted += 1;
                }
            }
        }
        Ok((Some(latest), projections, adjusted))
    }

    /// Adjustments for every team present in `rows`, treating those rows as
    /// the slates.
    fn adjustments_for_rows(
        &self,
        history: &[DailyRecord],
        rows: &[DailyRecord],
    ) -> BTreeMap<PlayerId, AbsenceAdjustment> {
        let mut teams: Vec<&TeamCode> = rows.iter().map(|r| &r.team).collect();
        teams.sort();
        teams.dedup();

        let mut all = BTreeMap::new();
        for team in teams {
            let slate = RosterSlate::from_records(team, rows);
            all.extend(compute_usage_adjustments(
                history,
                team,
                &slate,
                &self.config,
                &self.tables,
            ));
        }
        all
    }
}
