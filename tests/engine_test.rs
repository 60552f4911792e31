//! Integration tests for the calibration engine

use daily_proj::{
    core::{DataPaths, EngineConfig},
    ingest::read_feed,
    redistribution::{RedistributionTables, TeamCeilings},
    CalibrationEngine, EngineError, GameDate, HistoryStore, PlayerId, RosterSlate, StatKind,
    StatLine, TeamCode,
};

fn date(day: u32) -> GameDate {
    GameDate::from_ymd(2025, 1, day).unwrap()
}

/// Star averages 35 minutes and 25 points; four 30-minute teammates plus
/// a visiting team.
fn feed(star_minutes: Option<f64>) -> String {
    let mut csv = String::from("Player,Team,Opp,Minutes,PTS,REB,AST,3PM\n");
    if let Some(minutes) = star_minutes {
        csv.push_str(&format!("Star Guard,BOS,NYK,{},25,6,4,3\n", minutes));
    }
    csv.push_str("Wing One,BOS,NYK,30,15,5,3,2\n");
    csv.push_str("Wing Two,BOS,NYK,30,12,4,2,1\n");
    csv.push_str("Big One,BOS,NYK,30,10,9,1,0\n");
    csv.push_str("Bench One,BOS,NYK,30,8,3,2,1\n");
    csv.push_str("Visitor Guard,NYK,BOS,34,22,4,6,2\n");
    csv.push_str("Visitor Big,NYK,BOS,30,14,10,2,0\n");
    csv
}

fn engine() -> CalibrationEngine {
    CalibrationEngine::new(HistoryStore::open_in_memory().unwrap(), EngineConfig::default())
        .unwrap()
}

#[test]
fn test_upload_retrains_and_stores_projections() {
    let mut engine = engine();
    let rows = read_feed(feed(Some(35.0)).as_bytes()).unwrap();

    let report = engine.append(rows, date(1), false).unwrap();
    assert_eq!(report.outcome.rows_accepted, 7);
    assert_eq!(report.outcome.history_size, 7);
    assert_eq!(report.summary.rows_in_history, 7);
    assert_eq!(report.projected_date, Some(date(1)));
    assert_eq!(report.projections, 7);

    let (as_of, projections) = engine.stored_projections().unwrap().unwrap();
    assert_eq!(as_of, date(1));
    for p in &projections {
        let sum = p.stats.get(StatKind::Points).unwrap()
            + p.stats.get(StatKind::Rebounds).unwrap()
            + p.stats.get(StatKind::Assists).unwrap();
        assert!((p.stats.get(StatKind::Pra).unwrap() - sum).abs() < 1e-9);
    }
}

#[test]
fn test_reupload_is_idempotent() {
    let mut engine = engine();
    engine
        .append(read_feed(feed(Some(35.0)).as_bytes()).unwrap(), date(1), false)
        .unwrap();
    let before = engine.store().all().unwrap();

    let report = engine
        .append(read_feed(feed(Some(35.0)).as_bytes()).unwrap(), date(1), false)
        .unwrap();
    assert_eq!(report.outcome.history_size, before.len());
    assert_eq!(engine.store().all().unwrap(), before);
}

#[test]
fn test_upload_with_no_valid_rows_fails_cleanly() {
    let mut engine = engine();
    let rows = read_feed("Player,Team,Opp,Minutes\nA,BOS,NYK,0\n".as_bytes()).unwrap();

    let err = engine.append(rows, date(1), false).unwrap_err();
    assert!(matches!(err, EngineError::NoValidRows { rejected: 1 }));
    assert!(engine.stored_projections().unwrap().is_none());
}

#[test]
fn test_project_uses_history() {
    let mut engine = engine();
    for day in 1..=3 {
        engine
            .append(read_feed(feed(Some(35.0)).as_bytes()).unwrap(), date(day), false)
            .unwrap();
    }

    // History says 25; a raw 15 is pulled toward it
    let raw = StatLine::new().with(StatKind::Points, 15.0);
    let blended = engine
        .project(&PlayerId::new("star guard"), &TeamCode::new("XXX"), 35.0, &raw)
        .unwrap();
    let points = blended.get(StatKind::Points).unwrap();
    assert!((points - (0.6 * 15.0 + 0.4 * 25.0)).abs() < 1e-9);

    // Unknown player falls back to the raw value
    let unknown = engine
        .project(&PlayerId::new("nobody"), &TeamCode::new("XXX"), 30.0, &raw)
        .unwrap();
    assert!((unknown.get(StatKind::Points).unwrap() - 15.0).abs() < 1e-9);
}

#[test]
fn test_usage_adjustments_for_missing_star() {
    let mut engine = engine();
    for day in 1..=3 {
        engine
            .append(read_feed(feed(Some(35.0)).as_bytes()).unwrap(), date(day), false)
            .unwrap();
    }

    let slate = RosterSlate::new(TeamCode::new("BOS"))
        .with_player("Wing One", 30.0)
        .with_player("Wing Two", 30.0)
        .with_player("Big One", 30.0)
        .with_player("Bench One", 30.0)
        .with_player("Fresh Call-Up", 30.0);
    let adjustments = engine.compute_usage_adjustments(&TeamCode::new("BOS"), &slate);

    let wing = &adjustments[&PlayerId::new("wing one")];
    let policy = &engine.config().redistribution;
    // The call-up holds all of the role increase, so regulars keep only the
    // minute-share part of the weight.
    let weight = policy.minutes_share_weight * (30.0 / 150.0);
    let expected = 1.0 + 25.0 * weight * policy.role_expansion_efficiency / 15.0;
    assert!((wing.multiplier(StatKind::Points) - expected).abs() < 1e-9);

    // No baseline, no multiplier
    assert!(!adjustments.contains_key(&PlayerId::new("fresh call-up")));
}

#[test]
fn test_redistribute_on_upload_scales_projections() {
    let mut engine = engine().with_tables(RedistributionTables {
        ceilings: {
            let mut c = TeamCeilings::new();
            c.insert(TeamCode::new("BOS"), 1.10);
            c
        },
        ..RedistributionTables::default()
    });
    for day in 1..=3 {
        engine
            .append(read_feed(feed(Some(35.0)).as_bytes()).unwrap(), date(day), false)
            .unwrap();
    }

    // Star sits out the fourth night
    let report = engine
        .append(read_feed(feed(None).as_bytes()).unwrap(), date(4), true)
        .unwrap();
    assert_eq!(report.projected_date, Some(date(4)));
    assert!(report.adjusted_players > 0);

    let (_, projections) = engine.stored_projections().unwrap().unwrap();
    let wing = projections
        .iter()
        .find(|p| p.player_id == PlayerId::new("wing one"))
        .unwrap();

    let plain = engine
        .rebuild_calibration()
        .unwrap()
        .project_record(
            &engine
                .store()
                .records_for_date(date(4))
                .unwrap()
                .into_iter()
                .find(|r| r.player_id == PlayerId::new("wing one"))
                .unwrap(),
        );
    let ratio =
        wing.stats.get(StatKind::Points).unwrap() / plain.stats.get(StatKind::Points).unwrap();
    assert!(ratio > 1.0);
    assert!(ratio <= 1.10 + 1e-9);
}

#[test]
fn test_invalid_config_refused() {
    let mut config = EngineConfig::default();
    config.blend.etr = 0.7;
    let result = CalibrationEngine::new(HistoryStore::open_in_memory().unwrap(), config);
    assert!(matches!(result, Err(EngineError::InvalidBlendWeights { .. })));
}

#[test]
fn test_open_data_dir_persists_across_engines() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(dir.path());

    {
        let mut engine = CalibrationEngine::open(&paths).unwrap();
        engine
            .append(read_feed(feed(Some(35.0)).as_bytes()).unwrap(), date(1), false)
            .unwrap();
    }

    let engine = CalibrationEngine::open(&paths).unwrap();
    assert_eq!(engine.store().len().unwrap(), 7);
    assert!(engine.stored_projections().unwrap().is_some());
    assert!(paths.database().exists());
}

#[test]
fn test_open_reads_config_and_tables() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    std::fs::write(paths.config(), r#"{"halflife_days": 5.0, "blend": {"etr": 0.5, "cal": 0.5}}"#)
        .unwrap();
    std::fs::write(paths.patterns(), "{ not json").unwrap();

    let engine = CalibrationEngine::open(&paths).unwrap();
    assert_eq!(engine.config().halflife_days, 5.0);
    assert_eq!(engine.config().blend.etr, 0.5);
    // Untouched sections keep their defaults
    assert_eq!(engine.config().redistribution.eligible_minutes, 15.0);
}

#[test]
fn test_open_rejects_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = DataPaths::new(dir.path());
    std::fs::write(paths.config(), r#"{"blend": {"etr": 0.9, "cal": 0.9}}"#).unwrap();

    assert!(CalibrationEngine::open(&paths).is_err());
}

#[test]
fn test_backfill_upload_keeps_latest_rows_dated() {
    let mut engine = engine();
    engine
        .append(read_feed(feed(Some(35.0)).as_bytes()).unwrap(), date(10), false)
        .unwrap();

    // An older date arrives afterwards, in the same second
    let report = engine
        .append(read_feed(feed(Some(30.0)).as_bytes()).unwrap(), date(3), false)
        .unwrap();
    assert_eq!(report.projected_date, Some(date(10)));
    assert_eq!(report.outcome.history_size, 14);

    let (as_of, projections) = engine.stored_projections().unwrap().unwrap();
    assert_eq!(as_of, date(3));
    assert_eq!(projections.len(), 7);
    assert!(projections.iter().all(|p| p.date == date(10)));

    // The stored run is the one computed after the backfill merge
    let summary = engine.store().calibration_summary(as_of).unwrap().unwrap();
    assert_eq!(summary.rows_in_history, 14);
}
