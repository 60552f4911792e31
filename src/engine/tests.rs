//! Unit tests for the calibration engine

use super::*;
use crate::cli::types::StatKind;

fn date(day: u32) -> GameDate {
    GameDate::from_ymd(2025, 1, day).unwrap()
}

fn row(player: &str, team: &str, opponent: &str, minutes: f64, points: f64) -> IncomingRow {
    IncomingRow {
        player: Some(player.to_string()),
        team: Some(team.to_string()),
        opponent: Some(opponent.to_string()),
        minutes: Some(minutes),
        stats: StatLine::new().with(StatKind::Points, points),
    }
}

fn snapshot() -> Vec<IncomingRow> {
    vec![
        row("Alpha One", "BOS", "NYK", 34.0, 25.0),
        row("Charlie Three", "NYK", "BOS", 31.0, 19.0),
    ]
}

fn engine() -> CalibrationEngine {
    CalibrationEngine::new(HistoryStore::open_in_memory().unwrap(), EngineConfig::default())
        .unwrap()
}

#[cfg(test)]
mod append_tests {
    use super::*;

    #[test]
    fn test_failed_artifact_write_keeps_merged_history() {
        let mut engine = engine();
        engine
            .store
            .conn
            .execute("DROP TABLE projections", [])
            .unwrap();

        let result = engine.append(snapshot(), date(2), false);
        assert!(result.is_err());
        assert_eq!(engine.store().len().unwrap(), 2);
        assert!(engine.store().latest_artifact_date().unwrap().is_none());
    }
}
