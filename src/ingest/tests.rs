//! Unit tests for CSV ingestion

use super::*;
use crate::cli::types::{PlayerId, StatKind, TeamCode};
use crate::error::EngineError;

#[test]
fn test_canonical_headers() {
    let csv_data = "\
Player,Team,Opp,Minutes,PTS,REB,AST,3PM,STL,BLK,TO,PRA
Jayson Tatum,BOS,NYK,36,27.5,8.1,4.9,3.1,1.0,0.6,2.7,40.5
";
    let rows = read_feed(csv_data.as_bytes()).unwrap();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row.player.as_deref(), Some("Jayson Tatum"));
    assert_eq!(row.team.as_deref(), Some("BOS"));
    assert_eq!(row.opponent.as_deref(), Some("NYK"));
    assert_eq!(row.minutes, Some(36.0));
    assert_eq!(row.stats.get(StatKind::ThreesMade), Some(3.1));
    assert_eq!(row.stats.get(StatKind::Turnovers), Some(2.7));
    // PRA is rebuilt from the components, not read
    let pra = row.stats.get(StatKind::Pra).unwrap();
    assert!((pra - (27.5 + 8.1 + 4.9)).abs() < 1e-9);
}

#[test]
fn test_aliases_case_and_whitespace() {
    let csv_data = "\
 name , TEAM,opponent,MIN,Points,Rebounds,Assists,Three Pointers Made,Steals,Blocks,TOV
Jalen Brunson,nyk,bos,35,26,3.5,7.2,2.4,0.9,0.2,2.5
";
    let rows = read_feed(csv_data.as_bytes()).unwrap();
    let row = &rows[0];
    assert_eq!(row.player.as_deref(), Some("Jalen Brunson"));
    assert_eq!(row.minutes, Some(35.0));
    assert_eq!(row.stats.get(StatKind::Assists), Some(7.2));
    assert_eq!(row.stats.get(StatKind::ThreesMade), Some(2.4));
    assert_eq!(row.stats.get(StatKind::Turnovers), Some(2.5));
}

#[test]
fn test_missing_required_header() {
    let csv_data = "\
Player,Team,Minutes,PTS
Jayson Tatum,BOS,36,27.5
";
    let err = read_feed(csv_data.as_bytes()).unwrap_err();
    match err {
        EngineError::MissingColumn { column } => assert_eq!(column, "Opp"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_blank_and_malformed_cells() {
    let csv_data = "\
Player,Team,Opp,Minutes,PTS,REB
Jayson Tatum,BOS,,abc,27.5,
  ,BOS,NYK,30,10,5
";
    let rows = read_feed(csv_data.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].opponent, None);
    assert_eq!(rows[0].minutes, None);
    assert_eq!(rows[0].stats.get(StatKind::Rebounds), None);
    assert_eq!(rows[1].player, None);
}

#[test]
fn test_short_rows_tolerated() {
    let csv_data = "\
Player,Team,Opp,Minutes,PTS
Jayson Tatum,BOS,NYK
";
    let rows = read_feed(csv_data.as_bytes()).unwrap();
    assert_eq!(rows[0].minutes, None);
    assert_eq!(rows[0].stats.get(StatKind::Points), None);
}

#[test]
fn test_empty_feed() {
    let rows = read_feed("Player,Team,Opp\n".as_bytes()).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_first_alias_wins() {
    let csv_data = "\
Name,Player,Team,Opp
Wrong,Right,BOS,NYK
";
    let rows = read_feed(csv_data.as_bytes()).unwrap();
    assert_eq!(rows[0].player.as_deref(), Some("Right"));
}

#[test]
fn test_slates_grouped_by_team() {
    let csv_data = "\
Player,Team,Minutes
Jayson Tatum,BOS,36
Jaylen Brown,bos,34
Jalen Brunson,NYK,35
Injured Guy,NYK,0
,NYK,20
Jayson Tatum,BOS,38
";
    let slates = read_slates(csv_data.as_bytes()).unwrap();
    assert_eq!(slates.len(), 2);

    let boston = &slates[0];
    assert_eq!(boston.team, TeamCode::new("BOS"));
    assert_eq!(boston.players.len(), 2);
    assert_eq!(boston.minutes(&PlayerId::new("jayson tatum")), Some(38.0));

    let knicks = &slates[1];
    assert_eq!(knicks.players.len(), 1);
}

#[test]
fn test_slate_requires_minutes() {
    let err = read_slates("Player,Team\nA,BOS\n".as_bytes()).unwrap_err();
    assert!(matches!(err, EngineError::MissingColumn { .. }));
}
