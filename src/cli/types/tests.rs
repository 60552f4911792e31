//! Unit tests for CLI value types

use super::*;
use crate::error::EngineError;

#[cfg(test)]
mod player_id_tests {
    use super::*;

    #[test]
    fn test_normalization_collapses_whitespace_and_case() {
        let id = PlayerId::new("  Shai   Gilgeous-Alexander\t");
        assert_eq!(id.as_str(), "shai gilgeous-alexander");
    }

    #[test]
    fn test_equivalent_spellings_are_equal() {
        assert_eq!(PlayerId::new("Jalen Brunson"), PlayerId::new("jalen  BRUNSON "));
        assert_ne!(PlayerId::new("Jalen Brunson"), PlayerId::new("Jalen Green"));
    }

    #[test]
    fn test_empty_name() {
        assert!(PlayerId::new("   ").is_empty());
        assert!(!PlayerId::new("a").is_empty());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerId::new("Tyrese Maxey")).unwrap();
        assert_eq!(json, "\"tyrese maxey\"");
    }
}

#[cfg(test)]
mod team_code_tests {
    use super::*;

    #[test]
    fn test_team_code_upper_cases() {
        assert_eq!(TeamCode::new(" bos ").as_str(), "BOS");
        assert_eq!(TeamCode::from("Nyk").to_string(), "NYK");
    }
}

#[cfg(test)]
mod stat_kind_tests {
    use super::*;

    #[test]
    fn test_base_excludes_derived() {
        assert!(!StatKind::BASE.contains(&StatKind::Pra));
        assert_eq!(StatKind::ALL.len(), StatKind::BASE.len() + 1);
        assert!(StatKind::BASE.iter().all(|s| !s.is_derived()));
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("pts".parse::<StatKind>().unwrap(), StatKind::Points);
        assert_eq!("Rebounds".parse::<StatKind>().unwrap(), StatKind::Rebounds);
        assert_eq!("TOV".parse::<StatKind>().unwrap(), StatKind::Turnovers);
        assert_eq!("3PM".parse::<StatKind>().unwrap(), StatKind::ThreesMade);
    }

    #[test]
    fn test_from_str_invalid() {
        match "dunks".parse::<StatKind>() {
            Err(EngineError::InvalidStat { stat }) => assert_eq!(stat, "dunks"),
            other => panic!("Expected InvalidStat, got {:?}", other),
        }
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&StatKind::ThreesMade).unwrap();
        assert_eq!(json, "\"3PM\"");
        let back: StatKind = serde_json::from_str("\"AST\"").unwrap();
        assert_eq!(back, StatKind::Assists);
    }

    #[test]
    fn test_column_names_are_unique() {
        let mut names: Vec<_> = StatKind::ALL.iter().map(|s| s.column_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), StatKind::ALL.len());
    }
}

#[cfg(test)]
mod game_date_tests {
    use super::*;

    #[test]
    fn test_parse_accepted_formats() {
        let expected = GameDate::from_ymd(2025, 11, 5).unwrap();
        assert_eq!("2025-11-05".parse::<GameDate>().unwrap(), expected);
        assert_eq!("11/05/2025".parse::<GameDate>().unwrap(), expected);
        assert_eq!("11-05-2025".parse::<GameDate>().unwrap(), expected);
        assert_eq!("2025/11/05".parse::<GameDate>().unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            "tomorrow".parse::<GameDate>(),
            Err(EngineError::InvalidDate { .. })
        ));
        assert!("2025-02-30".parse::<GameDate>().is_err());
    }

    #[test]
    fn test_display_is_iso() {
        let date = GameDate::from_ymd(2026, 1, 9).unwrap();
        assert_eq!(date.to_string(), "2026-01-09");
    }

    #[test]
    fn test_ordering() {
        let earlier = GameDate::from_ymd(2025, 12, 31).unwrap();
        let later = GameDate::from_ymd(2026, 1, 1).unwrap();
        assert!(earlier < later);
    }
}
