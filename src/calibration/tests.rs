//! Unit tests for calibration

use super::*;
use crate::cli::types::{GameDate, PlayerId, StatKind, TeamCode};
use crate::core::{BlendWeights, EngineConfig};
use crate::storage::{DailyRecord, StatLine};

fn date(day: u32) -> GameDate {
    GameDate::from_ymd(2025, 2, day).unwrap()
}

fn record(day: u32, player: &str, opponent: &str, minutes: f64, points: f64) -> DailyRecord {
    DailyRecord {
        date: date(day),
        player_id: PlayerId::new(player),
        player_name: player.to_string(),
        team: TeamCode::new("BOS"),
        opponent: TeamCode::new(opponent),
        minutes,
        stats: StatLine::new()
            .with(StatKind::Points, points)
            .with(StatKind::Rebounds, 6.0)
            .with(StatKind::Assists, 4.0),
    }
}

mod recency_tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let dates = vec![date(1), date(3), date(3), date(7), date(9), date(1)];
        let weights = recency_weights(&dates, DEFAULT_HALFLIFE_DAYS);
        assert_eq!(weights.len(), dates.len());
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_newer_dates_weigh_more() {
        let dates = vec![date(1), date(2), date(3)];
        let weights = recency_weights(&dates, 10.0);
        assert!(weights[0] < weights[1]);
        assert!(weights[1] < weights[2]);
    }

    #[test]
    fn test_rows_on_same_date_share_weight() {
        let dates = vec![date(1), date(5), date(5)];
        let weights = recency_weights(&dates, 10.0);
        assert!((weights[1] - weights[2]).abs() < 1e-12);
    }

    #[test]
    fn test_single_date_is_uniform() {
        let dates = vec![date(4); 4];
        let weights = recency_weights(&dates, 10.0);
        for w in weights {
            assert!((w - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_gaps_between_dates_use_rank() {
        // Dense ranks ignore calendar gaps
        let close = recency_weights(&[date(1), date(2)], 1.0);
        let far = recency_weights(&[date(1), date(20)], 1.0);
        assert!((close[0] - far[0]).abs() < 1e-12);
        assert!((close[0] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_bad_halflife() {
        assert!(recency_weights(&[], 10.0).is_empty());

        let weights = recency_weights(&[date(1), date(2)], 0.0);
        assert_eq!(weights, vec![0.5, 0.5]);
        let weights = recency_weights(&[date(1), date(2)], f64::NAN);
        assert_eq!(weights, vec![0.5, 0.5]);
    }

    #[test]
    fn test_weighted_mean() {
        assert_eq!(weighted_mean(&[2.0, 4.0], &[0.25, 0.75]), Some(3.5));
        assert_eq!(weighted_mean(&[2.0], &[0.0]), None);
    }
}

mod rates_tests {
    use super::*;

    #[test]
    fn test_recent_dates_pull_estimate_up() {
        let history = vec![
            record(1, "A", "NYK", 30.0, 10.0),
            record(2, "A", "NYK", 30.0, 20.0),
            record(3, "A", "NYK", 30.0, 30.0),
        ];
        let rates = estimate_player_rates(&history, StatKind::Points, 10.0);
        let rate = &rates[&PlayerId::new("a")];

        assert!(rate.expected_value > 20.0);
        assert!(rate.expected_value < 30.0);
        assert_eq!(rate.samples, 3);
    }

    #[test]
    fn test_rate_per_minute() {
        let history = vec![
            record(1, "A", "NYK", 20.0, 10.0),
            record(2, "A", "NYK", 20.0, 10.0),
        ];
        let rates = estimate_player_rates(&history, StatKind::Points, 10.0);
        let rate = &rates[&PlayerId::new("a")];
        assert!((rate.rate_per_minute.unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_players_without_rows_are_absent() {
        let mut history = vec![record(1, "A", "NYK", 30.0, 10.0)];
        let mut no_threes = record(1, "B", "NYK", 30.0, 12.0);
        no_threes.stats = StatLine::new().with(StatKind::Points, 12.0);
        history.push(no_threes);
        history[0].stats.set(StatKind::ThreesMade, 2.0);

        let threes = estimate_player_rates(&history, StatKind::ThreesMade, 10.0);
        assert_eq!(threes.len(), 1);
        assert!(threes.contains_key(&PlayerId::new("A")));
    }

    #[test]
    fn test_weights_are_per_player() {
        // B only appears on old dates; its estimate uses its own dates.
        let history = vec![
            record(1, "B", "NYK", 30.0, 10.0),
            record(2, "B", "NYK", 30.0, 10.0),
            record(9, "A", "NYK", 30.0, 40.0),
        ];
        let rates = estimate_player_rates(&history, StatKind::Points, 10.0);
        assert!((rates[&PlayerId::new("b")].expected_value - 10.0).abs() < 1e-9);
        assert!((rates[&PlayerId::new("a")].expected_value - 40.0).abs() < 1e-9);
    }
}

mod opponents_tests {
    use super::*;

    #[test]
    fn test_ratio_against_day_mean() {
        let history = vec![
            record(1, "A", "XXX", 30.0, 120.0),
            record(1, "B", "YYY", 30.0, 80.0),
        ];
        let multipliers = calibrate_opponents(&history, StatKind::Points, 10.0);

        assert!((multipliers[&TeamCode::new("XXX")].multiplier - 1.2).abs() < 1e-9);
        assert!((multipliers[&TeamCode::new("YYY")].multiplier - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_unweighted_mean_is_one() {
        let history = vec![
            record(1, "A", "XXX", 30.0, 30.0),
            record(1, "B", "YYY", 30.0, 12.0),
            record(1, "C", "ZZZ", 30.0, 9.0),
            record(2, "A", "YYY", 30.0, 22.0),
            record(2, "B", "ZZZ", 30.0, 18.0),
            record(3, "C", "XXX", 30.0, 14.0),
            record(3, "A", "ZZZ", 30.0, 27.0),
        ];
        let multipliers = calibrate_opponents(&history, StatKind::Points, 10.0);
        assert_eq!(multipliers.len(), 3);

        let mean =
            multipliers.values().map(|m| m.multiplier).sum::<f64>() / multipliers.len() as f64;
        assert!((mean - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_all_zero_stat_is_neutral() {
        let history = vec![
            record(1, "A", "XXX", 30.0, 0.0),
            record(1, "B", "YYY", 30.0, 0.0),
        ];
        let multipliers = calibrate_opponents(&history, StatKind::Points, 10.0);
        for m in multipliers.values() {
            assert_eq!(m.multiplier, 1.0);
        }
    }

    #[test]
    fn test_empty_history_yields_nothing() {
        assert!(calibrate_opponents(&[], StatKind::Points, 10.0).is_empty());
    }
}

mod blend_tests {
    use super::*;

    #[test]
    fn test_blend_fallbacks() {
        let weights = BlendWeights::default();
        // No estimate and no multiplier collapses to the raw value
        assert!((blend(10.0, None, None, weights) - 10.0).abs() < 1e-12);
        assert!((blend(10.0, Some(20.0), None, weights) - 14.0).abs() < 1e-12);
        assert!((blend(10.0, None, Some(1.5), weights) - 12.0).abs() < 1e-12);
        assert!((blend(10.0, Some(20.0), Some(1.5), weights) - 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_blend_line_recomputes_pra() {
        let raw = StatLine::new()
            .with(StatKind::Points, 20.0)
            .with(StatKind::Rebounds, 8.0)
            .with(StatKind::Assists, 5.0);
        let out = blend_line(
            &raw,
            |stat| match stat {
                StatKind::Points => Some(25.0),
                _ => None,
            },
            |_| Some(1.1),
            BlendWeights::default(),
        );

        let pts = out.get(StatKind::Points).unwrap();
        let reb = out.get(StatKind::Rebounds).unwrap();
        let ast = out.get(StatKind::Assists).unwrap();
        assert!((out.get(StatKind::Pra).unwrap() - (pts + reb + ast)).abs() < 1e-9);
        assert!((pts - (0.6 * 20.0 + 0.4 * 25.0 * 1.1)).abs() < 1e-9);
    }

    #[test]
    fn test_missing_raw_stats_stay_missing() {
        let raw = StatLine::new().with(StatKind::Points, 20.0);
        let out = blend_line(&raw, |_| Some(1.0), |_| None, BlendWeights::default());
        assert_eq!(out.get(StatKind::Steals), None);
        assert_eq!(out.get(StatKind::Pra), None);
    }
}

mod calibration_tests {
    use super::*;

    fn history() -> Vec<DailyRecord> {
        vec![
            record(1, "A", "XXX", 30.0, 15.0),
            record(1, "B", "YYY", 25.0, 10.0),
            record(2, "A", "YYY", 30.0, 15.0),
            record(2, "B", "XXX", 25.0, 12.0),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let calibration = Calibration::build(&history(), &EngineConfig::default());
        let summary = &calibration.summary;

        assert_eq!(summary.rows_in_history, 4);
        assert_eq!(summary.distinct_players, 2);
        assert_eq!(summary.distinct_dates, 2);
        assert_eq!(summary.latest_date, Some(date(2)));
        assert_eq!(summary.halflife_days, 10.0);
        assert_eq!(summary.blend, BlendWeights::default());
        assert_eq!(summary.stats.len(), StatKind::BASE.len());
    }

    #[test]
    fn test_empty_history_projects_raw() {
        let calibration = Calibration::build(&[], &EngineConfig::default());
        let raw = StatLine::new().with(StatKind::Points, 21.0);
        let out = calibration.project(&PlayerId::new("nobody"), &TeamCode::new("XXX"), 30.0, &raw);
        assert!((out.get(StatKind::Points).unwrap() - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_project_pra_consistency() {
        let calibration = Calibration::build(&history(), &EngineConfig::default());
        let raw = StatLine::new()
            .with(StatKind::Points, 18.0)
            .with(StatKind::Rebounds, 7.0)
            .with(StatKind::Assists, 3.0);
        let out = calibration.project(&PlayerId::new("a"), &TeamCode::new("XXX"), 30.0, &raw);

        let sum = out.get(StatKind::Points).unwrap()
            + out.get(StatKind::Rebounds).unwrap()
            + out.get(StatKind::Assists).unwrap();
        assert!((out.get(StatKind::Pra).unwrap() - sum).abs() < 1e-9);
    }

    #[test]
    fn test_scale_by_minutes() {
        let config = EngineConfig {
            scale_by_minutes: true,
            ..EngineConfig::default()
        };
        let history = vec![
            record(1, "A", "XXX", 30.0, 15.0),
            record(2, "A", "XXX", 30.0, 15.0),
        ];
        let calibration = Calibration::build(&history, &config);
        let raw = StatLine::new().with(StatKind::Points, 15.0);

        // Unknown opponent: multiplier 1.0, estimate 0.5/min * 40 = 20
        let out = calibration.project(&PlayerId::new("a"), &TeamCode::new("ZZZ"), 40.0, &raw);
        assert!((out.get(StatKind::Points).unwrap() - 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = Calibration::build(&history(), &EngineConfig::default());
        let b = Calibration::build(&history(), &EngineConfig::default());
        assert_eq!(a, b);
    }
}
