//! With/without-star split statistics for teammate performance.
//!
//! This module provides:
//! - Partitioning a teammate's game log by the star's participation
//! - Mean/count/spread per partition with a two-sample significance test
//! - Batch measurement across many teammates in parallel

use crate::models::{GameRecord, ImpactResult, StatKind};
use crate::stats::{mean, sample_std, two_sample_t_test};
use crate::store::GameRecordStore;
use rayon::prelude::*;

/// Significance threshold for the two-sample test.
const SIGNIFICANCE_ALPHA: f64 = 0.05;

/// Default minimum without-star games before an impact is reported.
pub const DEFAULT_MIN_SAMPLES_WITHOUT: usize = 5;

/// A teammate's records split by whether the star played that game.
///
/// The partitions are disjoint and together cover every record of the
/// teammate; they are recomputed on demand and never cached.
#[derive(Debug)]
pub struct StarAbsenceSplit<'a> {
    pub with_star: Vec<&'a GameRecord>,
    pub without_star: Vec<&'a GameRecord>,
}

pub struct ImpactEstimator<'a> {
    store: &'a GameRecordStore,
}

impl<'a> ImpactEstimator<'a> {
    pub fn new(store: &'a GameRecordStore) -> Self {
        Self { store }
    }

    /// Partition a teammate's records by the star's participation.
    ///
    /// The star "played" a game when it has a defined value for `stat` in
    /// that game.
    pub fn split(&self, star_id: &str, teammate_id: &str, stat: StatKind) -> StarAbsenceSplit<'a> {
        let star_games = self.store.games_played(star_id, stat);
        let (with_star, without_star) = self
            .store
            .player_records(teammate_id)
            .into_iter()
            .partition(|record| star_games.contains(record.game_id.as_str()));
        StarAbsenceSplit {
            with_star,
            without_star,
        }
    }

    /// Measure how the teammate's `stat` shifts when the star sits.
    ///
    /// Returns `None` when fewer than `min_samples_without` without-star
    /// games carry a defined stat value. Partition statistics are computed
    /// over defined values only, so a DNP row never counts toward a sample
    /// gate.
    pub fn measure_impact(
        &self,
        star_id: &str,
        teammate_id: &str,
        stat: StatKind,
        min_samples_without: usize,
    ) -> Option<ImpactResult> {
        let split = self.split(star_id, teammate_id, stat);

        let with_values: Vec<f64> = split.with_star.iter().filter_map(|r| r.stat(stat)).collect();
        let without_values: Vec<f64> = split
            .without_star
            .iter()
            .filter_map(|r| r.stat(stat))
            .collect();

        if without_values.is_empty() || without_values.len() < min_samples_without {
            log::debug!(
                "teammate {} has {} without-star games for {}, need {}",
                teammate_id,
                without_values.len(),
                stat,
                min_samples_without
            );
            return None;
        }

        // A teammate whose whole log predates the star reads as a zero
        // with-star baseline; the percent-change rule below keeps that path
        // defined.
        let with_star_avg = mean(&with_values).unwrap_or(0.0);
        let without_star_avg = mean(&without_values)?;
        let difference = without_star_avg - with_star_avg;
        let percent_change = if with_star_avg == 0.0 {
            0.0
        } else {
            difference / with_star_avg * 100.0
        };

        let test = if with_values.is_empty() {
            None
        } else {
            two_sample_t_test(&without_values, &with_values)
        };
        let p_value = test.map(|t| t.p_value);
        let significant = p_value.map(|p| p < SIGNIFICANCE_ALPHA).unwrap_or(false);

        Some(ImpactResult {
            with_star_avg,
            without_star_avg,
            difference,
            percent_change,
            with_star_count: with_values.len(),
            without_star_count: without_values.len(),
            with_star_std: sample_std(&with_values),
            without_star_std: sample_std(&without_values),
            p_value,
            significant,
        })
    }

    /// Measure impacts for many teammates in parallel.
    pub fn batch_measure(
        &self,
        star_id: &str,
        teammate_ids: &[String],
        stat: StatKind,
        min_samples_without: usize,
    ) -> Vec<(String, Option<ImpactResult>)> {
        teammate_ids
            .par_iter()
            .map(|teammate_id| {
                (
                    teammate_id.clone(),
                    self.measure_impact(star_id, teammate_id, stat, min_samples_without),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameRecord;
    use chrono::NaiveDate;

    const STAR: &str = "star";
    const MATE: &str = "mate";

    fn make_record(game: u32, player_id: &str, points: Option<f64>) -> GameRecord {
        GameRecord {
            game_id: format!("g{:02}", game),
            game_date: NaiveDate::from_ymd_opt(2024, 11, 1).unwrap() + chrono::Days::new(game as u64),
            matchup: "PHI vs. BOS".to_string(),
            team_id: "phi".to_string(),
            player_id: player_id.to_string(),
            player_name: player_id.to_string(),
            minutes: points.map(|_| 33.0),
            points,
            rebounds: None,
            assists: None,
            fg_pct: None,
        }
    }

    /// 8 shared games at 16 ppg, 4 solo games at 22 ppg.
    fn make_store() -> GameRecordStore {
        let mut store = GameRecordStore::new();
        for game in 0..8 {
            store.insert(make_record(game, STAR, Some(28.0))).unwrap();
            store.insert(make_record(game, MATE, Some(16.0))).unwrap();
        }
        for game in 8..12 {
            store.insert(make_record(game, MATE, Some(22.0))).unwrap();
        }
        store
    }

    #[test]
    fn test_split_partitions_are_disjoint_and_cover() {
        let store = make_store();
        let estimator = ImpactEstimator::new(&store);
        let split = estimator.split(STAR, MATE, StatKind::Points);

        assert_eq!(split.with_star.len(), 8);
        assert_eq!(split.without_star.len(), 4);

        let with_ids: Vec<&str> = split.with_star.iter().map(|r| r.game_id.as_str()).collect();
        for record in &split.without_star {
            assert!(!with_ids.contains(&record.game_id.as_str()));
        }
        assert_eq!(
            split.with_star.len() + split.without_star.len(),
            store.player_records(MATE).len()
        );
    }

    #[test]
    fn test_star_dnp_games_count_as_absent() {
        let mut store = make_store();
        // Star appears in game 8 but with no stat value (did not play).
        store.insert(make_record(8, STAR, None)).unwrap();

        let estimator = ImpactEstimator::new(&store);
        let split = estimator.split(STAR, MATE, StatKind::Points);
        assert_eq!(split.without_star.len(), 4);
    }

    #[test]
    fn test_measure_impact_statistics() {
        let store = make_store();
        let estimator = ImpactEstimator::new(&store);
        let impact = estimator
            .measure_impact(STAR, MATE, StatKind::Points, 3)
            .unwrap();

        assert!((impact.with_star_avg - 16.0).abs() < 1e-9);
        assert!((impact.without_star_avg - 22.0).abs() < 1e-9);
        assert!((impact.difference - 6.0).abs() < 1e-9);
        assert!((impact.percent_change - 37.5).abs() < 1e-9);
        assert_eq!(impact.with_star_count, 8);
        assert_eq!(impact.without_star_count, 4);
    }

    #[test]
    fn test_measure_impact_below_sample_gate() {
        let store = make_store();
        let estimator = ImpactEstimator::new(&store);
        // 4 without-star games, default gate of 5.
        assert!(estimator
            .measure_impact(STAR, MATE, StatKind::Points, DEFAULT_MIN_SAMPLES_WITHOUT)
            .is_none());
    }

    #[test]
    fn test_measure_impact_unknown_teammate() {
        let store = make_store();
        let estimator = ImpactEstimator::new(&store);
        assert!(estimator
            .measure_impact(STAR, "ghost", StatKind::Points, 1)
            .is_none());
    }

    #[test]
    fn test_percent_change_zero_when_with_star_mean_zero() {
        let mut store = GameRecordStore::new();
        for game in 0..3 {
            store.insert(make_record(game, STAR, Some(30.0))).unwrap();
            store.insert(make_record(game, MATE, Some(0.0))).unwrap();
        }
        for game in 3..8 {
            store.insert(make_record(game, MATE, Some(10.0))).unwrap();
        }

        let estimator = ImpactEstimator::new(&store);
        let impact = estimator
            .measure_impact(STAR, MATE, StatKind::Points, 3)
            .unwrap();
        assert!((impact.with_star_avg - 0.0).abs() < 1e-9);
        assert!((impact.difference - 10.0).abs() < 1e-9);
        assert!((impact.percent_change - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_significance_flag_on_separated_samples() {
        let mut store = GameRecordStore::new();
        for game in 0..15 {
            store.insert(make_record(game, STAR, Some(28.0))).unwrap();
            let noise = (game % 3) as f64;
            store
                .insert(make_record(game, MATE, Some(15.0 + noise)))
                .unwrap();
        }
        for game in 15..30 {
            let noise = (game % 3) as f64;
            store
                .insert(make_record(game, MATE, Some(25.0 + noise)))
                .unwrap();
        }

        let estimator = ImpactEstimator::new(&store);
        let impact = estimator
            .measure_impact(STAR, MATE, StatKind::Points, 3)
            .unwrap();
        assert!(impact.p_value.unwrap() < 0.05);
        assert!(impact.significant);
    }

    #[test]
    fn test_no_significance_without_with_star_games() {
        let mut store = GameRecordStore::new();
        for game in 0..6 {
            store.insert(make_record(game, MATE, Some(20.0))).unwrap();
        }

        let estimator = ImpactEstimator::new(&store);
        let impact = estimator
            .measure_impact(STAR, MATE, StatKind::Points, 3)
            .unwrap();
        assert_eq!(impact.with_star_count, 0);
        assert!(impact.p_value.is_none());
        assert!(!impact.significant);
        assert!((impact.percent_change - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_batch_measure_matches_single() {
        let store = make_store();
        let estimator = ImpactEstimator::new(&store);
        let results = estimator.batch_measure(
            STAR,
            &[MATE.to_string(), "ghost".to_string()],
            StatKind::Points,
            3,
        );
        assert_eq!(results.len(), 2);
        let mate = results.iter().find(|(id, _)| id == MATE).unwrap();
        assert!((mate.1.as_ref().unwrap().difference - 6.0).abs() < 1e-9);
        let ghost = results.iter().find(|(id, _)| id == "ghost").unwrap();
        assert!(ghost.1.is_none());
    }
}
