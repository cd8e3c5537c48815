//! Next-game performance prediction from rolling form and a learned model.
//!
//! This module provides:
//! - Rolling-window (5 game) form estimates with dispersion
//! - A lazily built, cached bagged-tree model per (player, stat)
//! - A degraded-accuracy mean fallback below the history threshold
//!
//! The model cache is the engine's only cross-call state. It is owned by
//! the predictor instance and guarded by an RwLock; create a fresh
//! predictor per session or call `reset` to drop cached models.

use crate::forest::{BaggedForest, ForestConfig};
use crate::models::{PredictionResult, StatKind};
use crate::stats::{mean, median, rolling_means, sample_std, trailing};
use crate::store::GameRecordStore;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PredictorConfig {
    /// Games required before the model/rolling path is used; below this the
    /// predictor falls back to the plain historical mean.
    pub min_history: usize,
    /// Trailing window for form estimates and the rolling-mean feature.
    pub rolling_window: usize,
    /// Complete training rows required before a model is built.
    pub min_training_rows: usize,
    pub forest: ForestConfig,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            min_history: 10,
            rolling_window: 5,
            min_training_rows: 10,
            forest: ForestConfig::default(),
        }
    }
}

/// Recent-window summary of a player's stat.
#[derive(Debug, Clone, Copy)]
pub struct Baseline {
    pub mean: f64,
    pub median: f64,
    pub std: Option<f64>,
    pub sample_size: usize,
}

pub struct PerformancePredictor<'a> {
    store: &'a GameRecordStore,
    config: PredictorConfig,
    models: RwLock<FxHashMap<(String, StatKind), Arc<BaggedForest>>>,
}

impl<'a> PerformancePredictor<'a> {
    pub fn new(store: &'a GameRecordStore) -> Self {
        Self::with_config(store, PredictorConfig::default())
    }

    pub fn with_config(store: &'a GameRecordStore, config: PredictorConfig) -> Self {
        Self {
            store,
            config,
            models: RwLock::new(FxHashMap::default()),
        }
    }

    /// Drop all cached models.
    pub fn reset(&self) {
        self.models.write().clear();
    }

    /// Number of cached models (test and diagnostics hook).
    pub fn cached_models(&self) -> usize {
        self.models.read().len()
    }

    /// Predict the player's next-game stat.
    ///
    /// `None` only when the player has no games with the stat defined.
    /// Below `min_history` games the estimate degrades to the historical
    /// mean; otherwise the cached model (or the trailing mean when no model
    /// could be built) supplies the point estimate and the trailing window
    /// supplies the dispersion.
    pub fn predict(
        &self,
        player_id: &str,
        stat: StatKind,
        is_home: bool,
        expected_minutes: f64,
    ) -> Option<PredictionResult> {
        let values = self.store.player_stat_values(player_id, stat);
        if values.is_empty() {
            return None;
        }

        if values.len() < self.config.min_history {
            log::debug!(
                "{} has {} games of {}, using historical mean fallback",
                player_id,
                values.len(),
                stat
            );
            return Some(PredictionResult::new(mean(&values)?, sample_std(&values)));
        }

        let tail = trailing(&values, self.config.rolling_window);
        let rolling_avg = mean(tail)?;
        let rolling_std = sample_std(tail);

        let value = match self.model_for(player_id, stat) {
            Some(model) => {
                let home = if is_home { 1.0 } else { 0.0 };
                model.predict(&[expected_minutes, home, rolling_avg])
            }
            None => rolling_avg,
        };

        Some(PredictionResult::new(value, rolling_std))
    }

    /// Recent-window baseline over the player's most recent `last_n` games
    /// with the stat defined.
    pub fn baseline(&self, player_id: &str, stat: StatKind, last_n: usize) -> Option<Baseline> {
        let values = self.store.player_stat_values(player_id, stat);
        let recent = trailing(&values, last_n.max(1));
        Some(Baseline {
            mean: mean(recent)?,
            median: median(recent)?,
            std: sample_std(recent),
            sample_size: recent.len(),
        })
    }

    fn model_for(&self, player_id: &str, stat: StatKind) -> Option<Arc<BaggedForest>> {
        let key = (player_id.to_string(), stat);
        if let Some(model) = self.models.read().get(&key) {
            return Some(Arc::clone(model));
        }

        // Build outside the lock; a concurrent build of the same key just
        // overwrites with an identical model (training is deterministic).
        let model = Arc::new(self.build_model(player_id, stat)?);
        self.models.write().insert(key, Arc::clone(&model));
        Some(model)
    }

    /// Train on [minutes, home, rolling mean] -> stat over the player's
    /// complete rows. `None` below the training-row threshold; build
    /// failures are not cached so later calls may retry with more data.
    fn build_model(&self, player_id: &str, stat: StatKind) -> Option<BaggedForest> {
        let records = self.store.player_records(player_id);

        // Rolling mean is computed over defined stat values only, windowed
        // by the player's played games.
        let played: Vec<(&crate::models::GameRecord, f64)> = records
            .iter()
            .filter_map(|r| r.stat(stat).map(|v| (*r, v)))
            .collect();
        let series: Vec<f64> = played.iter().map(|(_, v)| *v).collect();
        let rolled = rolling_means(&series, self.config.rolling_window);

        let mut rows = Vec::with_capacity(played.len());
        let mut targets = Vec::with_capacity(played.len());
        for ((record, value), rolling) in played.iter().zip(rolled) {
            let minutes = match record.minutes {
                Some(m) => m,
                None => continue,
            };
            let home = if record.is_home() { 1.0 } else { 0.0 };
            rows.push(vec![minutes, home, rolling]);
            targets.push(*value);
        }

        if rows.len() < self.config.min_training_rows {
            log::debug!(
                "{} has {} complete training rows for {}, need {}; skipping model",
                player_id,
                rows.len(),
                stat,
                self.config.min_training_rows
            );
            return None;
        }

        let model = BaggedForest::fit(&rows, &targets, &self.config.forest)?;
        log::debug!(
            "built {} model for {} ({} rows, mae {:.2})",
            stat,
            player_id,
            rows.len(),
            model.mean_abs_error(&rows, &targets)
        );
        Some(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameRecord;
    use chrono::NaiveDate;

    const PLAYER: &str = "1630178";

    fn make_record(game: u32, points: Option<f64>, minutes: Option<f64>, home: bool) -> GameRecord {
        GameRecord {
            game_id: format!("g{:02}", game),
            game_date: NaiveDate::from_ymd_opt(2024, 10, 25).unwrap()
                + chrono::Days::new(2 * game as u64),
            matchup: if home { "PHI vs. BOS" } else { "PHI @ BOS" }.to_string(),
            team_id: "phi".to_string(),
            player_id: PLAYER.to_string(),
            player_name: "Tyrese Maxey".to_string(),
            minutes,
            points,
            rebounds: None,
            assists: None,
            fg_pct: None,
        }
    }

    fn store_with_games(n: u32) -> GameRecordStore {
        let mut store = GameRecordStore::new();
        for game in 0..n {
            let points = 20.0 + (game % 5) as f64;
            store
                .insert(make_record(game, Some(points), Some(34.0), game % 2 == 0))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_no_records_no_prediction() {
        let store = GameRecordStore::new();
        let predictor = PerformancePredictor::new(&store);
        assert!(predictor
            .predict(PLAYER, StatKind::Points, true, 34.0)
            .is_none());
    }

    #[test]
    fn test_short_history_falls_back_to_mean() {
        let store = store_with_games(4); // points 20, 21, 22, 23
        let predictor = PerformancePredictor::new(&store);
        let result = predictor
            .predict(PLAYER, StatKind::Points, true, 34.0)
            .unwrap();
        assert!((result.value - 21.5).abs() < 1e-9);
        assert!(result.std_dev.is_some());
        // Mean fallback builds no model.
        assert_eq!(predictor.cached_models(), 0);
    }

    #[test]
    fn test_full_history_prediction_in_range() {
        let store = store_with_games(30);
        let predictor = PerformancePredictor::new(&store);
        let result = predictor
            .predict(PLAYER, StatKind::Points, true, 34.0)
            .unwrap();
        // Targets live in [20, 24]; tree leaves average targets, so the
        // prediction cannot leave that envelope.
        assert!(result.value >= 20.0 && result.value <= 24.0);
        assert!(result.std_dev.is_some());
        assert!(result.ci_low.unwrap() < result.value);
        assert!(result.ci_high.unwrap() > result.value);
        assert_eq!(predictor.cached_models(), 1);
    }

    #[test]
    fn test_model_cached_once_and_reset_clears() {
        let store = store_with_games(30);
        let predictor = PerformancePredictor::new(&store);
        predictor.predict(PLAYER, StatKind::Points, true, 34.0);
        predictor.predict(PLAYER, StatKind::Points, false, 28.0);
        assert_eq!(predictor.cached_models(), 1);

        predictor.reset();
        assert_eq!(predictor.cached_models(), 0);
    }

    #[test]
    fn test_models_keyed_per_stat() {
        let mut store = GameRecordStore::new();
        for game in 0..15 {
            let mut record = make_record(game, Some(22.0), Some(34.0), true);
            record.rebounds = Some(5.0 + (game % 2) as f64);
            store.insert(record).unwrap();
        }
        let predictor = PerformancePredictor::new(&store);
        predictor.predict(PLAYER, StatKind::Points, true, 34.0);
        predictor.predict(PLAYER, StatKind::Rebounds, true, 34.0);
        assert_eq!(predictor.cached_models(), 2);
    }

    #[test]
    fn test_missing_minutes_rows_dropped_from_training() {
        let mut store = GameRecordStore::new();
        // 12 games with the stat, but only 6 with minutes: below the
        // training gate, so the rolling mean is used directly.
        for game in 0..12 {
            let minutes = if game % 2 == 0 { Some(30.0) } else { None };
            store
                .insert(make_record(game, Some(18.0 + (game % 3) as f64), minutes, true))
                .unwrap();
        }
        let predictor = PerformancePredictor::new(&store);
        let result = predictor
            .predict(PLAYER, StatKind::Points, true, 30.0)
            .unwrap();
        assert_eq!(predictor.cached_models(), 0);
        // Last 5 points: games 7..12 -> 19, 20, 18, 19, 20
        assert!((result.value - 19.2).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_recent_window() {
        let store = store_with_games(20);
        let predictor = PerformancePredictor::new(&store);
        let baseline = predictor.baseline(PLAYER, StatKind::Points, 15).unwrap();
        assert_eq!(baseline.sample_size, 15);
        assert!(baseline.mean >= 20.0 && baseline.mean <= 24.0);
        assert!(baseline.std.is_some());
        assert!(predictor.baseline("ghost", StatKind::Points, 15).is_none());
    }
}
