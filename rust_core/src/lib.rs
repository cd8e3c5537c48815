//! Benchwatch Core - injury impact analysis and betting edge detection.
//!
//! This library estimates how a star player's absence shifts teammates'
//! per-game production and flags prop lines whose implied distribution
//! carries positive expected value. It provides:
//! - With/without-star split statistics with a two-sample significance test
//! - Per-player performance prediction backed by a cached bagged-tree model
//! - Betting line evaluation (win probabilities, expected value at -110)
//! - Team-wide opportunity scanning ranked by edge
//! - Fractional-Kelly stake sizing
//! - A bet ledger with JSON persistence
//! - An NBA stats-provider client and a seeded synthetic season generator

pub mod clients;
pub mod config;
pub mod edge;
pub mod error;
pub mod forest;
pub mod impact;
pub mod ledger;
pub mod models;
pub mod predictor;
pub mod ranker;
pub mod stake;
pub mod stats;
pub mod store;
pub mod synthetic;

pub use config::AnalysisConfig;
pub use edge::{EdgeCalculator, LineEvaluation, DEFAULT_EDGE_THRESHOLD, STANDARD_NET_ODDS};
pub use error::AnalysisError;
pub use impact::{ImpactEstimator, StarAbsenceSplit, DEFAULT_MIN_SAMPLES_WITHOUT};
pub use ledger::{BetLedger, LedgerSummary};
pub use models::*;
pub use predictor::{Baseline, PerformancePredictor, PredictorConfig};
pub use ranker::{LineBook, OpportunityRanker, OpportunityScan, TeammateImpact};
pub use stake::{kelly_stake, kelly_stake_default, DEFAULT_KELLY_FRACTION};
pub use store::GameRecordStore;
pub use synthetic::{generate_sample_season, SyntheticSeasonConfig};
