// Shared models for the Benchwatch analysis library
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Stats & Game Records
// ============================================================================

/// Per-game statistic categories tracked by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    #[serde(rename = "PTS")]
    Points,
    #[serde(rename = "REB")]
    Rebounds,
    #[serde(rename = "AST")]
    Assists,
    #[serde(rename = "FG_PCT")]
    FieldGoalPct,
}

impl StatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::Points => "PTS",
            StatKind::Rebounds => "REB",
            StatKind::Assists => "AST",
            StatKind::FieldGoalPct => "FG_PCT",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PTS" => Ok(StatKind::Points),
            "REB" => Ok(StatKind::Rebounds),
            "AST" => Ok(StatKind::Assists),
            "FG_PCT" => Ok(StatKind::FieldGoalPct),
            other => Err(format!("unknown stat kind: {}", other)),
        }
    }
}

/// One player's box-score line in one game.
///
/// Stat fields are `None` for players who did not play. Records are
/// append-only; (game_id, player_id) is unique within a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    pub game_date: NaiveDate,
    /// Matchup text as the provider reports it, e.g. "PHI vs. BOS" (home)
    /// or "PHI @ BOS" (road).
    pub matchup: String,
    pub team_id: String,
    pub player_id: String,
    pub player_name: String,
    pub minutes: Option<f64>,
    pub points: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub fg_pct: Option<f64>,
}

impl GameRecord {
    /// Value of the given stat, if the player posted one in this game.
    pub fn stat(&self, kind: StatKind) -> Option<f64> {
        match kind {
            StatKind::Points => self.points,
            StatKind::Rebounds => self.rebounds,
            StatKind::Assists => self.assists,
            StatKind::FieldGoalPct => self.fg_pct,
        }
    }

    /// Home game iff the matchup text uses "vs." rather than "@".
    pub fn is_home(&self) -> bool {
        self.matchup.contains("vs.")
    }
}

// ============================================================================
// Impact & Prediction Results
// ============================================================================

/// With/without-star split statistics for one (star, teammate, stat) triple.
///
/// Standard deviations are `None` when a partition holds fewer than two
/// defined values; the p-value is `None` when either partition is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactResult {
    pub with_star_avg: f64,
    pub without_star_avg: f64,
    /// without-star mean minus with-star mean.
    pub difference: f64,
    /// difference / with-star mean * 100; exactly 0 when the with-star mean is 0.
    pub percent_change: f64,
    pub with_star_count: usize,
    pub without_star_count: usize,
    pub with_star_std: Option<f64>,
    pub without_star_std: Option<f64>,
    pub p_value: Option<f64>,
    pub significant: bool,
}

/// Point estimate plus dispersion for a player's next-game stat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictionResult {
    pub value: f64,
    pub std_dev: Option<f64>,
    pub ci_low: Option<f64>,
    pub ci_high: Option<f64>,
}

impl PredictionResult {
    /// 95% interval half-width multiplier.
    const Z_95: f64 = 1.96;

    pub fn new(value: f64, std_dev: Option<f64>) -> Self {
        Self {
            value,
            std_dev,
            ci_low: std_dev.map(|s| value - Self::Z_95 * s),
            ci_high: std_dev.map(|s| value + Self::Z_95 * s),
        }
    }
}

// ============================================================================
// Betting Opportunities
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "OVER")]
    Over,
    #[serde(rename = "UNDER")]
    Under,
    #[serde(rename = "NO_BET")]
    NoBet,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Recommendation::Over => "OVER",
            Recommendation::Under => "UNDER",
            Recommendation::NoBet => "NO BET",
        };
        f.write_str(s)
    }
}

/// A prop bet flagged by the team-wide scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingOpportunity {
    pub player_id: String,
    pub player_name: String,
    pub stat: StatKind,
    pub prediction: f64,
    pub line: f64,
    pub recommendation: Recommendation,
    /// Expected value as a fraction of stake.
    pub edge: f64,
    /// Win probability of the recommended side.
    pub confidence: f64,
    pub with_star_avg: f64,
    pub without_star_avg: f64,
    pub difference: f64,
    /// Without-star games backing the recommendation.
    pub sample_size: usize,
}

/// Why a teammate was excluded from a scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum SkipReason {
    InsufficientData { without_star_games: usize },
    BelowMateriality { difference: f64 },
    MissingLine { difference: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedTeammate {
    pub player_id: String,
    pub player_name: String,
    pub reason: SkipReason,
}

// ============================================================================
// Stake Sizing
// ============================================================================

/// Bankroll fractions recommended by the Kelly sizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StakeRecommendation {
    pub full_kelly: f64,
    pub conservative: f64,
}

impl StakeRecommendation {
    /// Dollar stakes (full, conservative) for a given bankroll.
    pub fn dollars(&self, bankroll: f64) -> (f64, f64) {
        (self.full_kelly * bankroll, self.conservative * bankroll)
    }
}

// ============================================================================
// Bet Ledger Records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BetSide {
    #[serde(rename = "OVER")]
    Over,
    #[serde(rename = "UNDER")]
    Under,
}

impl fmt::Display for BetSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetSide::Over => f.write_str("OVER"),
            BetSide::Under => f.write_str("UNDER"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetResult {
    Pending,
    Win,
    Loss,
}

/// A tracked wager, settled once the actual stat value is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetRecord {
    pub id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub player_name: String,
    pub stat: StatKind,
    pub line: f64,
    pub side: BetSide,
    pub prediction: f64,
    pub amount: f64,
    pub actual: Option<f64>,
    pub result: BetResult,
    pub profit: Option<f64>,
    pub edge_pct: f64,
    pub confidence_pct: f64,
    #[serde(default)]
    pub notes: String,
}
