//! Bet tracking with JSON persistence.
//!
//! This module provides:
//! - An append-and-settle ledger of placed wagers
//! - Win/loss settlement at the standard -110 payout
//! - ROI summary over completed bets
//! - Load/save against a JSON file

use crate::edge::STANDARD_NET_ODDS;
use crate::error::AnalysisError;
use crate::models::{BetRecord, BetResult, BetSide, StatKind};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BetLedger {
    bets: Vec<BetRecord>,
}

/// Aggregates over completed (non-pending) bets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_bets: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate_pct: f64,
    pub total_wagered: f64,
    pub total_profit: f64,
    pub roi_pct: f64,
}

impl BetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; a missing file starts an empty ledger.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AnalysisError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Record a new pending bet. Returns its id.
    #[allow(clippy::too_many_arguments)]
    pub fn add_bet(
        &mut self,
        player_name: impl Into<String>,
        stat: StatKind,
        line: f64,
        side: BetSide,
        prediction: f64,
        amount: f64,
        edge_pct: f64,
        confidence_pct: f64,
        notes: impl Into<String>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let player_name = player_name.into();
        log::info!(
            "bet added: {} {} {} {} (${:.2})",
            player_name,
            side,
            line,
            stat,
            amount
        );
        self.bets.push(BetRecord {
            id,
            placed_at: Utc::now(),
            player_name,
            stat,
            line,
            side,
            prediction,
            amount,
            actual: None,
            result: BetResult::Pending,
            profit: None,
            edge_pct,
            confidence_pct,
            notes: notes.into(),
        });
        id
    }

    /// Settle a bet against the actual stat value; returns the profit.
    ///
    /// Over wins strictly above the line, Under strictly below; a push
    /// settles as a loss for either side. Wins pay at -110.
    pub fn settle(&mut self, id: Uuid, actual: f64) -> Result<f64, AnalysisError> {
        let bet = self
            .bets
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(AnalysisError::UnknownBet(id))?;

        let won = match bet.side {
            BetSide::Over => actual > bet.line,
            BetSide::Under => actual < bet.line,
        };
        let profit = if won {
            bet.amount * STANDARD_NET_ODDS
        } else {
            -bet.amount
        };

        bet.actual = Some(actual);
        bet.result = if won { BetResult::Win } else { BetResult::Loss };
        bet.profit = Some(profit);

        log::info!(
            "bet settled: {} posted {:.1} ({:?}, {:+.2})",
            bet.player_name,
            actual,
            bet.result,
            profit
        );
        Ok(profit)
    }

    pub fn pending(&self) -> Vec<&BetRecord> {
        self.bets
            .iter()
            .filter(|b| b.result == BetResult::Pending)
            .collect()
    }

    pub fn all(&self) -> &[BetRecord] {
        &self.bets
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    /// Summary over completed bets; zeros when nothing has settled.
    pub fn summary(&self) -> LedgerSummary {
        let completed: Vec<&BetRecord> = self
            .bets
            .iter()
            .filter(|b| b.result != BetResult::Pending)
            .collect();

        let total_bets = completed.len();
        let wins = completed
            .iter()
            .filter(|b| b.result == BetResult::Win)
            .count();
        let losses = total_bets - wins;
        let total_wagered: f64 = completed.iter().map(|b| b.amount).sum();
        let total_profit: f64 = completed.iter().filter_map(|b| b.profit).sum();

        let win_rate_pct = if total_bets == 0 {
            0.0
        } else {
            wins as f64 / total_bets as f64 * 100.0
        };
        let roi_pct = if total_wagered == 0.0 {
            0.0
        } else {
            total_profit / total_wagered * 100.0
        };

        LedgerSummary {
            total_bets,
            wins,
            losses,
            win_rate_pct,
            total_wagered,
            total_profit,
            roi_pct,
        }
    }
}
