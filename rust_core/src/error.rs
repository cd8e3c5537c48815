//! Error taxonomy for the analysis library.
//!
//! Estimation-stage shortfalls (too few games, no resolvable line) degrade
//! gracefully and are reported as `None` results or skip entries, not
//! errors. The variants here are the conditions that must surface to the
//! caller.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Caller passed a win probability outside [0, 1] to stake sizing.
    #[error("invalid win probability {0}: must be within [0, 1]")]
    InvalidProbability(f64),

    /// A record with this (game, player) pair already exists in the store.
    #[error("duplicate record for game {game_id}, player {player_id}")]
    DuplicateRecord { game_id: String, player_id: String },

    /// Ledger settlement referenced a bet that was never placed.
    #[error("unknown bet id {0}")]
    UnknownBet(Uuid),

    #[error("ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
