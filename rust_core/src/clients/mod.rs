//! External data-provider clients.

pub mod nba;

pub use nba::NbaStatsClient;

use crate::models::GameRecord;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A player on a fetched roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: String,
    pub player_name: String,
}

/// A player matched by a name search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSearchResult {
    pub player_id: String,
    pub display_name: String,
    pub team_id: String,
}

/// Source of game logs and rosters.
///
/// Implementations supply tabular records; the engine never talks to the
/// network directly.
#[async_trait]
pub trait GameLogProvider: Send + Sync {
    /// A player's game log for one season.
    async fn fetch_player_game_log(
        &self,
        player_id: &str,
        player_name: &str,
        season: &str,
    ) -> Result<Vec<GameRecord>>;

    /// Current roster for a team.
    async fn fetch_team_roster(&self, team_id: &str, season: &str) -> Result<Vec<RosterEntry>>;

    /// Provider name for logging.
    fn provider_name(&self) -> &str;
}
