//! In-memory store of per-player-per-game performance records.
//!
//! The store is the engine's only data source: the provider client or the
//! synthetic generator fills it, and every estimator reads it immutably.

use crate::error::AnalysisError;
use crate::models::{GameRecord, StatKind};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Default)]
pub struct GameRecordStore {
    records: Vec<GameRecord>,
    by_player: FxHashMap<String, Vec<usize>>,
    keys: FxHashSet<(String, String)>,
}

impl GameRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one record. Rejects a duplicate (game, player) pair.
    pub fn insert(&mut self, record: GameRecord) -> Result<(), AnalysisError> {
        let key = (record.game_id.clone(), record.player_id.clone());
        if self.keys.contains(&key) {
            return Err(AnalysisError::DuplicateRecord {
                game_id: record.game_id,
                player_id: record.player_id,
            });
        }
        self.keys.insert(key);
        let index = self.records.len();
        self.by_player
            .entry(record.player_id.clone())
            .or_default()
            .push(index);
        self.records.push(record);
        Ok(())
    }

    /// Bulk insert; stops at the first duplicate. Returns the count inserted.
    pub fn extend<I>(&mut self, records: I) -> Result<usize, AnalysisError>
    where
        I: IntoIterator<Item = GameRecord>,
    {
        let mut inserted = 0;
        for record in records {
            self.insert(record)?;
            inserted += 1;
        }
        Ok(inserted)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All of a player's records in chronological order (date, then game id).
    pub fn player_records(&self, player_id: &str) -> Vec<&GameRecord> {
        let mut records: Vec<&GameRecord> = self
            .by_player
            .get(player_id)
            .map(|indices| indices.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default();
        records.sort_by(|a, b| {
            a.game_date
                .cmp(&b.game_date)
                .then_with(|| a.game_id.cmp(&b.game_id))
        });
        records
    }

    /// Chronological defined values of one stat for one player.
    pub fn player_stat_values(&self, player_id: &str, stat: StatKind) -> Vec<f64> {
        self.player_records(player_id)
            .iter()
            .filter_map(|r| r.stat(stat))
            .collect()
    }

    /// Display name from the player's first stored record.
    pub fn player_name(&self, player_id: &str) -> Option<&str> {
        self.by_player
            .get(player_id)
            .and_then(|indices| indices.first())
            .map(|&i| self.records[i].player_name.as_str())
    }

    /// Distinct (player_id, player_name) pairs on a team, in order of first
    /// appearance.
    pub fn team_players(&self, team_id: &str) -> Vec<(String, String)> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut players = Vec::new();
        for record in &self.records {
            if record.team_id == team_id && seen.insert(record.player_id.as_str()) {
                players.push((record.player_id.clone(), record.player_name.clone()));
            }
        }
        players
    }

    /// Game ids in which the player has a defined value for `stat` — the
    /// "played" set used to partition teammates' games.
    pub fn games_played(&self, player_id: &str, stat: StatKind) -> FxHashSet<&str> {
        self.by_player
            .get(player_id)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| &self.records[i])
                    .filter(|r| r.stat(stat).is_some())
                    .map(|r| r.game_id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}
