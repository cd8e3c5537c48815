//! NBA stats API client.
//!
//! Fetches player game logs, rosters, and player lookups from the public
//! stats endpoint. Responses arrive as `resultSets` tables (parallel
//! `headers` and `rowSet` arrays), which are decoded by column name into
//! `GameRecord`s. Roster-wide fetches run sequentially with a fixed
//! inter-request delay; retry policy is out of scope.

use crate::clients::{GameLogProvider, PlayerSearchResult, RosterEntry};
use crate::models::GameRecord;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://stats.nba.com/stats";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Fixed pause between roster-wide requests.
const REQUEST_DELAY_MS: u64 = 600;

/// Team abbreviation -> NBA team id.
const TEAM_IDS: [(&str, &str); 30] = [
    ("ATL", "1610612737"),
    ("BOS", "1610612738"),
    ("BKN", "1610612751"),
    ("CHA", "1610612766"),
    ("CHI", "1610612741"),
    ("CLE", "1610612739"),
    ("DAL", "1610612742"),
    ("DEN", "1610612743"),
    ("DET", "1610612765"),
    ("GSW", "1610612744"),
    ("HOU", "1610612745"),
    ("IND", "1610612754"),
    ("LAC", "1610612746"),
    ("LAL", "1610612747"),
    ("MEM", "1610612763"),
    ("MIA", "1610612748"),
    ("MIL", "1610612749"),
    ("MIN", "1610612750"),
    ("NOP", "1610612740"),
    ("NYK", "1610612752"),
    ("OKC", "1610612760"),
    ("ORL", "1610612753"),
    ("PHI", "1610612755"),
    ("PHX", "1610612756"),
    ("POR", "1610612757"),
    ("SAC", "1610612758"),
    ("SAS", "1610612759"),
    ("TOR", "1610612761"),
    ("UTA", "1610612762"),
    ("WAS", "1610612764"),
];

/// NBA team id for an abbreviation like "PHI".
pub fn team_id_from_abbrev(abbrev: &str) -> Option<&'static str> {
    let upper = abbrev.to_uppercase();
    TEAM_IDS
        .iter()
        .find(|(code, _)| *code == upper)
        .map(|(_, id)| *id)
}

/// Current season string, e.g. "2024-25"; seasons roll over in October.
pub fn current_season() -> String {
    let now = Utc::now();
    let year = now.year();
    if now.month() >= 10 {
        format!("{}-{:02}", year, (year + 1) % 100)
    } else {
        format!("{}-{:02}", year - 1, year % 100)
    }
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    #[serde(rename = "resultSets", default)]
    result_sets: Vec<ResultSet>,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    headers: Vec<String>,
    #[serde(rename = "rowSet")]
    row_set: Vec<Vec<serde_json::Value>>,
}

impl ResultSet {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }
}

fn cell_str(row: &[serde_json::Value], index: Option<usize>) -> Option<String> {
    match row.get(index?)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn cell_f64(row: &[serde_json::Value], index: Option<usize>) -> Option<f64> {
    match row.get(index?)? {
        serde_json::Value::Number(n) => n.as_f64(),
        // Minutes sometimes arrive as "34:12".
        serde_json::Value::String(s) => parse_minutes(s),
        _ => None,
    }
}

fn parse_minutes(text: &str) -> Option<f64> {
    if let Some((minutes, seconds)) = text.split_once(':') {
        let minutes: f64 = minutes.trim().parse().ok()?;
        let seconds: f64 = seconds.trim().parse().ok()?;
        Some(minutes + seconds / 60.0)
    } else {
        text.trim().parse().ok()
    }
}

fn parse_game_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%b %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()
}

/// Team id is not part of the game-log table; recover the abbreviation
/// from the matchup text ("PHI vs. BOS" -> "PHI") and map it.
fn team_id_from_matchup(matchup: &str) -> String {
    let abbrev = matchup.split_whitespace().next().unwrap_or("");
    team_id_from_abbrev(abbrev)
        .map(str::to_string)
        .unwrap_or_else(|| abbrev.to_string())
}

#[derive(Clone)]
pub struct NbaStatsClient {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for NbaStatsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NbaStatsClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for NbaStatsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NbaStatsClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the client at another host (tests use a local stub).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            ),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(REFERER, HeaderValue::from_static("https://stats.nba.com/"));
        headers.insert("x-nba-stats-origin", HeaderValue::from_static("stats"));
        headers.insert("x-nba-stats-token", HeaderValue::from_static("true"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .default_headers(headers)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }

    async fn get_result_set(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<ResultSet> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("request {}", endpoint))?
            .error_for_status()
            .with_context(|| format!("status for {}", endpoint))?;

        let body: StatsResponse = response
            .json()
            .await
            .with_context(|| format!("decode {}", endpoint))?;
        body.result_sets
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("{} returned no result sets", endpoint))
    }

    /// Search players by (partial, case-insensitive) display name.
    pub async fn search_player(&self, name: &str) -> Result<Vec<PlayerSearchResult>> {
        let season = current_season();
        let set = self
            .get_result_set(
                "commonallplayers",
                &[
                    ("LeagueID", "00"),
                    ("Season", &season),
                    ("IsOnlyCurrentSeason", "1"),
                ],
            )
            .await?;

        let id_col = set.column("PERSON_ID");
        let name_col = set.column("DISPLAY_FIRST_LAST");
        let team_col = set.column("TEAM_ID");
        let needle = name.to_lowercase();

        Ok(set
            .row_set
            .iter()
            .filter_map(|row| {
                let display_name = cell_str(row, name_col)?;
                if !display_name.to_lowercase().contains(&needle) {
                    return None;
                }
                Some(PlayerSearchResult {
                    player_id: cell_str(row, id_col)?,
                    display_name,
                    team_id: cell_str(row, team_col).unwrap_or_default(),
                })
            })
            .collect())
    }

    /// Game logs for every roster player, sequentially with a fixed delay.
    pub async fn fetch_team_game_logs(
        &self,
        roster: &[RosterEntry],
        season: &str,
    ) -> Result<Vec<GameRecord>> {
        let mut records = Vec::new();
        for (index, entry) in roster.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(Duration::from_millis(REQUEST_DELAY_MS)).await;
            }
            log::info!("fetching game log for {}", entry.player_name);
            match self
                .fetch_player_game_log(&entry.player_id, &entry.player_name, season)
                .await
            {
                Ok(log_records) => records.extend(log_records),
                Err(err) => {
                    log::warn!("game log fetch failed for {}: {:#}", entry.player_name, err)
                }
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl GameLogProvider for NbaStatsClient {
    async fn fetch_player_game_log(
        &self,
        player_id: &str,
        player_name: &str,
        season: &str,
    ) -> Result<Vec<GameRecord>> {
        let set = self
            .get_result_set(
                "playergamelog",
                &[
                    ("PlayerID", player_id),
                    ("Season", season),
                    ("SeasonType", "Regular Season"),
                ],
            )
            .await?;

        let game_col = set.column("Game_ID").or_else(|| set.column("GAME_ID"));
        let date_col = set.column("GAME_DATE");
        let matchup_col = set.column("MATCHUP");
        let min_col = set.column("MIN");
        let pts_col = set.column("PTS");
        let reb_col = set.column("REB");
        let ast_col = set.column("AST");
        let fg_col = set.column("FG_PCT");

        let records = set
            .row_set
            .iter()
            .filter_map(|row| {
                let game_id = cell_str(row, game_col)?;
                let game_date = parse_game_date(&cell_str(row, date_col)?)?;
                let matchup = cell_str(row, matchup_col)?;
                Some(GameRecord {
                    team_id: team_id_from_matchup(&matchup),
                    game_id,
                    game_date,
                    matchup,
                    player_id: player_id.to_string(),
                    player_name: player_name.to_string(),
                    minutes: cell_f64(row, min_col),
                    points: cell_f64(row, pts_col),
                    rebounds: cell_f64(row, reb_col),
                    assists: cell_f64(row, ast_col),
                    fg_pct: cell_f64(row, fg_col),
                })
            })
            .collect();
        Ok(records)
    }

    async fn fetch_team_roster(&self, team_id: &str, season: &str) -> Result<Vec<RosterEntry>> {
        let set = self
            .get_result_set("commonteamroster", &[("TeamID", team_id), ("Season", season)])
            .await?;

        let id_col = set.column("PLAYER_ID");
        let name_col = set.column("PLAYER");

        Ok(set
            .row_set
            .iter()
            .filter_map(|row| {
                Some(RosterEntry {
                    player_id: cell_str(row, id_col)?,
                    player_name: cell_str(row, name_col)?,
                })
            })
            .collect())
    }

    fn provider_name(&self) -> &str {
        "nba_stats"
    }
}
