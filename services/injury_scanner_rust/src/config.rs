//! Scanner configuration from environment variables.

use benchwatch_core::StatKind;
use std::env;

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Fetch live data from the stats provider instead of the synthetic
    /// demo season.
    pub live: bool,
    /// Star ruled out, by display name (live mode).
    pub star_name: String,
    /// Star's team abbreviation, e.g. "PHI" (live mode).
    pub team_abbrev: String,
    pub stat: StatKind,
    /// Minimum edge before a prop is reported.
    pub min_edge: f64,
    pub kelly_fraction: f64,
    /// Bankroll used for dollar sizing in the report.
    pub bankroll: f64,
    /// JSON file of {player id or name: line} (live mode).
    pub lines_file: Option<String>,
    /// Seed for the demo season.
    pub seed: u64,
    /// Season override like "2024-25"; defaults to the current one.
    pub season: Option<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            live: env::var("LIVE_FETCH")
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(false),
            star_name: env::var("STAR_NAME").unwrap_or_else(|_| "Joel Embiid".to_string()),
            team_abbrev: env::var("TEAM_ABBREV").unwrap_or_else(|_| "PHI".to_string()),
            stat: env::var("STAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(StatKind::Points),
            min_edge: env::var("MIN_EDGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.03),
            kelly_fraction: env::var("KELLY_FRACTION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.25),
            bankroll: env::var("BANKROLL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000.0),
            lines_file: env::var("LINES_FILE").ok(),
            seed: env::var("DEMO_SEED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            season: env::var("SEASON").ok(),
        }
    }
}
