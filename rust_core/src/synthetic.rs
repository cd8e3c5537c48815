//! Deterministic synthetic season generation for demos and tests.
//!
//! Simulates a 76ers-style roster: a star who sits a configurable share of
//! games and four teammates whose scoring distributions shift upward when
//! he does. All sampling runs through a seeded `ChaCha8Rng`, so a fixed
//! config reproduces the same season exactly.

use crate::models::GameRecord;
use crate::store::GameRecordStore;
use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Team id used by the generated season.
pub const SAMPLE_TEAM_ID: &str = "1610612755";

/// Star player id in the generated season.
pub const SAMPLE_STAR_ID: &str = "203954";

#[derive(Debug, Clone)]
pub struct SyntheticSeasonConfig {
    /// Games to simulate.
    pub games: usize,
    /// Share of games the star sits out.
    pub star_absence_rate: f64,
    pub seed: u64,
}

impl Default for SyntheticSeasonConfig {
    fn default() -> Self {
        Self {
            games: 40,
            star_absence_rate: 0.4,
            seed: 7,
        }
    }
}

struct TeammateProfile {
    player_id: &'static str,
    name: &'static str,
    /// (mean, std) points with the star on the floor.
    with_pts: (f64, f64),
    /// (mean, std) points with the star out.
    without_pts: (f64, f64),
    minutes: (f64, f64),
    reb: (f64, f64),
    ast: (f64, f64),
    fg: (f64, f64),
}

const TEAMMATES: [TeammateProfile; 4] = [
    TeammateProfile {
        player_id: "1630178",
        name: "Tyrese Maxey",
        with_pts: (24.0, 4.0),
        without_pts: (30.0, 5.0),
        minutes: (34.0, 38.0),
        reb: (4.0, 1.5),
        ast: (6.0, 2.0),
        fg: (0.42, 0.52),
    },
    TeammateProfile {
        player_id: "202699",
        name: "Tobias Harris",
        with_pts: (16.0, 3.0),
        without_pts: (19.0, 4.0),
        minutes: (30.0, 35.0),
        reb: (6.0, 2.0),
        ast: (3.0, 1.0),
        fg: (0.43, 0.51),
    },
    TeammateProfile {
        player_id: "1629001",
        name: "De'Anthony Melton",
        with_pts: (11.0, 3.0),
        without_pts: (14.0, 3.5),
        minutes: (25.0, 32.0),
        reb: (4.0, 1.5),
        ast: (3.0, 1.5),
        fg: (0.39, 0.48),
    },
    TeammateProfile {
        player_id: "1626162",
        name: "Kelly Oubre Jr.",
        with_pts: (14.0, 3.0),
        without_pts: (16.0, 3.5),
        minutes: (28.0, 34.0),
        reb: (5.0, 1.5),
        ast: (1.5, 1.0),
        fg: (0.41, 0.50),
    },
];

/// Normal deviate via Box-Muller over two uniforms.
fn normal(rng: &mut ChaCha8Rng, mean: f64, std: f64) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    mean + std * z
}

/// Generate a sample season. Returns the filled store and the star's id.
pub fn generate_sample_season(config: &SyntheticSeasonConfig) -> (GameRecordStore, String) {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let season_start = NaiveDate::from_ymd_opt(2024, 10, 25).unwrap_or_default();
    let mut records = Vec::new();

    for game in 0..config.games {
        let game_id = format!("002400{:04}", game + 1);
        let game_date = season_start + chrono::Days::new(2 * game as u64);
        let matchup = if rng.gen::<f64>() > 0.5 {
            "PHI vs. BOS"
        } else {
            "PHI @ BOS"
        };
        let star_plays = rng.gen::<f64>() > config.star_absence_rate;

        if star_plays {
            records.push(GameRecord {
                game_id: game_id.clone(),
                game_date,
                matchup: matchup.to_string(),
                team_id: SAMPLE_TEAM_ID.to_string(),
                player_id: SAMPLE_STAR_ID.to_string(),
                player_name: "Joel Embiid".to_string(),
                minutes: Some(rng.gen_range(30.0..37.0)),
                points: Some(normal(&mut rng, 28.0, 5.0).max(0.0)),
                rebounds: Some(normal(&mut rng, 11.0, 2.0).max(0.0)),
                assists: Some(normal(&mut rng, 5.0, 2.0).max(0.0)),
                fg_pct: Some(rng.gen_range(0.45..0.58)),
            });
        }

        for profile in &TEAMMATES {
            let (pts_mean, pts_std) = if star_plays {
                profile.with_pts
            } else {
                profile.without_pts
            };
            records.push(GameRecord {
                game_id: game_id.clone(),
                game_date,
                matchup: matchup.to_string(),
                team_id: SAMPLE_TEAM_ID.to_string(),
                player_id: profile.player_id.to_string(),
                player_name: profile.name.to_string(),
                minutes: Some(rng.gen_range(profile.minutes.0..profile.minutes.1)),
                points: Some(normal(&mut rng, pts_mean, pts_std).max(0.0)),
                rebounds: Some(normal(&mut rng, profile.reb.0, profile.reb.1).max(0.0)),
                assists: Some(normal(&mut rng, profile.ast.0, profile.ast.1).max(0.0)),
                fg_pct: Some(rng.gen_range(profile.fg.0..profile.fg.1)),
            });
        }
    }

    let mut store = GameRecordStore::new();
    if let Err(err) = store.extend(records) {
        // Game ids are constructed uniquely above.
        log::warn!("synthetic season produced a duplicate record: {}", err);
    }
    log::info!(
        "generated synthetic season: {} records across {} games",
        store.len(),
        config.games
    );
    (store, SAMPLE_STAR_ID.to_string())
}
