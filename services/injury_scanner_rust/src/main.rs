//! Injury scanner - console analyzer for star-absence betting edges.
//!
//! Demo mode (default) runs the seeded synthetic season with sample lines.
//! Live mode (`LIVE_FETCH=1`) resolves the star and roster through the
//! stats provider and reads lines from `LINES_FILE` (JSON map of player id
//! or name to line).

mod config;

use anyhow::{anyhow, Context, Result};
use benchwatch_core::clients::{nba, GameLogProvider, NbaStatsClient};
use benchwatch_core::{
    generate_sample_season, kelly_stake, AnalysisConfig, GameRecordStore, LineBook,
    OpportunityRanker, OpportunityScan, SkipReason, SyntheticSeasonConfig, STANDARD_NET_ODDS,
};
use config::ScannerConfig;
use dotenv::dotenv;
use log::info;
use std::collections::HashMap;
use std::fs;

const RULE: &str =
    "================================================================================";

struct ScanTarget {
    store: GameRecordStore,
    star_id: String,
    star_name: String,
    team_id: String,
    lines: LineBook,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = ScannerConfig::default();
    info!(
        "starting injury scanner ({} mode)",
        if config.live { "live" } else { "demo" }
    );

    let target = if config.live {
        load_live(&config).await?
    } else {
        load_demo(&config)
    };

    println!("\n{}", RULE);
    println!("ANALYZING IMPACT: {} OUT", target.star_name);
    println!("{}\n", RULE);

    let analysis = AnalysisConfig {
        min_edge: config.min_edge,
        kelly_fraction: config.kelly_fraction,
        ..AnalysisConfig::default()
    };
    let ranker = OpportunityRanker::with_config(&target.store, analysis.clone());
    let scan = ranker.find_opportunities(
        &target.star_id,
        &target.star_name,
        &target.team_id,
        &target.lines,
        config.stat,
        analysis.min_edge,
    );

    print_report(&scan, &config, &analysis, &target.star_name);
    Ok(())
}

fn load_demo(config: &ScannerConfig) -> ScanTarget {
    let (store, star_id) = generate_sample_season(&SyntheticSeasonConfig {
        seed: config.seed,
        ..SyntheticSeasonConfig::default()
    });

    let mut lines = LineBook::new();
    lines.insert("Tyrese Maxey", 25.5);
    lines.insert("Tobias Harris", 17.5);
    lines.insert("De'Anthony Melton", 12.5);
    lines.insert("Kelly Oubre Jr.", 15.5);

    let team_id = benchwatch_core::synthetic::SAMPLE_TEAM_ID.to_string();
    ScanTarget {
        star_name: store
            .player_name(&star_id)
            .unwrap_or("Joel Embiid")
            .to_string(),
        store,
        star_id,
        team_id,
        lines,
    }
}

async fn load_live(config: &ScannerConfig) -> Result<ScanTarget> {
    let client = NbaStatsClient::new();
    let season = config
        .season
        .clone()
        .unwrap_or_else(nba::current_season);

    let team_id = nba::team_id_from_abbrev(&config.team_abbrev)
        .ok_or_else(|| anyhow!("unknown team abbreviation: {}", config.team_abbrev))?
        .to_string();

    let matches = client.search_player(&config.star_name).await?;
    let star = matches
        .first()
        .ok_or_else(|| anyhow!("player not found: {}", config.star_name))?;
    info!("found star: {} ({})", star.display_name, star.player_id);

    let roster = client.fetch_team_roster(&team_id, &season).await?;
    if roster.is_empty() {
        return Err(anyhow!("empty roster for team {}", config.team_abbrev));
    }
    info!(
        "collecting game logs for {} roster players ({})",
        roster.len(),
        season
    );

    let records = client.fetch_team_game_logs(&roster, &season).await?;
    let mut store = GameRecordStore::new();
    let inserted = store.extend(records).context("loading fetched records")?;
    info!("loaded {} player performances", inserted);

    let lines = load_lines(config)?;
    Ok(ScanTarget {
        store,
        star_id: star.player_id.clone(),
        star_name: star.display_name.clone(),
        team_id,
        lines,
    })
}

fn load_lines(config: &ScannerConfig) -> Result<LineBook> {
    let path = config
        .lines_file
        .as_ref()
        .ok_or_else(|| anyhow!("LINES_FILE is required in live mode"))?;
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    let raw: HashMap<String, f64> =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path))?;
    Ok(raw.into_iter().collect())
}

fn print_report(
    scan: &OpportunityScan,
    config: &ScannerConfig,
    analysis: &AnalysisConfig,
    star_name: &str,
) {
    for skip in &scan.skipped {
        match skip.reason {
            SkipReason::MissingLine { difference } => println!(
                "  {}: +{:.1} {} without {} (no betting line available)",
                skip.player_name, difference, config.stat, star_name
            ),
            SkipReason::InsufficientData { without_star_games } => println!(
                "  {}: only {} games without {} (need more data)",
                skip.player_name, without_star_games, star_name
            ),
            SkipReason::BelowMateriality { difference } => println!(
                "  {}: {:+.1} {} difference (not material)",
                skip.player_name, difference, config.stat
            ),
        }
    }

    if scan.opportunities.is_empty() {
        println!("\n{}", RULE);
        println!("NO PROFITABLE OPPORTUNITIES FOUND");
        println!("{}", RULE);
        return;
    }

    println!("\n{}", RULE);
    println!("RECOMMENDED BETS: {}", scan.opportunities.len());
    println!("{}", RULE);

    for opp in &scan.opportunities {
        println!("\n{}: {} {}", opp.player_name, opp.recommendation, opp.line);
        println!("  Prediction: {:.1} {}", opp.prediction, opp.stat);
        println!("  Edge: +{:.2}%", opp.edge * 100.0);
        println!("  Confidence: {:.1}%", opp.confidence * 100.0);
        println!(
            "  Avg with {}: {:.1} | without: {:.1} ({} games)",
            star_name, opp.with_star_avg, opp.without_star_avg, opp.sample_size
        );
    }

    println!("\n{}", RULE);
    println!("BET SIZING (Kelly Criterion)");
    println!("{}", RULE);
    println!("\nWith ${:.0} bankroll:", config.bankroll);

    for opp in &scan.opportunities {
        match kelly_stake(opp.confidence, STANDARD_NET_ODDS, analysis.kelly_fraction) {
            Ok(stake) => {
                let (full, conservative) = stake.dollars(config.bankroll);
                println!(
                    "\n{} {} {}:",
                    opp.player_name, opp.recommendation, opp.line
                );
                println!(
                    "  Full Kelly: ${:.2} ({:.1}% of bankroll)",
                    full,
                    stake.full_kelly * 100.0
                );
                println!(
                    "  Conservative: ${:.2} ({:.1}% of bankroll)",
                    conservative,
                    stake.conservative * 100.0
                );
            }
            Err(err) => log::warn!("stake sizing failed for {}: {}", opp.player_name, err),
        }
    }
}
