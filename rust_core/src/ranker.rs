//! Team-wide opportunity scanning when a star is ruled out.
//!
//! This module handles:
//! - Enumerating teammates and measuring their without-star uplift
//! - Resolving sportsbook lines keyed by player id or display name
//! - Edge evaluation and descending-edge ranking of qualifying props

use crate::config::AnalysisConfig;
use crate::edge::EdgeCalculator;
use crate::impact::ImpactEstimator;
use crate::models::{
    BettingOpportunity, ImpactResult, SkipReason, SkippedTeammate, StatKind,
};
use crate::store::GameRecordStore;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Betting lines keyed by player identifier or display name.
///
/// Callers may supply either key per entry; resolution tries the id first,
/// then the name, and reports "not found" explicitly rather than guessing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineBook {
    lines: FxHashMap<String, f64>,
}

impl LineBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, line: f64) {
        self.lines.insert(key.into(), line);
    }

    /// Id-first, then display-name lookup.
    pub fn resolve(&self, player_id: &str, player_name: &str) -> Option<f64> {
        self.lines
            .get(player_id)
            .or_else(|| self.lines.get(player_name))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl FromIterator<(String, f64)> for LineBook {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

/// One teammate's measured uplift, for ranked impact reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeammateImpact {
    pub player_id: String,
    pub player_name: String,
    pub impact: ImpactResult,
}

/// Output of a team-wide scan: qualifying props plus the teammates that
/// were considered and excluded, with reasons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityScan {
    pub opportunities: Vec<BettingOpportunity>,
    pub skipped: Vec<SkippedTeammate>,
}

pub struct OpportunityRanker<'a> {
    store: &'a GameRecordStore,
    config: AnalysisConfig,
}

impl<'a> OpportunityRanker<'a> {
    pub fn new(store: &'a GameRecordStore) -> Self {
        Self::with_config(store, AnalysisConfig::default())
    }

    pub fn with_config(store: &'a GameRecordStore, config: AnalysisConfig) -> Self {
        Self { store, config }
    }

    /// Teammates ranked by without-star uplift, largest first.
    ///
    /// Applies the scan sample gate and the materiality filter; `top_n`
    /// truncates the ranking when given.
    pub fn rank_impacts(
        &self,
        star_id: &str,
        team_id: &str,
        stat: StatKind,
        top_n: Option<usize>,
    ) -> Vec<TeammateImpact> {
        let estimator = ImpactEstimator::new(self.store);
        let mut impacts: Vec<TeammateImpact> = self
            .store
            .team_players(team_id)
            .into_iter()
            .filter(|(player_id, _)| player_id != star_id)
            .filter_map(|(player_id, player_name)| {
                let impact = estimator.measure_impact(
                    star_id,
                    &player_id,
                    stat,
                    self.config.scan_min_samples,
                )?;
                if impact.difference <= self.config.min_difference {
                    return None;
                }
                Some(TeammateImpact {
                    player_id,
                    player_name,
                    impact,
                })
            })
            .collect();

        impacts.sort_by(|a, b| {
            b.impact
                .difference
                .partial_cmp(&a.impact.difference)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(limit) = top_n {
            impacts.truncate(limit);
        }
        impacts
    }

    /// Scan every teammate of an absent star against the supplied lines.
    ///
    /// The without-star mean and spread from the impact split serve as the
    /// prediction for "next game given the star sits"; the edge calculator
    /// runs with `min_edge` as its recommendation threshold and only props
    /// with edge >= `min_edge` are retained, ordered by edge descending.
    pub fn find_opportunities(
        &self,
        star_id: &str,
        star_name: &str,
        team_id: &str,
        lines: &LineBook,
        stat: StatKind,
        min_edge: f64,
    ) -> OpportunityScan {
        log::info!(
            "scanning {} props with {} out (min edge {:.1}%)",
            stat,
            star_name,
            min_edge * 100.0
        );

        let estimator = ImpactEstimator::new(self.store);
        let calculator = EdgeCalculator::with_threshold(min_edge);
        let mut opportunities = Vec::new();
        let mut skipped = Vec::new();

        for (player_id, player_name) in self.store.team_players(team_id) {
            if player_id == star_id {
                continue;
            }

            let impact = match estimator.measure_impact(
                star_id,
                &player_id,
                stat,
                self.config.scan_min_samples,
            ) {
                Some(impact) => impact,
                None => {
                    let split = estimator.split(star_id, &player_id, stat);
                    let without_star_games = split
                        .without_star
                        .iter()
                        .filter(|r| r.stat(stat).is_some())
                        .count();
                    skipped.push(SkippedTeammate {
                        player_id,
                        player_name,
                        reason: SkipReason::InsufficientData { without_star_games },
                    });
                    continue;
                }
            };

            if impact.difference <= self.config.min_difference {
                skipped.push(SkippedTeammate {
                    player_id,
                    player_name,
                    reason: SkipReason::BelowMateriality {
                        difference: impact.difference,
                    },
                });
                continue;
            }

            let line = match lines.resolve(&player_id, &player_name) {
                Some(line) => line,
                None => {
                    log::info!(
                        "{}: +{:.1} {} without {}, no line available",
                        player_name,
                        impact.difference,
                        stat,
                        star_name
                    );
                    skipped.push(SkippedTeammate {
                        player_id,
                        player_name,
                        reason: SkipReason::MissingLine {
                            difference: impact.difference,
                        },
                    });
                    continue;
                }
            };

            let eval =
                calculator.evaluate_line(impact.without_star_avg, line, impact.without_star_std);
            if eval.edge < min_edge {
                log::debug!(
                    "{}: edge {:.1}% below threshold at line {}",
                    player_name,
                    eval.edge * 100.0,
                    line
                );
                continue;
            }

            opportunities.push(BettingOpportunity {
                player_id,
                player_name,
                stat,
                prediction: impact.without_star_avg,
                line,
                recommendation: eval.recommendation,
                edge: eval.edge,
                confidence: eval.confidence,
                with_star_avg: impact.with_star_avg,
                without_star_avg: impact.without_star_avg,
                difference: impact.difference,
                sample_size: impact.without_star_count,
            });
        }

        opportunities.sort_by(|a, b| {
            b.edge
                .partial_cmp(&a.edge)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        log::info!(
            "scan complete: {} opportunities, {} teammates skipped",
            opportunities.len(),
            skipped.len()
        );
        OpportunityScan {
            opportunities,
            skipped,
        }
    }
}
