//! Tunable thresholds for the analysis engine.

use serde::{Deserialize, Serialize};

/// Knobs shared by the impact scan and downstream sizing.
///
/// Defaults match the reference thresholds: a 5-game gate for direct
/// impact queries, a looser 3-game gate for team-wide scans, a 1-stat-unit
/// materiality filter, a 5% edge requirement, and quarter-Kelly staking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Without-star games required for a direct impact measurement.
    pub min_samples_without_star: usize,
    /// Without-star games required during a team-wide scan.
    pub scan_min_samples: usize,
    /// Minimum absolute uplift (stat units) before a teammate is considered.
    pub min_difference: f64,
    /// Minimum expected value before a prop qualifies.
    pub min_edge: f64,
    /// Fraction of full Kelly used for conservative stakes.
    pub kelly_fraction: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_samples_without_star: 5,
            scan_min_samples: 3,
            min_difference: 1.0,
            min_edge: 0.05,
            kelly_fraction: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = AnalysisConfig::default();
        assert_eq!(config.min_samples_without_star, 5);
        assert_eq!(config.scan_min_samples, 3);
        assert!((config.min_difference - 1.0).abs() < 1e-12);
        assert!((config.min_edge - 0.05).abs() < 1e-12);
        assert!((config.kelly_fraction - 0.25).abs() < 1e-12);
    }
}
