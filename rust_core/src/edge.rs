//! Betting line evaluation: win probabilities and expected value.
//!
//! This module handles:
//! - Normal-model win probabilities for the over/under sides of a line
//! - Expected value per unit staked at fixed -110 odds
//! - The over/under/no-bet recommendation policy

use crate::models::Recommendation;
use crate::stats::normal_cdf;
use serde::{Deserialize, Serialize};

/// Net payout per unit staked on a winning bet at -110 American odds.
pub const STANDARD_NET_ODDS: f64 = 0.909;

/// Default minimum expected value before a side is recommended.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 0.05;

/// Coefficient of variation substituted when dispersion is missing or zero.
const FALLBACK_CV: f64 = 0.15;

/// Floor keeping the substituted sigma positive for a zero prediction.
const MIN_SIGMA: f64 = 1e-6;

/// Full evaluation of one (prediction, line) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineEvaluation {
    pub prediction: f64,
    pub line: f64,
    /// Dispersion actually used (after the fallback substitution).
    pub std_dev: f64,
    pub prob_over: f64,
    pub prob_under: f64,
    pub over_ev: f64,
    pub under_ev: f64,
    pub recommendation: Recommendation,
    /// EV of the recommended side, or the better side's EV for a no-bet.
    pub edge: f64,
    /// Win probability of the recommended side.
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct EdgeCalculator {
    threshold: f64,
}

impl Default for EdgeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeCalculator {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_EDGE_THRESHOLD,
        }
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Evaluate a line against a predicted distribution.
    ///
    /// A missing, zero, or non-finite `std_dev` is replaced with 15% of the
    /// prediction magnitude so a degenerate distribution cannot manufacture
    /// certainty. Equal over/under EVs above the threshold resolve to OVER
    /// by evaluation order.
    pub fn evaluate_line(&self, prediction: f64, line: f64, std_dev: Option<f64>) -> LineEvaluation {
        let sigma = match std_dev {
            Some(s) if s.is_finite() && s > 0.0 => s,
            _ => (prediction.abs() * FALLBACK_CV).max(MIN_SIGMA),
        };

        let z = (line - prediction) / sigma;
        let prob_under = normal_cdf(z);
        let prob_over = 1.0 - prob_under;

        let over_ev = prob_over * STANDARD_NET_ODDS - (1.0 - prob_over);
        let under_ev = prob_under * STANDARD_NET_ODDS - (1.0 - prob_under);

        let (recommendation, edge, confidence) = if over_ev > self.threshold {
            (Recommendation::Over, over_ev, prob_over)
        } else if under_ev > self.threshold {
            (Recommendation::Under, under_ev, prob_under)
        } else {
            (
                Recommendation::NoBet,
                over_ev.max(under_ev),
                prob_over.max(prob_under),
            )
        };

        LineEvaluation {
            prediction,
            line,
            std_dev: sigma,
            prob_over,
            prob_under,
            over_ev,
            under_ev,
            recommendation,
            edge,
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_recommendation_round_trip() {
        // prediction 25, line 20, sigma 5: z = -1, prob_over = Phi(1).
        let eval = EdgeCalculator::new().evaluate_line(25.0, 20.0, Some(5.0));

        assert!((eval.prob_over - 0.8413).abs() < 1e-3);
        assert!((eval.over_ev - 0.6066).abs() < 1e-3);
        assert_eq!(eval.recommendation, Recommendation::Over);
        assert!((eval.edge - eval.over_ev).abs() < 1e-12);
        assert!((eval.confidence - eval.prob_over).abs() < 1e-12);
    }

    #[test]
    fn test_under_recommendation_symmetric() {
        let eval = EdgeCalculator::new().evaluate_line(20.0, 25.0, Some(5.0));
        assert!((eval.prob_under - 0.8413).abs() < 1e-3);
        assert_eq!(eval.recommendation, Recommendation::Under);
        assert!((eval.edge - eval.under_ev).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_accessor() {
        assert!((EdgeCalculator::new().threshold() - DEFAULT_EDGE_THRESHOLD).abs() < 1e-12);
        assert!((EdgeCalculator::with_threshold(0.03).threshold() - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_no_bet_when_line_matches_prediction() {
        // z = 0: both sides are coin flips and lose to the vig.
        let eval = EdgeCalculator::new().evaluate_line(22.0, 22.0, Some(4.0));
        assert_eq!(eval.recommendation, Recommendation::NoBet);
        assert!(eval.over_ev < 0.0);
        assert!(eval.under_ev < 0.0);
        assert!((eval.edge - eval.over_ev.max(eval.under_ev)).abs() < 1e-12);
        assert!((eval.confidence - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_no_bet_when_both_evs_at_or_below_threshold() {
        // z = -0.12: over EV ~= 0.046, over break-even but under 5%.
        let eval = EdgeCalculator::new().evaluate_line(22.6, 22.0, Some(5.0));
        assert!(eval.over_ev > 0.0 && eval.over_ev <= DEFAULT_EDGE_THRESHOLD);
        assert_eq!(eval.recommendation, Recommendation::NoBet);

        // The same gap clears a looser 3% threshold.
        let loose = EdgeCalculator::with_threshold(0.03).evaluate_line(22.6, 22.0, Some(5.0));
        assert_eq!(loose.recommendation, Recommendation::Over);
    }

    #[test]
    fn test_sigma_fallback_on_zero_or_missing_dispersion() {
        let calc = EdgeCalculator::new();
        let from_none = calc.evaluate_line(20.0, 18.0, None);
        let from_zero = calc.evaluate_line(20.0, 18.0, Some(0.0));
        let from_nan = calc.evaluate_line(20.0, 18.0, Some(f64::NAN));

        for eval in [&from_none, &from_zero, &from_nan] {
            assert!((eval.std_dev - 3.0).abs() < 1e-9); // 15% of 20
            assert!(eval.prob_over.is_finite());
            assert!(eval.edge.is_finite());
        }
        assert!((from_none.prob_over - from_zero.prob_over).abs() < 1e-12);
    }

    #[test]
    fn test_zero_prediction_stays_finite() {
        let eval = EdgeCalculator::new().evaluate_line(0.0, 1.5, None);
        assert!(eval.std_dev > 0.0);
        assert!(eval.prob_over.is_finite());
        assert!(eval.prob_under.is_finite());
        assert!(eval.edge.is_finite());
        // Prediction far below the line: the under side dominates.
        assert_eq!(eval.recommendation, Recommendation::Under);
    }

    #[test]
    fn test_probabilities_complementary() {
        let eval = EdgeCalculator::new().evaluate_line(27.3, 24.5, Some(6.1));
        assert!((eval.prob_over + eval.prob_under - 1.0).abs() < 1e-12);
    }
}
