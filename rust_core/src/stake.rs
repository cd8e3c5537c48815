//! Fractional-Kelly stake sizing.

use crate::edge::STANDARD_NET_ODDS;
use crate::error::AnalysisError;
use crate::models::StakeRecommendation;

/// Default scale-down from full Kelly.
pub const DEFAULT_KELLY_FRACTION: f64 = 0.25;

/// Kelly bankroll fraction for a single-sided wager.
///
/// `odds` is the net payout per unit staked on a win (0.909 at -110).
/// Full Kelly = (odds * p - (1 - p)) / odds, floored at zero; the
/// conservative figure scales it by `fraction_of_full_kelly`. A win
/// probability outside [0, 1] is a caller contract violation.
pub fn kelly_stake(
    win_probability: f64,
    odds: f64,
    fraction_of_full_kelly: f64,
) -> Result<StakeRecommendation, AnalysisError> {
    if !win_probability.is_finite() || !(0.0..=1.0).contains(&win_probability) {
        return Err(AnalysisError::InvalidProbability(win_probability));
    }

    let full_kelly = if odds <= 0.0 {
        0.0
    } else {
        let p = win_probability;
        ((odds * p - (1.0 - p)) / odds).max(0.0)
    };

    Ok(StakeRecommendation {
        full_kelly,
        conservative: full_kelly * fraction_of_full_kelly,
    })
}

/// Kelly at the standard -110 odds and quarter-Kelly scaling.
pub fn kelly_stake_default(win_probability: f64) -> Result<StakeRecommendation, AnalysisError> {
    kelly_stake(win_probability, STANDARD_NET_ODDS, DEFAULT_KELLY_FRACTION)
}
