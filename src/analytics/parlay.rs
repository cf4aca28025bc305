use crate::analytics::odds::american_to_decimal;
use crate::analytics::types::{ParlayCalculation, ParlayLeg, Volatility};
use crate::config::ParlayConfig;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ParlayError {
    #[error("Parlay needs at least 2 legs, got {0}")]
    InsufficientLegs(usize),

    #[error("Stake must be a positive finite amount, got {0}")]
    InvalidStake(f64),

    #[error("Leg {index} has invalid probability {probability} (must be in (0, 1])")]
    InvalidProbability { index: usize, probability: f64 },

    #[error("Leg {0} has zero American odds")]
    ZeroOdds(usize),
}

/// Combines independent betting legs into parlay hit probability, payout
/// odds, and expected value.
///
/// Legs are treated as uncorrelated events: the hit probability is the plain
/// product of leg probabilities. Any correlation grade supplied alongside a
/// parlay is advisory display text and never enters this arithmetic.
#[derive(Debug, Clone)]
pub struct ParlayCalculator {
    config: ParlayConfig,
}

impl ParlayCalculator {
    pub fn new(config: ParlayConfig) -> Self {
        Self { config }
    }

    /// Price a parlay. Never panics: invalid input comes back as a typed
    /// `ParlayError` so callers on the display path can degrade gracefully.
    pub fn combine(&self, legs: &[ParlayLeg], stake: f64) -> Result<ParlayCalculation, ParlayError> {
        if legs.len() < 2 {
            return Err(ParlayError::InsufficientLegs(legs.len()));
        }
        if !stake.is_finite() || stake <= 0.0 {
            return Err(ParlayError::InvalidStake(stake));
        }

        for (index, leg) in legs.iter().enumerate() {
            if !leg.true_probability.is_finite()
                || leg.true_probability <= 0.0
                || leg.true_probability > 1.0
            {
                return Err(ParlayError::InvalidProbability {
                    index,
                    probability: leg.true_probability,
                });
            }
            if leg.american_odds == 0 {
                return Err(ParlayError::ZeroOdds(index));
            }
        }

        let combined_probability: f64 = legs.iter().map(|leg| leg.true_probability).product();
        let decimal_odds: f64 = legs
            .iter()
            .map(|leg| american_to_decimal(leg.american_odds))
            .product();

        let implied_book_probability = 1.0 / decimal_odds;
        let ev_percent = (combined_probability * decimal_odds - 1.0) * 100.0;

        let potential_payout = stake * decimal_odds;
        let potential_profit = potential_payout - stake;

        let volatility = self.bucket_volatility(legs.len(), combined_probability);

        Ok(ParlayCalculation {
            combined_probability,
            decimal_odds,
            implied_book_probability,
            ev_percent,
            volatility,
            potential_payout,
            potential_profit,
        })
    }

    /// Coarse volatility label from leg count and combined probability.
    /// Extreme dominates: a long-shot stays Extreme no matter the leg count.
    fn bucket_volatility(&self, leg_count: usize, combined_probability: f64) -> Volatility {
        let c = &self.config;

        if leg_count >= c.extreme_min_legs || combined_probability <= c.extreme_max_probability {
            Volatility::Extreme
        } else if leg_count <= c.low_max_legs && combined_probability >= c.low_min_probability {
            Volatility::Low
        } else if leg_count >= c.high_min_legs || combined_probability <= c.high_max_probability {
            Volatility::High
        } else {
            Volatility::Medium
        }
    }
}
