/// Convert American odds to decimal odds (payout multiple per unit staked)
/// Negative odds (-110) mean you bet $110 to win $100
/// Positive odds (+150) mean you win $150 on a $100 bet
pub fn american_to_decimal(odds: i32) -> f64 {
    if odds < 0 {
        100.0 / odds.abs() as f64 + 1.0
    } else {
        odds as f64 / 100.0 + 1.0
    }
}

/// Convert American odds to the book's implied win probability
pub fn american_to_implied_probability(odds: i32) -> f64 {
    if odds > 0 {
        100.0 / (odds as f64 + 100.0)
    } else {
        let abs_odds = odds.abs() as f64;
        abs_odds / (abs_odds + 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_american_to_decimal() {
        // -110 pays 100/110 + stake back
        assert!((american_to_decimal(-110) - 1.9091).abs() < 0.001);
        assert!((american_to_decimal(150) - 2.5).abs() < 1e-9);
        assert!((american_to_decimal(100) - 2.0).abs() < 1e-9);
        assert!((american_to_decimal(-100) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_american_to_implied_probability() {
        assert!((american_to_implied_probability(-150) - 0.6).abs() < 0.01);
        assert!((american_to_implied_probability(150) - 0.4).abs() < 0.01);
        assert!((american_to_implied_probability(100) - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_decimal_and_implied_are_reciprocal() {
        for odds in [-250, -110, 120, 300] {
            let decimal = american_to_decimal(odds);
            let implied = american_to_implied_probability(odds);
            assert!((decimal * implied - 1.0).abs() < 1e-9);
        }
    }
}
