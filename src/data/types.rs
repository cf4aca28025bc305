use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upcoming game as listed by the backend, with its current market lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: String,
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    /// Home-relative spread line (-3.5 means home favored by 3.5).
    pub spread_line: f64,
    pub total_line: f64,
    pub home_moneyline: i32,
    pub away_moneyline: i32,
    pub start_time: DateTime<Utc>,
}

/// Pre-computed Monte Carlo output for one game. All modeling happens
/// server-side; this is consumed as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationResult {
    /// Home win probability from the simulation.
    pub win_probability: f64,
    /// Probability the favored side covers the current spread line.
    pub cover_probability: f64,
    /// Probability the combined score clears the current total line.
    pub over_probability: f64,
    /// Simulation-stability score, 0-100.
    pub confidence_score: f64,
    /// Dispersion of simulated outcomes, higher = noisier.
    pub volatility_index: f64,
    /// Mean home margin across simulations.
    pub avg_margin: f64,
    /// Mean combined score across simulations.
    pub projected_total: f64,
    #[serde(default)]
    pub sharp_analysis: SharpAnalysis,
}

/// Per-market overrides from the backend's richer sharp-money classifier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharpAnalysis {
    #[serde(default)]
    pub spread: Option<SharpSignal>,
    #[serde(default)]
    pub total: Option<SharpSignal>,
    #[serde(default)]
    pub moneyline: Option<SharpSignal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharpSignal {
    /// "EDGE", "LEAN", or "NONE".
    pub action: String,
    #[serde(default)]
    pub side: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_result_deserializes_without_sharp_analysis() {
        let json = r#"{
            "win_probability": 0.58,
            "cover_probability": 0.54,
            "over_probability": 0.49,
            "confidence_score": 81.0,
            "volatility_index": 12.4,
            "avg_margin": 4.2,
            "projected_total": 221.5
        }"#;

        let sim: SimulationResult = serde_json::from_str(json).unwrap();
        assert!((sim.win_probability - 0.58).abs() < 1e-9);
        assert!(sim.sharp_analysis.spread.is_none());
        assert!(sim.sharp_analysis.moneyline.is_none());
    }

    #[test]
    fn test_simulation_result_deserializes_sharp_signals() {
        let json = r#"{
            "win_probability": 0.58,
            "cover_probability": 0.54,
            "over_probability": 0.49,
            "confidence_score": 81.0,
            "volatility_index": 12.4,
            "avg_margin": 4.2,
            "projected_total": 221.5,
            "sharp_analysis": {
                "spread": { "action": "EDGE", "side": "HOME -3.5" },
                "total": { "action": "NONE" }
            }
        }"#;

        let sim: SimulationResult = serde_json::from_str(json).unwrap();
        let spread = sim.sharp_analysis.spread.unwrap();
        assert_eq!(spread.action, "EDGE");
        assert_eq!(spread.side.as_deref(), Some("HOME -3.5"));
        assert_eq!(sim.sharp_analysis.total.unwrap().action, "NONE");
    }
}
