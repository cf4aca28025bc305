use tracing::{info, warn};

use crate::analytics::edge::{should_show_raw_metrics, EdgeClassifier};
use crate::analytics::odds::american_to_implied_probability;
use crate::analytics::parlay::ParlayCalculator;
use crate::analytics::types::{
    CorrelationGrade, EdgeClassification, MarketKind, MarketSignal, ParlayCalculation, ParlayLeg,
};
use crate::config::{EdgeThresholds, ParlayConfig};
use crate::data::simulation_api::decode_sharp_hint;
use crate::data::types::{GameSummary, SimulationResult};

/// Standard juice on spread and total lines.
const STANDARD_LINE_ODDS: i32 = -110;

#[derive(Debug, Clone)]
pub struct ClassifiedMarket {
    pub game_id: String,
    pub sport: String,
    pub kind: MarketKind,
    pub american_odds: i32,
    /// Raw market line (home-relative spread, or the total); None for
    /// moneyline markets.
    pub market_line: Option<f64>,
    /// +1 when the pick sits on the home/under side of the raw line, -1 on
    /// the away/over side. Chosen so that the pick-relative line is
    /// `direction * market_line` and line movement toward the pick is
    /// `direction * (recorded_line - closing_line)`. For moneyline markets
    /// +1 = home pick, -1 = away pick.
    pub pick_direction: i32,
    pub signal: MarketSignal,
    pub classification: EdgeClassification,
}

#[derive(Debug, Clone)]
pub struct CandidateParlay {
    pub legs: Vec<ParlayLeg>,
    pub calculation: ParlayCalculation,
    pub correlation: CorrelationGrade,
}

/// Turns one game's simulation output into classified spread/total/moneyline
/// signals, and assembles edge-tier legs into a priced candidate parlay.
pub struct MarketScanner {
    classifier: EdgeClassifier,
    parlay_calculator: ParlayCalculator,
    parlay_config: ParlayConfig,
}

impl MarketScanner {
    pub fn new(edge_thresholds: EdgeThresholds, parlay_config: ParlayConfig) -> Self {
        Self {
            classifier: EdgeClassifier::new(edge_thresholds),
            parlay_calculator: ParlayCalculator::new(parlay_config.clone()),
            parlay_config,
        }
    }

    /// Classify all three markets of a game against its simulation.
    pub fn scan_game(&self, game: &GameSummary, sim: &SimulationResult) -> Vec<ClassifiedMarket> {
        let home_covers = sim.avg_margin + game.spread_line > 0.0;
        let over = sim.projected_total > game.total_line;
        let home_favored =
            sim.win_probability >= american_to_implied_probability(game.home_moneyline);

        let markets = [
            (
                MarketKind::Spread,
                self.spread_signal(game, sim),
                STANDARD_LINE_ODDS,
                Some(game.spread_line),
                if home_covers { 1 } else { -1 },
            ),
            (
                MarketKind::Total,
                self.total_signal(game, sim),
                STANDARD_LINE_ODDS,
                Some(game.total_line),
                if over { -1 } else { 1 },
            ),
            (
                MarketKind::Moneyline,
                self.moneyline_signal(game, sim),
                if home_favored {
                    game.home_moneyline
                } else {
                    game.away_moneyline
                },
                None,
                if home_favored { 1 } else { -1 },
            ),
        ];

        markets
            .into_iter()
            .map(|(kind, signal, american_odds, market_line, pick_direction)| {
                let classification = self.classifier.classify(&signal);

                if should_show_raw_metrics(&classification) {
                    info!(
                        "{} vs {} [{}]: {} side={:?} deviation={:.1} confidence={:.0} prob={:.3}",
                        game.home_team,
                        game.away_team,
                        kind,
                        classification.state,
                        classification.side,
                        signal.deviation_points,
                        signal.confidence_score,
                        classification.probability,
                    );
                } else {
                    // Raw edge metrics stay hidden below EDGE tier
                    info!(
                        "{} vs {} [{}]: {} side={:?}",
                        game.home_team, game.away_team, kind, classification.state, classification.side,
                    );
                }

                ClassifiedMarket {
                    game_id: game.game_id.clone(),
                    sport: game.sport.clone(),
                    kind,
                    american_odds,
                    market_line,
                    pick_direction,
                    signal,
                    classification,
                }
            })
            .collect()
    }

    /// 1. Spread: model margin vs the home-relative line, in points.
    fn spread_signal(&self, game: &GameSummary, sim: &SimulationResult) -> MarketSignal {
        // spread_line is home-relative, so the market's expected home margin
        // is -spread_line
        let deviation_points = (sim.avg_margin + game.spread_line).abs();

        let derived_side = if sim.avg_margin + game.spread_line > 0.0 {
            format!("{} {:+.1}", game.home_team, game.spread_line)
        } else {
            format!("{} {:+.1}", game.away_team, -game.spread_line)
        };

        let hint = decode_sharp_hint(sim.sharp_analysis.spread.as_ref());
        let side = sim
            .sharp_analysis
            .spread
            .as_ref()
            .and_then(|s| s.side.clone())
            .unwrap_or(derived_side);

        MarketSignal {
            deviation_points,
            variance_score: sim.volatility_index,
            confidence_score: sim.confidence_score,
            probability: sim.cover_probability,
            sharp_action_hint: hint,
            side: Some(side),
        }
    }

    /// 2. Total: projected combined score vs the total line, in points.
    fn total_signal(&self, game: &GameSummary, sim: &SimulationResult) -> MarketSignal {
        let deviation_points = (sim.projected_total - game.total_line).abs();
        let over = sim.projected_total > game.total_line;

        let derived_side = if over {
            format!("OVER {:.1}", game.total_line)
        } else {
            format!("UNDER {:.1}", game.total_line)
        };
        let probability = if over {
            sim.over_probability
        } else {
            1.0 - sim.over_probability
        };

        let hint = decode_sharp_hint(sim.sharp_analysis.total.as_ref());
        let side = sim
            .sharp_analysis
            .total
            .as_ref()
            .and_then(|s| s.side.clone())
            .unwrap_or(derived_side);

        MarketSignal {
            deviation_points,
            variance_score: sim.volatility_index,
            confidence_score: sim.confidence_score,
            probability,
            sharp_action_hint: hint,
            side: Some(side),
        }
    }

    /// 3. Moneyline: model win probability vs the book's implied probability,
    /// in probability points so one threshold set covers all markets.
    fn moneyline_signal(&self, game: &GameSummary, sim: &SimulationResult) -> MarketSignal {
        let implied = american_to_implied_probability(game.home_moneyline);
        let deviation_points = (sim.win_probability - implied).abs() * 100.0;

        let home_favored = sim.win_probability >= implied;
        let derived_side = if home_favored {
            format!("{} ML", game.home_team)
        } else {
            format!("{} ML", game.away_team)
        };
        let probability = if home_favored {
            sim.win_probability
        } else {
            1.0 - sim.win_probability
        };

        let hint = decode_sharp_hint(sim.sharp_analysis.moneyline.as_ref());
        let side = sim
            .sharp_analysis
            .moneyline
            .as_ref()
            .and_then(|s| s.side.clone())
            .unwrap_or(derived_side);

        MarketSignal {
            deviation_points,
            variance_score: sim.volatility_index,
            confidence_score: sim.confidence_score,
            probability,
            sharp_action_hint: hint,
            side: Some(side),
        }
    }

    /// Assemble edge-tier legs across scanned games into one candidate
    /// parlay at the configured default stake. At most one leg per game, and
    /// never more than the configured leg cap.
    pub fn build_candidate_parlay(&self, markets: &[ClassifiedMarket]) -> Option<CandidateParlay> {
        let mut legs: Vec<ParlayLeg> = Vec::new();
        let mut sports: Vec<&str> = Vec::new();
        let mut used_games: Vec<&str> = Vec::new();

        for market in markets {
            if legs.len() >= self.parlay_config.max_candidate_legs {
                break;
            }
            if !should_show_raw_metrics(&market.classification) {
                continue;
            }
            if used_games.contains(&market.game_id.as_str()) {
                continue;
            }

            let label = match &market.classification.side {
                Some(side) => side.clone(),
                None => continue,
            };

            legs.push(ParlayLeg {
                label,
                true_probability: market.classification.probability,
                american_odds: market.american_odds,
            });
            sports.push(market.sport.as_str());
            used_games.push(market.game_id.as_str());
        }

        if legs.len() < 2 {
            return None;
        }

        let calculation = match self
            .parlay_calculator
            .combine(&legs, self.parlay_config.default_stake)
        {
            Ok(calc) => calc,
            Err(e) => {
                warn!("Candidate parlay rejected: {}", e);
                return None;
            }
        };

        let cross_sport = sports.windows(2).any(|pair| pair[0] != pair[1]);
        let correlation = if cross_sport {
            CorrelationGrade::CrossSport
        } else {
            CorrelationGrade::Low
        };

        Some(CandidateParlay {
            legs,
            calculation,
            correlation,
        })
    }
}
