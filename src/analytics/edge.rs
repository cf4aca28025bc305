use crate::analytics::types::{EdgeClassification, EdgeState, MarketSignal};
use crate::config::EdgeThresholds;

/// Decides whether a market is displayed as EDGE, LEAN, or NEUTRAL.
///
/// The three-factor gate (deviation, confidence, variance) is the
/// load-bearing invariant: a market must be significant AND stable AND calm
/// before it can show as EDGE. Bad input degrades to NEUTRAL, never to EDGE.
#[derive(Debug, Clone)]
pub struct EdgeClassifier {
    thresholds: EdgeThresholds,
}

impl EdgeClassifier {
    pub fn new(thresholds: EdgeThresholds) -> Self {
        Self { thresholds }
    }

    /// Classify a market signal. Total over all f64 inputs: NaN/infinite
    /// values fail safe to NEUTRAL. The underlying probability is echoed
    /// unchanged; classification only decides display eligibility.
    pub fn classify(&self, signal: &MarketSignal) -> EdgeClassification {
        // A sharp-action hint from the backend classifier supersedes the
        // local approximation when present.
        if let Some(hint) = signal.sharp_action_hint {
            return EdgeClassification {
                state: hint,
                side: signal.side.clone(),
                probability: signal.probability,
            };
        }

        let state = if !signal.deviation_points.is_finite()
            || !signal.confidence_score.is_finite()
            || !signal.variance_score.is_finite()
        {
            EdgeState::Neutral
        } else {
            let is_significant = signal.deviation_points >= self.thresholds.min_deviation_points;
            let is_stable = signal.confidence_score >= self.thresholds.min_confidence;
            let is_calm = signal.variance_score <= self.thresholds.max_variance_for_edge;

            if is_significant && is_stable && is_calm {
                EdgeState::Edge
            } else if is_significant {
                EdgeState::Lean
            } else {
                EdgeState::Neutral
            }
        };

        EdgeClassification {
            state,
            side: signal.side.clone(),
            probability: signal.probability,
        }
    }
}

/// Raw edge-point numbers are only rendered for EDGE-tier signals. Showing
/// them on LEAN-tier signals was a prior defect (implied certainty on
/// signals that had not cleared the risk gates).
pub fn should_show_raw_metrics(classification: &EdgeClassification) -> bool {
    classification.state == EdgeState::Edge
}
