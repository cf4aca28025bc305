/// Display tier for a classified market. EDGE is actionable, LEAN is
/// directional-but-noisy, NEUTRAL shows nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeState {
    Edge,
    Lean,
    Neutral,
}

impl std::fmt::Display for EdgeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeState::Edge => write!(f, "EDGE"),
            EdgeState::Lean => write!(f, "LEAN"),
            EdgeState::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketKind {
    Spread,
    Total,
    Moneyline,
}

impl std::fmt::Display for MarketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketKind::Spread => write!(f, "spread"),
            MarketKind::Total => write!(f, "total"),
            MarketKind::Moneyline => write!(f, "moneyline"),
        }
    }
}

/// One market's worth of simulation output, normalized for classification.
/// Built fresh from fetched data on every scan pass, never cached or mutated.
#[derive(Debug, Clone)]
pub struct MarketSignal {
    /// |model projection - market line|, in points (probability points for
    /// moneyline markets).
    pub deviation_points: f64,
    /// Dispersion of the underlying simulation, higher = noisier.
    pub variance_score: f64,
    /// Simulation-stability score, 0-100.
    pub confidence_score: f64,
    /// Implied win/cover probability, passed through unchanged.
    pub probability: f64,
    /// Authoritative upstream override; absent means "compute locally".
    pub sharp_action_hint: Option<EdgeState>,
    /// Favored selection label, if any.
    pub side: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeClassification {
    pub state: EdgeState,
    pub side: Option<String>,
    pub probability: f64,
}

/// One leg of a candidate parlay.
#[derive(Debug, Clone, PartialEq)]
pub struct ParlayLeg {
    pub label: String,
    /// Model-estimated win probability, in (0, 1].
    pub true_probability: f64,
    /// American odds, nonzero (conventionally <= -100 or >= +100).
    pub american_odds: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Volatility {
    Low,
    Medium,
    High,
    Extreme,
}

impl std::fmt::Display for Volatility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Volatility::Low => write!(f, "Low"),
            Volatility::Medium => write!(f, "Medium"),
            Volatility::High => write!(f, "High"),
            Volatility::Extreme => write!(f, "Extreme"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParlayCalculation {
    pub combined_probability: f64,
    pub decimal_odds: f64,
    pub implied_book_probability: f64,
    pub ev_percent: f64,
    pub volatility: Volatility,
    pub potential_payout: f64,
    pub potential_profit: f64,
}

/// Advisory correlation label for a parlay. Descriptive metadata only: the
/// combined probability is always the naive independence product, the grade
/// never adjusts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationGrade {
    High,
    Medium,
    Low,
    CrossSport,
    Negative,
}

impl CorrelationGrade {
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            CorrelationGrade::High => Some(
                "Legs are highly correlated; the true combined probability may differ \
                 substantially from the independence estimate",
            ),
            CorrelationGrade::Negative => Some(
                "Legs are negatively correlated; this parlay is statistically \
                 disadvantaged beyond what the EV figure shows",
            ),
            CorrelationGrade::Medium => {
                Some("Legs share some correlation; treat the EV figure as optimistic")
            }
            CorrelationGrade::Low | CorrelationGrade::CrossSport => None,
        }
    }
}

impl std::fmt::Display for CorrelationGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrelationGrade::High => write!(f, "HIGH"),
            CorrelationGrade::Medium => write!(f, "MEDIUM"),
            CorrelationGrade::Low => write!(f, "LOW"),
            CorrelationGrade::CrossSport => write!(f, "CROSS_SPORT"),
            CorrelationGrade::Negative => write!(f, "NEGATIVE"),
        }
    }
}
