use serde::{Deserialize, Serialize};

/// Remove the bookmaker's overround from a two-sided market and return the
/// fair probability of side A.
///
/// If either price is missing (zero, NaN, or negative) the market is
/// incomplete and we fall back to a coin flip rather than failing, so that
/// the other markets on the same game can still be evaluated.
pub fn no_vig_probability(odds_a: f64, odds_b: f64) -> f64 {
    if !(odds_a > 0.0) || !(odds_b > 0.0) {
        return 0.5;
    }
    let implied_a = 1.0 / odds_a;
    let implied_b = 1.0 / odds_b;
    let total_implied = implied_a + implied_b;
    if total_implied == 0.0 {
        return 0.5;
    }
    implied_a / total_implied
}

/// How the observed line movement feeds into the adjusted probability.
///
/// `Extrapolate` treats the shift as a leading indicator and adds it on top
/// of the current probability (doubling the move). `ReportOnly` keeps the
/// current probability and only reports the shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MomentumMode {
    Extrapolate,
    ReportOnly,
}

impl Default for MomentumMode {
    fn default() -> Self {
        MomentumMode::Extrapolate
    }
}

/// Outcome of a momentum calculation for the away side of a moneyline.
///
/// `NoData` means no historical snapshot was usable. That is not the same
/// claim as "no movement" - callers must surface it as momentum being
/// unavailable instead of silently treating the shift as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MomentumResult {
    Ok { prob: f64, shift: f64 },
    NoData { prob: f64 },
}

impl MomentumResult {
    /// The probability estimate, adjusted when historical data was present.
    pub fn prob(&self) -> f64 {
        match self {
            MomentumResult::Ok { prob, .. } => *prob,
            MomentumResult::NoData { prob } => *prob,
        }
    }

    /// The observed probability shift, only when historical data was usable.
    pub fn shift(&self) -> Option<f64> {
        match self {
            MomentumResult::Ok { shift, .. } => Some(*shift),
            MomentumResult::NoData { .. } => None,
        }
    }

    pub fn has_data(&self) -> bool {
        matches!(self, MomentumResult::Ok { .. })
    }
}

fn clamp_prob(prob: f64) -> f64 {
    prob.clamp(0.01, 0.99)
}

/// Momentum-adjusted win probability for the away side, comparing the
/// current moneyline against a historical snapshot of the same two sides.
pub fn momentum_adjusted_probability(
    current_away: Option<f64>,
    current_home: Option<f64>,
    historical_away: Option<f64>,
    historical_home: Option<f64>,
    mode: MomentumMode,
) -> MomentumResult {
    let current_prob = no_vig_probability(
        current_away.unwrap_or(0.0),
        current_home.unwrap_or(0.0),
    );

    let (hist_away, hist_home) = match (historical_away, historical_home) {
        (Some(a), Some(h)) => (a, h),
        _ => return MomentumResult::NoData { prob: current_prob },
    };

    let opening_prob = no_vig_probability(hist_away, hist_home);
    let shift = current_prob - opening_prob;
    let adjusted = match mode {
        MomentumMode::Extrapolate => clamp_prob(current_prob + shift),
        MomentumMode::ReportOnly => clamp_prob(current_prob),
    };

    MomentumResult::Ok {
        prob: adjusted,
        shift,
    }
}

/// Earlier spread-based momentum heuristic, for when no historical odds
/// source is wired in. A wider spread gap implies stronger market momentum
/// for the favorite; a 10-point favorite gets a 5% probability boost.
pub fn spread_momentum_probability(
    base_probability: f64,
    spread_away: Option<f64>,
    spread_home: Option<f64>,
) -> MomentumResult {
    let (away, home) = match (spread_away, spread_home) {
        (Some(a), Some(h)) => (a, h),
        _ => {
            return MomentumResult::NoData {
                prob: base_probability,
            }
        }
    };

    let momentum_factor = (home - away) / 2.0;
    let adjustment = momentum_factor * 0.005;

    MomentumResult::Ok {
        prob: clamp_prob(base_probability + adjustment),
        shift: adjustment,
    }
}

/// Fading the trend is a probability inversion applied before EV math.
pub fn fade_probability(prob: f64) -> f64 {
    1.0 - prob
}
