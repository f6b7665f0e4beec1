use crate::analyzer::GameAnalysis;
use serde::{Deserialize, Serialize};

/// Kelly criterion fraction for a single binary wager with net odds
/// b = decimal_odds - 1. Equivalent to EV / b.
pub fn kelly_fraction(win_prob: f64, decimal_odds: f64) -> f64 {
    let b = decimal_odds - 1.0;
    ((win_prob * b) - (1.0 - win_prob)) / b
}

/// Recommended stake for a bankroll. Only meaningful when the fraction is
/// positive; callers discard non-positive results instead of recommending
/// a zero or negative stake.
pub fn kelly_stake(bankroll: f64, win_prob: f64, decimal_odds: f64) -> f64 {
    bankroll * kelly_fraction(win_prob, decimal_odds)
}

/// A Kelly-sized stake on the single best candidate of one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KellyBet {
    pub game_id: String,
    pub matchup: String,
    pub label: String,
    pub odds: f64,
    pub ev: f64,
    pub fraction: f64,
    pub stake: f64,
}

/// Size one bet per game: the highest-EV candidate across that game's
/// markets. No fractional allocation across correlated bets on the same
/// event, and no aggregate exposure cap across games.
pub fn build_kelly_bets(analyses: &[GameAnalysis], bankroll: f64) -> Vec<KellyBet> {
    let mut bets = Vec::new();

    for analysis in analyses {
        let best = match analysis.best_candidate() {
            Some(candidate) if candidate.ev > 0.0 => candidate,
            _ => continue,
        };

        let fraction = kelly_fraction(best.win_prob, best.odds);
        if fraction <= 0.0 || !fraction.is_finite() {
            continue;
        }

        bets.push(KellyBet {
            game_id: analysis.game_id.clone(),
            matchup: analysis.matchup.clone(),
            label: best.label.clone(),
            odds: best.odds,
            ev: best.ev,
            fraction,
            stake: bankroll * fraction,
        });
    }

    bets
}
