use crate::odds::american_to_decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest combination size worth tabulating.
pub const MAX_COMBO_SIZE: u32 = 15;

#[derive(Debug, Error)]
pub enum RoundRobinError {
    #[error("need at least 2 legs to analyze round robins, got {0}")]
    NotEnoughLegs(u32),
}

/// Binomial coefficient, computed iteratively over the smaller of k and
/// n - k to avoid factorial overflow, then rounded to correct float drift.
pub fn combinations(n: u32, mut k: u32) -> u64 {
    if k > n {
        return 0;
    }
    if n - k < k {
        k = n - k;
    }
    let mut result = 1.0_f64;
    for i in 1..=k {
        result = result * ((n - i + 1) as f64) / (i as f64);
    }
    result.round() as u64
}

/// One row of the round-robin break-even table, for combination size k.
///
/// `wins_needed` of `None` means no win count within range turns a profit;
/// that is a distinct state from breaking even exactly, so the profit
/// fields stay empty rather than reading as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboRow {
    pub combo_size: u32,
    pub num_combos: u64,
    pub cost: f64,
    pub wins_needed: Option<u32>,
    pub profit_at_break_even: Option<f64>,
    pub profit_per_win: Option<f64>,
    pub roi_at_break_even: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRobinTable {
    pub num_legs: u32,
    pub avg_odds: f64,
    pub wager_per_bet: f64,
    pub rows: Vec<ComboRow>,
    /// Combination size with the best profit-per-win (bet slip view).
    pub best_by_profit_per_win: Option<u32>,
    /// Combination size with the best break-even ROI (strategy parlay view).
    pub best_by_roi: Option<u32>,
}

/// Build the break-even table for every combination size from 2 up to
/// min(15, num_legs).
///
/// For each size k the search walks the win count w upward from k and takes
/// the smallest w whose winning combinations pay out more than the full
/// cost. The relationship is not linear in w because C(w, k) grows
/// binomially, so this stays a brute-force scan rather than a closed form.
pub fn build_round_robin_table(
    num_legs: u32,
    wager_per_bet: f64,
    avg_decimal_odds: f64,
) -> Result<RoundRobinTable, RoundRobinError> {
    if num_legs < 2 {
        return Err(RoundRobinError::NotEnoughLegs(num_legs));
    }

    let max_combo_size = MAX_COMBO_SIZE.min(num_legs);
    let mut rows = Vec::with_capacity((max_combo_size - 1) as usize);

    let mut best_profit_per_win = f64::NEG_INFINITY;
    let mut best_by_profit_per_win = None;
    let mut best_roi = f64::NEG_INFINITY;
    let mut best_by_roi = None;

    for k in 2..=max_combo_size {
        let num_combos = combinations(num_legs, k);
        let cost = num_combos as f64 * wager_per_bet;
        let payout_per_winning_combo = avg_decimal_odds.powi(k as i32) * wager_per_bet;

        let mut row = ComboRow {
            combo_size: k,
            num_combos,
            cost,
            wins_needed: None,
            profit_at_break_even: None,
            profit_per_win: None,
            roi_at_break_even: None,
        };

        for w in k..=num_legs {
            let total_winnings = combinations(w, k) as f64 * payout_per_winning_combo;
            if total_winnings > cost {
                let profit = total_winnings - cost;
                row.wins_needed = Some(w);
                row.profit_at_break_even = Some(profit);
                row.profit_per_win = Some(profit / w as f64);
                if cost > 0.0 {
                    row.roi_at_break_even = Some(profit / cost * 100.0);
                }
                break;
            }
        }

        if let Some(profit_per_win) = row.profit_per_win {
            if profit_per_win > best_profit_per_win {
                best_profit_per_win = profit_per_win;
                best_by_profit_per_win = Some(k);
            }
        }
        if let Some(roi) = row.roi_at_break_even {
            if roi > best_roi {
                best_roi = roi;
                best_by_roi = Some(k);
            }
        }

        rows.push(row);
    }

    Ok(RoundRobinTable {
        num_legs,
        avg_odds: avg_decimal_odds,
        wager_per_bet,
        rows,
        best_by_profit_per_win,
        best_by_roi,
    })
}

/// A user-typed American odds override takes precedence over the slip's
/// computed average whenever it converts to a valid decimal price.
pub fn effective_average_odds(calculated_avg: f64, override_american: Option<f64>) -> f64 {
    match override_american.map(american_to_decimal) {
        Some(decimal) if !decimal.is_nan() => decimal,
        _ => calculated_avg,
    }
}
