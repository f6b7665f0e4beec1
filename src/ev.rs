/// Expected net return per unit staked at the given decimal odds.
///
/// NaN inputs propagate; callers guard against missing odds before sizing
/// anything off the result.
pub fn expected_value(win_prob: f64, decimal_odds: f64) -> f64 {
    (win_prob * (decimal_odds - 1.0)) - (1.0 - win_prob)
}

/// A bet is value when its EV is strictly positive.
pub fn is_positive_ev(ev: f64) -> bool {
    ev > 0.0
}

/// Display convention: EV as a signed percentage.
pub fn format_ev(ev: f64) -> String {
    if ev > 0.0 {
        format!("+{:.2}%", ev * 100.0)
    } else {
        format!("{:.2}%", ev * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ev_scenario() {
        // 55% at even money: 0.55 * 1.0 - 0.45 = 0.10
        let ev = expected_value(0.55, 2.0);
        assert!((ev - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_ev_sign_matches_implied_probability() {
        for (p, d) in [(0.55, 2.0), (0.40, 2.4), (0.52, 1.91), (0.10, 12.0)] {
            let ev = expected_value(p, d);
            assert_eq!(ev > 0.0, p > 1.0 / d, "sign mismatch at p={}, d={}", p, d);
        }
    }

    #[test]
    fn test_ev_nan_propagates() {
        assert!(expected_value(f64::NAN, 2.0).is_nan());
        assert!(expected_value(0.55, f64::NAN).is_nan());
    }

    #[test]
    fn test_format_ev() {
        assert_eq!(format_ev(0.10), "+10.00%");
        assert_eq!(format_ev(-0.0525), "-5.25%");
    }
}
