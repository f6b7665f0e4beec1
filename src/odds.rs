/// Convert American odds to decimal odds.
///
/// American odds must have a magnitude of at least 100 by convention;
/// anything else (including 0 and NaN) returns NaN rather than being
/// coerced into a price.
pub fn american_to_decimal(american: f64) -> f64 {
    if american.is_nan() || american == 0.0 {
        return f64::NAN;
    }
    if american >= 100.0 {
        (american / 100.0) + 1.0
    } else if american <= -100.0 {
        (100.0 / american.abs()) + 1.0
    } else {
        f64::NAN
    }
}

/// Convert decimal odds to an American odds display string.
///
/// Decimal odds at or below 1.0 (or non-finite) have no American
/// representation and come back as "N/A".
pub fn decimal_to_american(decimal: f64) -> String {
    if !decimal.is_finite() || decimal <= 1.0 {
        return "N/A".to_string();
    }
    if decimal >= 2.0 {
        format!("+{:.0}", (decimal - 1.0) * 100.0)
    } else {
        format!("{:.0}", -100.0 / (decimal - 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_conversion() {
        let decimal = american_to_decimal(-110.0);
        assert!((decimal - 1.909).abs() < 0.001);
        assert_eq!(decimal_to_american(decimal), "-110");
    }

    #[test]
    fn test_underdog_conversion() {
        let decimal = american_to_decimal(150.0);
        assert!((decimal - 2.5).abs() < 1e-9);
        assert_eq!(decimal_to_american(2.5), "+150");
    }

    #[test]
    fn test_round_trip() {
        // -100 is omitted: even money normalizes to +100 on the way back.
        for american in [-10000.0, -250.0, -110.0, 100.0, 120.0, 425.0, 2500.0] {
            let back: f64 = decimal_to_american(american_to_decimal(american))
                .parse()
                .unwrap();
            assert_eq!(back, american, "round trip failed for {}", american);
        }
    }

    #[test]
    fn test_invalid_american_magnitude() {
        assert!(american_to_decimal(99.0).is_nan());
        assert!(american_to_decimal(-99.0).is_nan());
        assert!(american_to_decimal(0.0).is_nan());
        assert!(american_to_decimal(f64::NAN).is_nan());
    }

    #[test]
    fn test_invalid_decimal() {
        assert_eq!(decimal_to_american(1.0), "N/A");
        assert_eq!(decimal_to_american(0.5), "N/A");
        assert_eq!(decimal_to_american(f64::NAN), "N/A");
        assert_eq!(decimal_to_american(f64::INFINITY), "N/A");
    }
}
