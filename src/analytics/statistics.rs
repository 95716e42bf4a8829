//! Guarded ratio helpers

use crate::analytics::error::{AnalyticsError, AnalyticsResult};

/// `numerator / denominator`, failing on a zero denominator
pub fn try_ratio(numerator: f64, denominator: f64) -> AnalyticsResult<f64> {
    if denominator == 0.0 || !denominator.is_finite() {
        return Err(AnalyticsError::EmptyDenominator { numerator });
    }
    Ok(numerator / denominator)
}

/// `numerator / denominator`, or 0 when the denominator is empty
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    try_ratio(numerator, denominator).unwrap_or(0.0)
}

/// Ratio expressed as a percentage, 0 when the denominator is empty
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    ratio(numerator, denominator) * 100.0
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    ratio(values.iter().sum(), values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_guards() {
        assert_eq!(ratio(3.0, 4.0), 0.75);
        assert_eq!(ratio(3.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(
            try_ratio(5.0, 0.0),
            Err(AnalyticsError::EmptyDenominator { numerator: 5.0 })
        );
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[2.0, 4.0]), 3.0);
    }
}
