use crate::error::AppError;
use tracing::debug;

/// Replace a non-finite result with `fallback`, logging the domain error.
pub fn finite_or(value: f64, fallback: f64, context: &'static str) -> f64 {
    if value.is_finite() {
        value
    } else {
        debug!(kind = AppError::NumericDomain(context).kind(), context, "non-finite value replaced");
        fallback
    }
}

/// Divide, falling back when the denominator is zero or the result is not finite.
pub fn safe_div(numerator: f64, denominator: f64, fallback: f64, context: &'static str) -> f64 {
    if denominator == 0.0 {
        debug!(kind = AppError::NumericDomain(context).kind(), context, "division by zero");
        return fallback;
    }
    finite_or(numerator / denominator, fallback, context)
}

/// Clamp to the 0..=100 score range; NaN becomes 0.
pub fn clamp_score(value: f64) -> f64 {
    finite_or(value, 0.0, "score").clamp(0.0, 100.0)
}

/// Mean and population standard deviation. `None` for an empty slice.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_div_falls_back_on_zero() {
        assert_eq!(safe_div(1.0, 0.0, 7.0, "test"), 7.0);
        assert_eq!(safe_div(6.0, 3.0, 7.0, "test"), 2.0);
    }

    #[test]
    fn clamp_score_bounds_and_nan() {
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(140.0), 100.0);
        assert_eq!(clamp_score(-3.0), 0.0);
    }

    #[test]
    fn mean_std_of_constant_has_zero_spread() {
        let (mean, std) = mean_std(&[4.0, 4.0, 4.0]).unwrap();
        assert_eq!(mean, 4.0);
        assert_eq!(std, 0.0);
        assert!(mean_std(&[]).is_none());
    }
}
