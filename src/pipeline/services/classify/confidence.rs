use crate::common::numeric::{clamp_score, mean_std, safe_div};

/// 100 * (1 - coefficient of variation). Agreeing readings give high confidence.
///
/// `None` for an empty sample; a zero mean with no spread counts as full agreement.
pub fn from_variation(values: &[f64]) -> Option<f64> {
    let (mean, std) = mean_std(values)?;
    let cv = if std == 0.0 {
        0.0
    } else {
        safe_div(std, mean.abs(), 1.0, "confidence_cv")
    };
    Some(clamp_score(100.0 * (1.0 - cv)))
}

/// Confidence from how far a value sits from a decision boundary.
///
/// `margin` is the absolute distance, `scale` the distance treated as certain.
pub fn from_margin(margin: f64, scale: f64) -> f64 {
    clamp_score(100.0 * safe_div(margin.abs(), scale, 0.0, "confidence_margin").min(1.0))
}
