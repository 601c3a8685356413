use super::result::{AnalysisKind, AnalysisResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-sample slope magnitude below which a series counts as stable.
pub const STABLE_SLOPE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

/// Least-squares slope against sample index. `None` for fewer than two samples.
pub fn slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let (covariance, variance) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(cov, var), (i, y)| {
            let dx = i as f64 - mean_x;
            (cov + dx * (y - mean_y), var + dx * dx)
        });
    let slope = covariance / variance;
    slope.is_finite().then_some(slope)
}

/// Direction of a series where higher values are better.
pub fn trend_of(values: &[f64]) -> Trend {
    match slope(values) {
        Some(s) if s >= STABLE_SLOPE => Trend::Improving,
        Some(s) if s <= -STABLE_SLOPE => Trend::Declining,
        _ => Trend::Stable,
    }
}

/// Pearson correlation. `None` for < 3 samples, length mismatch or zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 3 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        covariance += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    let r = covariance / (var_x.sqrt() * var_y.sqrt());
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Chronological scores of one user's analyses of one kind.
pub fn score_series(results: &[AnalysisResult], user_id: Uuid, kind: AnalysisKind) -> Vec<f64> {
    let mut selected: Vec<&AnalysisResult> = results
        .iter()
        .filter(|r| r.user_id() == user_id && r.kind() == kind)
        .collect();
    selected.sort_by_key(|r| r.timestamp());
    selected.iter().map(|r| r.score()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::DetectionSource;
    use crate::pipeline::domain::result::tests::body_payload;
    use chrono::{Duration, Utc};

    #[test]
    fn slope_of_a_line() {
        assert!((slope(&[1.0, 3.0, 5.0, 7.0]).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(slope(&[4.0]), None);
    }

    #[test]
    fn trend_thresholds() {
        assert_eq!(trend_of(&[50.0, 52.0, 54.0]), Trend::Improving);
        assert_eq!(trend_of(&[50.0, 50.2, 50.4]), Trend::Stable);
        assert_eq!(trend_of(&[60.0, 55.0, 50.0]), Trend::Declining);
        assert_eq!(trend_of(&[]), Trend::Stable);
    }

    #[test]
    fn pearson_edge_cases() {
        assert!((pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[1.0, 2.0], &[1.0, 2.0]), None);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0]), None);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn series_is_chronological_and_filtered() {
        let user = Uuid::new_v4();
        let t0 = Utc::now();
        let at = |days: i64, score: f64| {
            AnalysisResult::created_at(
                user,
                body_payload(score, 1.0),
                90.0,
                DetectionSource::Mock,
                t0 + Duration::days(days),
            )
        };
        let other = AnalysisResult::new(Uuid::new_v4(), body_payload(10.0, 1.0), 90.0, DetectionSource::Mock);
        let results = vec![at(2, 70.0), other, at(0, 60.0), at(1, 65.0)];

        let series = score_series(&results, user, AnalysisKind::Body);
        assert_eq!(series, vec![60.0, 65.0, 70.0]);
        assert_eq!(trend_of(&series), Trend::Improving);
        assert!(score_series(&results, user, AnalysisKind::Skin).is_empty());
    }
}
