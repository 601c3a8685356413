use crate::common::numeric::clamp_score;
use crate::pipeline::domain::body::{SegmentAssessment, Severity};
use crate::pipeline::domain::zones::PostureSegment;
use crate::pipeline::services::zones::SegmentDeviations;
use indexmap::IndexMap;

pub const MILD_DEGREES: f64 = 2.0;
pub const MODERATE_DEGREES: f64 = 5.0;
pub const SEVERE_DEGREES: f64 = 10.0;

/// Normal < 2°, Mild [2, 5), Moderate [5, 10), Severe >= 10°. Sign is ignored.
pub fn severity(deviation_degrees: f64) -> Severity {
    let degrees = deviation_degrees.abs();
    if degrees >= SEVERE_DEGREES {
        Severity::Severe
    } else if degrees >= MODERATE_DEGREES {
        Severity::Moderate
    } else if degrees >= MILD_DEGREES {
        Severity::Mild
    } else {
        Severity::Normal
    }
}

fn penalty(severity: Severity) -> f64 {
    match severity {
        Severity::Normal => 0.0,
        Severity::Mild => 5.0,
        Severity::Moderate => 12.0,
        Severity::Severe => 20.0,
    }
}

pub fn assess(deviations: &SegmentDeviations) -> IndexMap<PostureSegment, SegmentAssessment> {
    deviations
        .iter()
        .map(|(segment, degrees)| {
            (
                *segment,
                SegmentAssessment {
                    deviation_degrees: *degrees,
                    severity: severity(*degrees),
                },
            )
        })
        .collect()
}

/// 100 minus per-segment severity penalties.
pub fn posture_score(segments: &IndexMap<PostureSegment, SegmentAssessment>) -> f64 {
    clamp_score(100.0 - segments.values().map(|s| penalty(s.severity)).sum::<f64>())
}
