use super::zones::PostureSegment;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Normal => "normal",
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentAssessment {
    pub deviation_degrees: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyShape {
    InvertedTriangle,
    Rectangle,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
    SevereObese,
}

/// Self-reported height and weight supplied with a body analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurements {
    pub height_cm: f64,
    pub weight_kg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiReading {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub category: BmiCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyAnalysis {
    pub segments: IndexMap<PostureSegment, SegmentAssessment>,
    /// 0..=100, 100 is perfectly aligned.
    pub posture_score: f64,
    pub shoulder_hip_ratio: Option<f64>,
    pub shape: Option<BodyShape>,
    pub bmi: Option<BmiReading>,
}

impl BodyAnalysis {
    /// Worst severity across segments.
    pub fn worst_severity(&self) -> Severity {
        self.segments
            .values()
            .map(|s| s.severity)
            .max()
            .unwrap_or(Severity::Normal)
    }
}
