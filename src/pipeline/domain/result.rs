use super::body::BodyAnalysis;
use super::personal_color::PersonalColorAnalysis;
use super::skin::SkinAnalysis;
use crate::common::frame::{DeviceMetadata, Frame};
use crate::error::AppError;
use crate::landmarks::DetectionSource;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Skin,
    PersonalColor,
    Body,
}

impl AnalysisKind {
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisKind::Skin => "skin",
            AnalysisKind::PersonalColor => "personal_color",
            AnalysisKind::Body => "body",
        }
    }
}

/// Letter grade for a 0..=100 score. `>=` binds to the higher grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 85.0 {
            Grade::A
        } else if score >= 70.0 {
            Grade::B
        } else if score >= 55.0 {
            Grade::C
        } else if score >= 40.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisPayload {
    Skin(SkinAnalysis),
    PersonalColor(PersonalColorAnalysis),
    Body(BodyAnalysis),
}

impl AnalysisPayload {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisPayload::Skin(_) => AnalysisKind::Skin,
            AnalysisPayload::PersonalColor(_) => AnalysisKind::PersonalColor,
            AnalysisPayload::Body(_) => AnalysisKind::Body,
        }
    }

    /// Categorical outcome as a stable label.
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisPayload::Skin(skin) => skin.skin_type.label(),
            AnalysisPayload::PersonalColor(color) => color.tone.label(),
            AnalysisPayload::Body(body) => body.worst_severity().label(),
        }
    }

    /// Named numeric metrics compared across snapshots.
    pub fn metrics(&self) -> IndexMap<String, f64> {
        let mut metrics = IndexMap::new();
        match self {
            AnalysisPayload::Skin(skin) => {
                metrics.insert("overall_score".to_string(), skin.overall_score);
                metrics.insert("ita".to_string(), skin.ita);
                metrics.insert("skin_tone_l".to_string(), skin.skin_tone.l);
                for (zone, m) in &skin.zones {
                    let zone = zone.name();
                    metrics.insert(format!("{}.oil", zone), m.oil);
                    metrics.insert(format!("{}.moisture", zone), m.moisture);
                    metrics.insert(format!("{}.redness", zone), m.redness);
                    metrics.insert(format!("{}.texture", zone), m.texture_score);
                    metrics.insert(format!("{}.pigmentation", zone), m.pigmentation_uniformity);
                }
            }
            AnalysisPayload::PersonalColor(color) => {
                metrics.insert("skin_tone_l".to_string(), color.skin_tone.l);
                metrics.insert("skin_tone_a".to_string(), color.skin_tone.a);
                metrics.insert("skin_tone_b".to_string(), color.skin_tone.b);
                metrics.insert("chroma".to_string(), color.lch.c);
                metrics.insert("hue".to_string(), color.lch.h);
                metrics.insert("ita".to_string(), color.ita);
            }
            AnalysisPayload::Body(body) => {
                metrics.insert("posture_score".to_string(), body.posture_score);
                for (segment, assessment) in &body.segments {
                    metrics.insert(
                        format!("{}.deviation", segment.name()),
                        assessment.deviation_degrees,
                    );
                }
                if let Some(ratio) = body.shoulder_hip_ratio {
                    metrics.insert("shoulder_hip_ratio".to_string(), ratio);
                }
                if let Some(bmi) = body.bmi {
                    metrics.insert("bmi".to_string(), bmi.bmi);
                    metrics.insert("weight_kg".to_string(), bmi.weight_kg);
                }
            }
        }
        metrics
    }

    /// The 0..=100 score the grade is derived from.
    fn headline_score(&self, confidence: f64) -> f64 {
        match self {
            AnalysisPayload::Skin(skin) => skin.overall_score,
            AnalysisPayload::PersonalColor(_) => confidence,
            AnalysisPayload::Body(body) => body.posture_score,
        }
    }
}

/// Immutable snapshot of one completed analysis. Re-analysis creates a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    id: Uuid,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    payload: AnalysisPayload,
    score: f64,
    confidence: f64,
    grade: Grade,
    source: DetectionSource,
    /// Frame the result was measured from, `None` for results built without one.
    #[serde(default)]
    frame_id: Option<Uuid>,
    #[serde(default)]
    device: DeviceMetadata,
}

impl AnalysisResult {
    pub fn new(
        user_id: Uuid,
        payload: AnalysisPayload,
        confidence: f64,
        source: DetectionSource,
    ) -> Self {
        Self::created_at(user_id, payload, confidence, source, Utc::now())
    }

    pub fn created_at(
        user_id: Uuid,
        payload: AnalysisPayload,
        confidence: f64,
        source: DetectionSource,
        created_at: DateTime<Utc>,
    ) -> Self {
        let score = payload.headline_score(confidence);
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at,
            score,
            grade: Grade::from_score(score),
            payload,
            confidence,
            source,
            frame_id: None,
            device: DeviceMetadata::default(),
        }
    }

    /// Tag the result with the frame and device it was measured from.
    pub fn measured_from(mut self, frame: &Frame) -> Self {
        self.frame_id = Some(frame.frame_id());
        self.device = frame.device().clone();
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn kind(&self) -> AnalysisKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &AnalysisPayload {
        &self.payload
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn source(&self) -> &DetectionSource {
        &self.source
    }

    pub fn label(&self) -> &'static str {
        self.payload.label()
    }

    pub fn frame_id(&self) -> Option<Uuid> {
        self.frame_id
    }

    pub fn device(&self) -> &DeviceMetadata {
        &self.device
    }

    /// Signed change of every shared metric since `previous` (`self - previous`).
    pub fn delta_from(&self, previous: &AnalysisResult) -> Result<AnalysisDelta, AppError> {
        if self.user_id != previous.user_id {
            return Err(AppError::Pipeline(
                "cannot compare analyses of different users".to_string(),
            ));
        }
        if self.kind() != previous.kind() {
            return Err(AppError::Pipeline(format!(
                "cannot compare {} analysis with {} analysis",
                self.kind().name(),
                previous.kind().name()
            )));
        }

        let before = previous.payload.metrics();
        let metrics = self
            .payload
            .metrics()
            .into_iter()
            .filter_map(|(name, value)| before.get(&name).map(|old| (name, value - old)))
            .collect();

        Ok(AnalysisDelta {
            kind: self.kind(),
            from: previous.id,
            to: self.id,
            elapsed_seconds: (self.created_at - previous.created_at).num_seconds(),
            score: self.score - previous.score,
            label_changed: self.label() != previous.label(),
            metrics,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDelta {
    pub kind: AnalysisKind,
    pub from: Uuid,
    pub to: Uuid,
    pub elapsed_seconds: i64,
    pub score: f64,
    pub label_changed: bool,
    /// Metrics present in both snapshots.
    pub metrics: IndexMap<String, f64>,
}
