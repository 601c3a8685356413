use super::types::{CoordinateSpace, Landmark, LandmarkModel};
use crate::common::Frame;
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;

/// Unvalidated detector output.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub space: CoordinateSpace,
    pub points: Vec<Landmark>,
}

impl RawDetection {
    pub fn normalized(points: Vec<Landmark>) -> Self {
        Self {
            space: CoordinateSpace::Normalized,
            points,
        }
    }
}

/// Landmark detection capability. Real detectors and the mock both implement it.
#[async_trait]
pub trait LandmarkDetector: Send + Sync {
    async fn detect(&self, frame: &Frame, model: LandmarkModel) -> Result<RawDetection, AppError>;
    fn name(&self) -> &'static str;
    fn is_available(&self) -> bool {
        true
    }
}

/// Serves landmark results computed elsewhere (e.g. on the capturing device).
pub struct PrecomputedDetector {
    results: HashMap<LandmarkModel, RawDetection>,
}

impl PrecomputedDetector {
    pub fn new() -> Self {
        Self {
            results: HashMap::new(),
        }
    }

    pub fn with_result(mut self, model: LandmarkModel, detection: RawDetection) -> Self {
        self.results.insert(model, detection);
        self
    }
}

impl Default for PrecomputedDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LandmarkDetector for PrecomputedDetector {
    async fn detect(&self, _frame: &Frame, model: LandmarkModel) -> Result<RawDetection, AppError> {
        self.results.get(&model).cloned().ok_or_else(|| {
            AppError::DetectionUnavailable(format!("no precomputed {} result", model.name()))
        })
    }

    fn name(&self) -> &'static str {
        "PrecomputedDetector"
    }

    fn is_available(&self) -> bool {
        !self.results.is_empty()
    }
}

/// Stands in where no detection model is installed.
pub struct UnavailableDetector;

#[async_trait]
impl LandmarkDetector for UnavailableDetector {
    async fn detect(&self, _frame: &Frame, model: LandmarkModel) -> Result<RawDetection, AppError> {
        Err(AppError::DetectionUnavailable(format!(
            "no {} model installed",
            model.name()
        )))
    }

    fn name(&self) -> &'static str {
        "UnavailableDetector"
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use image::{ImageBuffer, Rgb};
    use uuid::Uuid;

    fn frame() -> Frame {
        Frame::from_rgb(Uuid::new_v4(), ImageBuffer::from_pixel(4, 4, Rgb([0, 0, 0])), Utc::now())
    }

    #[tokio::test]
    async fn precomputed_detector_serves_only_registered_models() {
        let points = vec![Landmark::new(0.5, 0.5, 0.0); 33];
        let detector = PrecomputedDetector::new()
            .with_result(LandmarkModel::Pose, RawDetection::normalized(points.clone()));

        let pose = detector.detect(&frame(), LandmarkModel::Pose).await.unwrap();
        assert_eq!(pose.points, points);

        let face = detector.detect(&frame(), LandmarkModel::FaceMesh).await;
        assert!(matches!(face, Err(AppError::DetectionUnavailable(_))));
    }

    #[tokio::test]
    async fn unavailable_detector_always_fails_with_fallback_error() {
        let err = UnavailableDetector
            .detect(&frame(), LandmarkModel::FaceMesh)
            .await
            .unwrap_err();
        assert!(err.triggers_fallback());
        assert!(!UnavailableDetector.is_available());
    }
}
