use std::pin::Pin;
use std::sync::Arc;

use super::BoxError;
use crate::common::Frame;
use crate::error::AppError;
use crate::landmarks::{validate, DetectionSource, LandmarkDetector, LandmarkModel, LandmarkSet};
use futures::task::Context;
use futures::task::Poll;
use futures::Future;
use tower::Service;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DetectionRequest {
    pub frame: Arc<Frame>,
    pub model: LandmarkModel,
}

/// Validated landmarks and where they came from.
#[derive(Debug, Clone)]
pub struct Detection {
    pub landmarks: LandmarkSet,
    pub source: DetectionSource,
}

/// Runs a landmark detector and validates what it returns.
#[derive(Clone)]
pub struct DetectionService {
    detector: Arc<dyn LandmarkDetector>,
}

impl DetectionService {
    pub fn new(detector: Arc<dyn LandmarkDetector>) -> Self {
        Self { detector }
    }
}

impl Service<DetectionRequest> for DetectionService {
    type Response = Detection;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: DetectionRequest) -> Self::Future {
        let detector = self.detector.clone();

        Box::pin(async move {
            if !detector.is_available() {
                return Err(AppError::DetectionUnavailable(format!(
                    "{} is not available",
                    detector.name()
                ))
                .into());
            }
            let raw = detector.detect(&req.frame, req.model).await?;
            let landmarks = validate(req.model, raw.space, raw.points).map_err(AppError::from)?;
            debug!(
                "{} detected {} {} landmarks",
                detector.name(),
                landmarks.len(),
                req.model.name()
            );
            Ok(Detection {
                landmarks,
                source: DetectionSource::Detector(detector.name().to_string()),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, PrecomputedDetector, RawDetection, UnavailableDetector};
    use chrono::Utc;
    use image::{ImageBuffer, Rgb};
    use uuid::Uuid;

    fn request(model: LandmarkModel) -> DetectionRequest {
        DetectionRequest {
            frame: Arc::new(Frame::from_rgb(
                Uuid::new_v4(),
                ImageBuffer::from_pixel(100, 100, Rgb([200, 160, 140])),
                Utc::now(),
            )),
            model,
        }
    }

    #[tokio::test]
    async fn test_detection_service() {
        let points = vec![Landmark::new(0.5, 0.5, 0.0); 33];
        let detector = PrecomputedDetector::new()
            .with_result(LandmarkModel::Pose, RawDetection::normalized(points));
        let mut service = DetectionService::new(Arc::new(detector));

        let detection = service.call(request(LandmarkModel::Pose)).await.unwrap();
        assert_eq!(detection.landmarks.len(), 33);
        assert_eq!(
            detection.source,
            DetectionSource::Detector("PrecomputedDetector".to_string())
        );
    }

    #[tokio::test]
    async fn rejects_invalid_detector_output() {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); 33];
        points[4] = Landmark::new(1.5, 0.5, 0.0);
        let detector = PrecomputedDetector::new()
            .with_result(LandmarkModel::Pose, RawDetection::normalized(points));
        let mut service = DetectionService::new(Arc::new(detector));

        let err = service.call(request(LandmarkModel::Pose)).await.unwrap_err();
        let err = err.downcast::<AppError>().unwrap();
        assert!(matches!(*err, AppError::InvalidLandmarkData(_)));
    }

    #[tokio::test]
    async fn unavailable_detector_is_reported() {
        let mut service = DetectionService::new(Arc::new(UnavailableDetector));
        let err = service.call(request(LandmarkModel::FaceMesh)).await.unwrap_err();
        let err = err.downcast::<AppError>().unwrap();
        assert!(err.triggers_fallback());
    }
}
