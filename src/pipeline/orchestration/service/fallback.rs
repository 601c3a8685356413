use std::pin::Pin;
use std::sync::Arc;

use super::detection_service::{Detection, DetectionRequest};
use super::BoxError;
use crate::error::AppError;
use crate::landmarks::{validate, DetectionSource, MockLandmarkDetector};
use futures::task::Context;
use futures::task::Poll;
use futures::Future;
use tower::Service;
use tower_layer::Layer;
use tracing::warn;

/// Substitutes mock landmarks when detection is unavailable or times out.
#[derive(Clone)]
pub struct FallbackLayer {
    mock: Arc<MockLandmarkDetector>,
}

impl FallbackLayer {
    pub fn new(mock: MockLandmarkDetector) -> Self {
        Self {
            mock: Arc::new(mock),
        }
    }
}

impl<S> Layer<S> for FallbackLayer {
    type Service = FallbackService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FallbackService {
            inner,
            mock: self.mock.clone(),
        }
    }
}

#[derive(Clone)]
pub struct FallbackService<S> {
    inner: S,
    mock: Arc<MockLandmarkDetector>,
}

/// Only a missing detector or a stage timeout is masked. Bad landmark data never is.
fn should_fall_back(err: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    if err.is::<tower::timeout::error::Elapsed>() {
        return true;
    }
    err.downcast_ref::<AppError>()
        .map(AppError::triggers_fallback)
        .unwrap_or(false)
}

impl<S> Service<DetectionRequest> for FallbackService<S>
where
    S: Service<DetectionRequest, Response = Detection>,
    S::Error: Into<BoxError>,
    S::Future: Send + 'static,
{
    type Response = Detection;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(Into::into)
    }

    fn call(&mut self, req: DetectionRequest) -> Self::Future {
        let mock = self.mock.clone();
        let model = req.model;
        let detection = self.inner.call(req);

        Box::pin(async move {
            match detection.await {
                Ok(detection) => Ok(detection),
                Err(err) => {
                    let err: BoxError = err.into();
                    if !should_fall_back(err.as_ref()) {
                        return Err(err);
                    }
                    warn!("Landmark detection fell back to mock: {}", err);
                    let raw = mock.generate(model);
                    let landmarks = validate(model, raw.space, raw.points).map_err(AppError::from)?;
                    Ok(Detection {
                        landmarks,
                        source: DetectionSource::Mock,
                    })
                }
            }
        })
    }
}
