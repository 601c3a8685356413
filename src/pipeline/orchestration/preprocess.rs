use crate::common::Frame;
use crate::config::Settings;
use crate::error::AppError;
use crate::pipeline::context::{FrameContext, IngestedState, Stage};
use crate::pipeline::domain::capture::CaptureConditions;
use crate::pipeline::services::image::lighting::{self, LightingReport};
use crate::pipeline::services::image::white_balance::{self, WhiteBalanceGains};
use crate::pipeline::services::image::QualityGate;
use image::RgbImage;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Run CPU-bound work off the async workers.
pub async fn run_blocking<T, F>(stage: &'static str, work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Pipeline(format!("{} task failed: {}", stage, e)))
}

/// Like `run_blocking`, but gives up after `limit`. `None` on timeout or a failed task.
pub async fn run_with_deadline<T, F>(stage: &'static str, limit: Duration, work: F) -> Option<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(limit, run_blocking(stage, work)).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!("{}; using default", e);
            None
        }
        Err(_) => {
            warn!("Stage '{}' exceeded {:?}; using default", stage, limit);
            None
        }
    }
}

/// Quality gate, white balance and lighting ahead of detection.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    gate: QualityGate,
    apply_white_balance: bool,
    white_balance_timeout: Duration,
    lighting_timeout: Duration,
}

impl Preprocessor {
    pub fn new(settings: &Settings) -> Self {
        Self {
            gate: QualityGate::new(settings.quality.clone()),
            apply_white_balance: settings.pipeline.apply_white_balance,
            white_balance_timeout: settings.white_balance_timeout(),
            lighting_timeout: settings.lighting_timeout(),
        }
    }

    pub fn gate(&self) -> &QualityGate {
        &self.gate
    }

    /// Reject unusable frames. Failures here abort the run.
    pub async fn check_quality(
        &self,
        mut ctx: FrameContext<IngestedState>,
    ) -> Result<FrameContext<IngestedState>, AppError> {
        let started = Instant::now();
        let gate = self.gate.clone();
        let image = ctx.frame().shared_image();
        let report = run_blocking("quality", move || gate.check(&image)).await??;
        ctx.record(Stage::Quality, started.elapsed());

        let frame = ctx.frame().clone();
        let capture = CaptureConditions {
            quality: Some(report),
            ..ctx.capture().clone()
        };
        Ok(ctx.with_capture(frame, capture))
    }

    /// Quality gate, then color correction with per-stage deadlines.
    pub async fn prepare(
        &self,
        ctx: FrameContext<IngestedState>,
    ) -> Result<FrameContext<IngestedState>, AppError> {
        let mut ctx = self.check_quality(ctx).await?;
        let original = ctx.frame().shared_image();

        let (image, gains) = if self.apply_white_balance {
            let started = Instant::now();
            let source = Arc::clone(&original);
            let corrected = run_with_deadline("white_balance", self.white_balance_timeout, move || {
                white_balance::correct(&source)
            })
            .await;
            ctx.record(Stage::WhiteBalance, started.elapsed());
            match corrected {
                Some((image, gains)) => (Arc::new(image), gains),
                None => {
                    ctx.record_fallback(Stage::WhiteBalance);
                    (original, WhiteBalanceGains::identity())
                }
            }
        } else {
            (original, WhiteBalanceGains::identity())
        };

        let started = Instant::now();
        let source = Arc::clone(&image);
        let lighting = run_with_deadline("lighting", self.lighting_timeout, move || {
            lighting::analyze(&source)
        })
        .await;
        ctx.record(Stage::Lighting, started.elapsed());
        let lighting = lighting.unwrap_or_else(|| {
            ctx.record_fallback(Stage::Lighting);
            LightingReport::default()
        });

        debug!(
            "Prepared frame: gains ({:.2}, {:.2}, {:.2}), lighting {:?}",
            gains.r, gains.g, gains.b, lighting.condition
        );

        let frame = if gains.is_identity() {
            ctx.frame().clone()
        } else {
            ctx.frame().with_image(unwrap_image(image))
        };
        let capture = CaptureConditions {
            quality: ctx.capture().quality.clone(),
            lighting,
            white_balance: gains,
        };
        Ok(ctx.with_capture(frame, capture))
    }
}

fn unwrap_image(image: Arc<RgbImage>) -> RgbImage {
    Arc::try_unwrap(image).unwrap_or_else(|shared| (*shared).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use image::{ImageBuffer, Rgb};
    use uuid::Uuid;

    fn textured(size: u32, base: [u8; 3]) -> RgbImage {
        ImageBuffer::from_fn(size, size, |x, y| {
            let shade = ((x * 7 + y * 13) % 40) as u8;
            Rgb([base[0] - shade, base[1] - shade, base[2] - shade])
        })
    }

    fn context(image: RgbImage) -> FrameContext<IngestedState> {
        FrameContext::new(Frame::from_rgb(Uuid::new_v4(), image, Utc::now()))
    }

    #[tokio::test]
    async fn prepare_records_capture_conditions() {
        let preprocessor = Preprocessor::new(&Settings::lenient());
        let ctx = preprocessor
            .prepare(context(textured(96, [220, 170, 140])))
            .await
            .unwrap();

        let capture = ctx.capture();
        assert!(capture.quality.is_some());
        assert!(!capture.white_balance.is_identity());
        assert!(capture.lighting.cct.is_some());
        assert!(ctx.metrics().duration(Stage::WhiteBalance).is_some());
        assert!(!ctx.metrics().fell_back(Stage::Lighting));
    }

    #[tokio::test]
    async fn white_balance_can_be_disabled() {
        let mut settings = Settings::lenient();
        settings.pipeline.apply_white_balance = false;
        let ctx = Preprocessor::new(&settings)
            .prepare(context(textured(96, [220, 170, 140])))
            .await
            .unwrap();
        assert!(ctx.capture().white_balance.is_identity());
        assert_eq!(ctx.metrics().duration(Stage::WhiteBalance), None);
    }

    #[tokio::test]
    async fn undersized_frame_aborts() {
        let preprocessor = Preprocessor::new(&Settings::lenient());
        let result = preprocessor
            .prepare(context(ImageBuffer::from_pixel(8, 8, Rgb([120, 100, 90]))))
            .await;
        assert!(matches!(result, Err(AppError::InvalidInputImage(_))));
    }

    #[tokio::test]
    async fn expired_deadline_yields_none() {
        let value = run_with_deadline("slow", Duration::from_millis(10), || {
            std::thread::sleep(Duration::from_millis(200));
            1
        })
        .await;
        assert_eq!(value, None);
    }
}
