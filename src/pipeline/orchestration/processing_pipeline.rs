use crate::color::Shade;
use crate::common::Frame;
use crate::config::Settings;
use crate::error::AppError;
use crate::landmarks::{LandmarkDetector, LandmarkModel, MockLandmarkDetector, UnavailableDetector};
use crate::pipeline::context::{AnalyzedState, FrameContext, IngestedState, LandmarkedState, Stage};
use crate::pipeline::domain::body::BodyMeasurements;
use crate::pipeline::domain::result::{AnalysisPayload, AnalysisResult};
use crate::pipeline::orchestration::preprocess::{run_blocking, Preprocessor};
use crate::pipeline::orchestration::service::{
    into_app_error, BoxError, Detection, DetectionRequest, DetectionService, FallbackLayer,
};
use crate::pipeline::services::assemble;
use crate::pipeline::services::classify::body::bmi_reading;
use crate::pipeline::services::texture::GlcmOptions;
use crate::pipeline::services::zones::{extract_face_zones, PoseGeometry};
use crate::pipeline::services::ZoneMeasurer;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::timeout::TimeoutLayer;
use tower::util::BoxService;
use tower::{Service, ServiceBuilder, ServiceExt};
use tracing::{info, instrument, warn};

pub type DetectionStep = BoxService<DetectionRequest, Detection, BoxError>;

pub struct PipelineBuilder {
    settings: Settings,
    detector: Option<Arc<dyn LandmarkDetector>>,
    detection_timeout: Option<Duration>,
    catalogue: Vec<Shade>,
}

impl PipelineBuilder {
    pub fn new(settings: Settings) -> Self {
        Self {
            detection_timeout: Some(settings.detection_timeout()),
            catalogue: settings.catalogue.shades.clone(),
            settings,
            detector: None,
        }
    }

    pub fn detector(mut self, detector: Arc<dyn LandmarkDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    // Overrides the configured detection timeout; `None` waits indefinitely.
    pub fn detection_timeout(mut self, detection_timeout: Option<Duration>) -> Self {
        self.detection_timeout = detection_timeout;
        self
    }

    /// Product shades ranked against the measured skin tone. Replaces the configured catalogue.
    pub fn catalogue(mut self, catalogue: Vec<Shade>) -> Self {
        self.catalogue = catalogue;
        self
    }

    fn detection_step(&self) -> DetectionStep {
        let detector = self.detector.clone().unwrap_or_else(|| {
            warn!("No landmark detector configured, every run will use mock landmarks");
            Arc::new(UnavailableDetector)
        });

        let detection_builder = ServiceBuilder::new()
            .layer(FallbackLayer::new(MockLandmarkDetector::new(
                self.settings.pipeline.mock_seed,
            )))
            .option_layer(self.detection_timeout.map(TimeoutLayer::new))
            .service(DetectionService::new(detector));

        BoxService::new(detection_builder)
    }

    pub fn build_face(&self) -> AnalysisPipeline {
        AnalysisPipeline {
            preprocessor: Preprocessor::new(&self.settings),
            detection: self.detection_step(),
            measurer: ZoneMeasurer::new(GlcmOptions {
                levels: self.settings.pipeline.glcm_levels,
                distance: self.settings.pipeline.glcm_distance,
            }),
            catalogue: Arc::new(self.catalogue.clone()),
        }
    }

    pub fn build_body(&self) -> BodyPipeline {
        BodyPipeline {
            preprocessor: Preprocessor::new(&self.settings),
            detection: self.detection_step(),
        }
    }
}

async fn detect(
    detection: &mut DetectionStep,
    mut ctx: FrameContext<IngestedState>,
    model: LandmarkModel,
) -> Result<FrameContext<LandmarkedState>, AppError> {
    let started = Instant::now();
    let request = DetectionRequest {
        frame: ctx.shared_frame(),
        model,
    };
    let detection = detection
        .ready()
        .await
        .map_err(|e| into_app_error(e, "detection"))?
        .call(request)
        .await
        .map_err(|e| into_app_error(e, "detection"))?;

    ctx.record(Stage::Detection, started.elapsed());
    if detection.source.is_mock() {
        ctx.record_fallback(Stage::Detection);
    }
    Ok(ctx.into_landmarked(detection.landmarks, detection.source))
}

/// Face pipeline: one frame in, a skin and a personal color result out.
pub struct AnalysisPipeline {
    preprocessor: Preprocessor,
    detection: DetectionStep,
    measurer: ZoneMeasurer,
    catalogue: Arc<Vec<Shade>>,
}

impl AnalysisPipeline {
    pub fn builder(settings: Settings) -> PipelineBuilder {
        PipelineBuilder::new(settings)
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    #[instrument(skip_all, fields(user = %frame.user_id(), frame = %frame.frame_id()))]
    pub async fn process(&mut self, frame: Frame) -> Result<FrameContext<AnalyzedState>, AppError> {
        let ctx = self.preprocessor.prepare(FrameContext::new(frame)).await?;
        let mut ctx = detect(&mut self.detection, ctx, LandmarkModel::FaceMesh).await?;

        let started = Instant::now();
        let image = ctx.frame().shared_image();
        let landmarks = ctx.landmarks().clone();
        let measurer = self.measurer;
        let zones = run_blocking("measurement", move || {
            let (width, height) = image.dimensions();
            let regions = extract_face_zones(&landmarks, width, height)?;
            measurer.measure_face(&image, &regions)
        })
        .await??;
        ctx.record(Stage::Measurement, started.elapsed());

        let started = Instant::now();
        let (color, color_confidence) =
            assemble::personal_color_analysis(&zones, ctx.capture().clone(), &self.catalogue)?;
        let (skin, skin_confidence) = assemble::skin_analysis(zones, ctx.capture().clone())?;

        let user_id = ctx.frame().user_id();
        let source = ctx.source().clone();
        let results = vec![
            AnalysisResult::new(user_id, AnalysisPayload::Skin(skin), skin_confidence, source.clone())
                .measured_from(ctx.frame()),
            AnalysisResult::new(
                user_id,
                AnalysisPayload::PersonalColor(color),
                color_confidence,
                source,
            )
            .measured_from(ctx.frame()),
        ];
        ctx.record(Stage::Classification, started.elapsed());

        for result in &results {
            info!(
                "{} analysis: {} (score {:.1}, grade {}, confidence {:.1})",
                result.kind().name(),
                result.label(),
                result.score(),
                result.grade().letter(),
                result.confidence()
            );
        }
        info!("Face pipeline finished in {:?}", ctx.elapsed());
        Ok(ctx.into_analyzed(results))
    }
}

/// Body pipeline: posture, proportions and optional BMI from one frame.
pub struct BodyPipeline {
    preprocessor: Preprocessor,
    detection: DetectionStep,
}

impl BodyPipeline {
    #[instrument(skip_all, fields(user = %frame.user_id(), frame = %frame.frame_id()))]
    pub async fn process(
        &mut self,
        frame: Frame,
        measurements: Option<BodyMeasurements>,
    ) -> Result<FrameContext<AnalyzedState>, AppError> {
        // Fail fast on bad measurements before any image work.
        let bmi = measurements
            .map(|m| bmi_reading(m.height_cm, m.weight_kg))
            .transpose()?;

        let ctx = self.preprocessor.check_quality(FrameContext::new(frame)).await?;
        let mut ctx = detect(&mut self.detection, ctx, LandmarkModel::Pose).await?;

        let started = Instant::now();
        let (width, height) = ctx.frame().dimensions();
        let geometry = PoseGeometry::new(ctx.landmarks(), width, height)?;
        let (body, confidence) = assemble::body_analysis(&geometry, bmi)?;
        let result = AnalysisResult::new(
            ctx.frame().user_id(),
            AnalysisPayload::Body(body),
            confidence,
            ctx.source().clone(),
        )
        .measured_from(ctx.frame());
        ctx.record(Stage::Classification, started.elapsed());

        info!(
            "body analysis: {} (posture score {:.1}, grade {})",
            result.label(),
            result.score(),
            result.grade().letter()
        );
        Ok(ctx.into_analyzed(vec![result]))
    }
}
