use crate::common::frame::Frame;
use crate::landmarks::{DetectionSource, LandmarkSet};
use crate::pipeline::context::metrics::{Stage, StageMetrics};
use crate::pipeline::context::state::{AnalyzedState, IngestedState, LandmarkedState};
use crate::pipeline::domain::capture::CaptureConditions;
use crate::pipeline::domain::result::AnalysisResult;
use std::sync::Arc;
use std::time::{Duration, Instant};

// FrameContext with compile-time state tracking via the state marker
pub struct FrameContext<S> {
    frame: Arc<Frame>,
    capture: CaptureConditions,
    metrics: StageMetrics,
    processing_start: Instant,
    state: S,
}

impl<S> FrameContext<S> {
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn shared_frame(&self) -> Arc<Frame> {
        Arc::clone(&self.frame)
    }

    pub fn capture(&self) -> &CaptureConditions {
        &self.capture
    }

    pub fn metrics(&self) -> &StageMetrics {
        &self.metrics
    }

    pub fn record(&mut self, stage: Stage, duration: Duration) {
        self.metrics.record(stage, duration);
    }

    pub fn record_fallback(&mut self, stage: Stage) {
        self.metrics.record_fallback(stage);
    }

    pub fn elapsed(&self) -> Duration {
        self.processing_start.elapsed()
    }
}

impl FrameContext<IngestedState> {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame: Arc::new(frame),
            capture: CaptureConditions::default(),
            metrics: StageMetrics::new(),
            processing_start: Instant::now(),
            state: IngestedState,
        }
    }

    /// Replace the working frame (e.g. after white balance) and record how it was captured.
    pub fn with_capture(mut self, frame: Frame, capture: CaptureConditions) -> Self {
        self.frame = Arc::new(frame);
        self.capture = capture;
        self
    }

    pub fn into_landmarked(
        self,
        landmarks: LandmarkSet,
        source: DetectionSource,
    ) -> FrameContext<LandmarkedState> {
        FrameContext::<LandmarkedState> {
            frame: self.frame,
            capture: self.capture,
            metrics: self.metrics,
            processing_start: self.processing_start,
            state: LandmarkedState { landmarks, source },
        }
    }
}

impl FrameContext<LandmarkedState> {
    pub fn landmarks(&self) -> &LandmarkSet {
        &self.state.landmarks
    }

    pub fn source(&self) -> &DetectionSource {
        &self.state.source
    }

    pub fn into_analyzed(self, results: Vec<AnalysisResult>) -> FrameContext<AnalyzedState> {
        FrameContext::<AnalyzedState> {
            frame: self.frame,
            capture: self.capture,
            metrics: self.metrics,
            processing_start: self.processing_start,
            state: AnalyzedState { results },
        }
    }
}

impl FrameContext<AnalyzedState> {
    pub fn results(&self) -> &[AnalysisResult] {
        &self.state.results
    }

    pub fn into_results(self) -> Vec<AnalysisResult> {
        self.state.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{validate, LandmarkModel, MockLandmarkDetector};
    use crate::pipeline::context::state::ProcessingState;
    use chrono::Utc;
    use image::{ImageBuffer, Rgb};
    use uuid::Uuid;

    #[test]
    fn context_carries_frame_through_states() {
        let frame = Frame::from_rgb(
            Uuid::new_v4(),
            ImageBuffer::from_pixel(8, 8, Rgb([100, 80, 60])),
            Utc::now(),
        );
        let frame_id = frame.frame_id();
        let mut ctx = FrameContext::new(frame);
        ctx.record(Stage::Quality, Duration::from_millis(1));

        let detection = MockLandmarkDetector::new(1).generate(LandmarkModel::Pose);
        let landmarks = validate(LandmarkModel::Pose, detection.space, detection.points).unwrap();
        let ctx = ctx.into_landmarked(landmarks, DetectionSource::Mock);
        assert!(ctx.source().is_mock());
        assert_eq!(ctx.landmarks().len(), 33);

        let ctx = ctx.into_analyzed(Vec::new());
        assert_eq!(ctx.frame().frame_id(), frame_id);
        assert_eq!(ctx.metrics().duration(Stage::Quality), Some(Duration::from_millis(1)));
        assert!(ctx.results().is_empty());
        assert_eq!(AnalyzedState::state_name(), "Analyzed");
    }
}
