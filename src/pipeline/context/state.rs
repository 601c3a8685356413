use crate::landmarks::{DetectionSource, LandmarkSet};
use crate::pipeline::domain::result::AnalysisResult;

// Markers to track the state of one analysis run
pub struct IngestedState;

pub struct LandmarkedState {
    pub(super) landmarks: LandmarkSet,
    pub(super) source: DetectionSource,
}

pub struct AnalyzedState {
    pub(super) results: Vec<AnalysisResult>,
}

pub trait ProcessingState: 'static {
    fn state_name() -> &'static str;
}

impl ProcessingState for IngestedState {
    fn state_name() -> &'static str {
        "Ingested"
    }
}

impl ProcessingState for LandmarkedState {
    fn state_name() -> &'static str {
        "Landmarked"
    }
}

impl ProcessingState for AnalyzedState {
    fn state_name() -> &'static str {
        "Analyzed"
    }
}
