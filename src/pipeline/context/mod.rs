pub mod frame_context;
pub mod metrics;
pub mod state;

pub use frame_context::FrameContext;
pub use metrics::{Stage, StageMetrics};
pub use state::{AnalyzedState, IngestedState, LandmarkedState, ProcessingState};
