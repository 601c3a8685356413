pub mod color;
pub mod common;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod landmarks;
pub mod pipeline;
pub mod store;

pub use config::Settings;
pub use coordinator::{AnalysisJob, AnalysisOutcome, Coordinator, CoordinatorBuilder};
pub use error::{AppError, LandmarkError};
pub use pipeline::{AnalysisPipeline, BodyPipeline, PipelineBuilder};
pub use store::{AnalysisRecord, InMemoryResultStore, ResultStore};
