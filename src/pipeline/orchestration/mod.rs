pub mod best_frame;
pub mod preprocess;
pub mod processing_pipeline;
pub mod service;

pub use best_frame::select_best_frame;
pub use preprocess::Preprocessor;
pub use processing_pipeline::{AnalysisPipeline, BodyPipeline, PipelineBuilder};
