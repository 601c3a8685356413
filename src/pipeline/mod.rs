pub mod context;
pub mod domain;
pub mod orchestration;
pub mod services;

pub use orchestration::{AnalysisPipeline, BodyPipeline, PipelineBuilder};
