pub mod body;
pub mod capture;
pub mod personal_color;
pub mod result;
pub mod skin;
pub mod trend;
pub mod zones;

pub use body::BodyAnalysis;
pub use capture::CaptureConditions;
pub use personal_color::PersonalColorAnalysis;
pub use result::{AnalysisDelta, AnalysisKind, AnalysisPayload, AnalysisResult, Grade};
pub use skin::SkinAnalysis;
