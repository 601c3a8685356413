pub mod glcm;
pub mod lbp;
pub mod scores;

pub use glcm::{glcm_stats, GlcmOptions, GlcmStats, GrayRegion};
pub use lbp::{lbp_histogram, LbpHistogram};
pub use scores::{score, TextureScores};
