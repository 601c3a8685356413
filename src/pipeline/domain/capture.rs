use crate::pipeline::services::image::lighting::LightingReport;
use crate::pipeline::services::image::quality::QualityReport;
use crate::pipeline::services::image::white_balance::WhiteBalanceGains;
use serde::{Deserialize, Serialize};

/// Conditions a frame was captured and corrected under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConditions {
    pub quality: Option<QualityReport>,
    pub lighting: LightingReport,
    pub white_balance: WhiteBalanceGains,
}

impl Default for CaptureConditions {
    fn default() -> Self {
        Self {
            quality: None,
            lighting: LightingReport::default(),
            white_balance: WhiteBalanceGains::identity(),
        }
    }
}
