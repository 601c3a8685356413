use super::capture::CaptureConditions;
use super::zones::{TuDifference, ZoneGroupMetrics, ZoneMetricsMap};
use crate::color::{ItaCategory, Lab};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinType {
    Oily,
    Combination,
    Dry,
    Sensitive,
    Normal,
}

impl SkinType {
    pub fn label(&self) -> &'static str {
        match self {
            SkinType::Oily => "oily",
            SkinType::Combination => "combination",
            SkinType::Dry => "dry",
            SkinType::Sensitive => "sensitive",
            SkinType::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinAnalysis {
    pub skin_type: SkinType,
    /// Composite 0..=100 skin condition score.
    pub overall_score: f64,
    pub skin_tone: Lab,
    pub ita: f64,
    pub ita_category: ItaCategory,
    pub zones: ZoneMetricsMap,
    pub groups: ZoneGroupMetrics,
    pub tu_difference: Option<TuDifference>,
    pub capture: CaptureConditions,
}
