use super::confidence;
use crate::common::numeric::clamp_score;
use crate::pipeline::domain::skin::SkinType;
use crate::pipeline::domain::zones::{ZoneMetrics, ZoneMetricsMap};

pub const OILY_THRESHOLD: f64 = 60.0;
pub const COMBINATION_TU_OIL_GAP: f64 = 15.0;
pub const DRY_MOISTURE_BELOW: f64 = 40.0;
pub const DRY_OIL_BELOW: f64 = 35.0;
pub const SENSITIVE_REDNESS: f64 = 65.0;

/// Aggregate readings the skin-type rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinTypeInputs {
    pub t_zone_oil: f64,
    pub u_zone_oil: f64,
    pub oil: f64,
    pub moisture: f64,
    pub redness: f64,
}

impl SkinTypeInputs {
    /// `None` unless both T- and U-zone readings exist.
    pub fn from_zones(metrics: &ZoneMetricsMap) -> Option<Self> {
        let overall = ZoneMetrics::average(metrics.values())?;
        let t = ZoneMetrics::average(metrics.iter().filter(|(z, _)| z.is_t_zone()).map(|(_, m)| m))?;
        let u = ZoneMetrics::average(metrics.iter().filter(|(z, _)| z.is_u_zone()).map(|(_, m)| m))?;
        Some(Self {
            t_zone_oil: t.oil,
            u_zone_oil: u.oil,
            oil: overall.oil,
            moisture: overall.moisture,
            redness: overall.redness,
        })
    }
}

/// Rules are checked in order; the first match wins:
/// 1. Oily: T- and U-zone oil both >= 60.
/// 2. Combination: T-zone oil exceeds U-zone oil by >= 15.
/// 3. Dry: moisture < 40 and oil < 35.
/// 4. Sensitive: redness >= 65.
/// 5. Normal.
pub fn classify(inputs: &SkinTypeInputs) -> SkinType {
    if inputs.t_zone_oil >= OILY_THRESHOLD && inputs.u_zone_oil >= OILY_THRESHOLD {
        SkinType::Oily
    } else if inputs.t_zone_oil - inputs.u_zone_oil >= COMBINATION_TU_OIL_GAP {
        SkinType::Combination
    } else if inputs.moisture < DRY_MOISTURE_BELOW && inputs.oil < DRY_OIL_BELOW {
        SkinType::Dry
    } else if inputs.redness >= SENSITIVE_REDNESS {
        SkinType::Sensitive
    } else {
        SkinType::Normal
    }
}

/// Classify from zone metrics, with confidence from zone-to-zone moisture agreement.
pub fn classify_zones(metrics: &ZoneMetricsMap) -> Option<(SkinType, f64)> {
    let inputs = SkinTypeInputs::from_zones(metrics)?;
    let moisture: Vec<f64> = metrics.values().map(|m| m.moisture).collect();
    let confidence = confidence::from_variation(&moisture)?;
    Some((classify(&inputs), confidence))
}

const TEXTURE_WEIGHT: f64 = 0.30;
const MOISTURE_WEIGHT: f64 = 0.25;
const UNIFORMITY_WEIGHT: f64 = 0.25;
const CALM_WEIGHT: f64 = 0.20;

/// Composite 0..=100 skin condition score over all measured zones.
pub fn overall_score(metrics: &ZoneMetricsMap) -> Option<f64> {
    let overall = ZoneMetrics::average(metrics.values())?;
    Some(clamp_score(
        TEXTURE_WEIGHT * overall.texture_score
            + MOISTURE_WEIGHT * overall.moisture
            + UNIFORMITY_WEIGHT * overall.pigmentation_uniformity
            + CALM_WEIGHT * (100.0 - overall.redness),
    ))
}
