use crate::color::{individual_typology_angle, rank_shades, ItaCategory, Shade};
use crate::common::numeric::clamp_score;
use crate::error::AppError;
use crate::pipeline::domain::body::{BmiReading, BodyAnalysis};
use crate::pipeline::domain::capture::CaptureConditions;
use crate::pipeline::domain::personal_color::PersonalColorAnalysis;
use crate::pipeline::domain::skin::SkinAnalysis;
use crate::pipeline::domain::zones::{PostureSegment, ZoneMetrics, ZoneMetricsMap};
use crate::pipeline::services::classify::{body, personal_color, posture, skin_type};
use crate::pipeline::services::zones::{group_metrics, tu_zone_difference, PoseGeometry};

/// Shades kept per personal color result.
pub const SHADE_MATCH_LIMIT: usize = 5;

/// Body confidence when the detector reports no visibility at all.
pub const UNREPORTED_VISIBILITY_CONFIDENCE: f64 = 50.0;

/// Skin analysis and its confidence from measured zones.
pub fn skin_analysis(
    zones: ZoneMetricsMap,
    capture: CaptureConditions,
) -> Result<(SkinAnalysis, f64), AppError> {
    let (skin_type, confidence) = skin_type::classify_zones(&zones).ok_or_else(|| {
        AppError::Pipeline("skin type needs measured T-zone and U-zone areas".to_string())
    })?;
    let overall_score = skin_type::overall_score(&zones)
        .ok_or_else(|| AppError::Pipeline("no measured skin zones".to_string()))?;
    let skin_tone = personal_color::skin_tone(&zones)
        .or_else(|| ZoneMetrics::average(zones.values()).map(|m| m.mean_lab))
        .ok_or_else(|| AppError::Pipeline("no measured skin zones".to_string()))?;
    let ita = individual_typology_angle(skin_tone);

    let analysis = SkinAnalysis {
        skin_type,
        overall_score,
        skin_tone,
        ita,
        ita_category: ItaCategory::from_angle(ita),
        groups: group_metrics(&zones),
        tu_difference: tu_zone_difference(&zones),
        zones,
        capture,
    };
    Ok((analysis, confidence))
}

/// Personal color analysis from the tone zones, with the closest catalogue shades.
pub fn personal_color_analysis(
    zones: &ZoneMetricsMap,
    capture: CaptureConditions,
    catalogue: &[Shade],
) -> Result<(PersonalColorAnalysis, f64), AppError> {
    let skin_tone = personal_color::skin_tone(zones).ok_or_else(|| {
        AppError::Pipeline("personal color needs a measured cheek or forehead".to_string())
    })?;
    let ita = individual_typology_angle(skin_tone);
    let shade_matches = rank_shades(skin_tone, catalogue, SHADE_MATCH_LIMIT)?;

    let analysis = PersonalColorAnalysis {
        tone: personal_color::classify(&skin_tone),
        undertone: personal_color::undertone(&skin_tone),
        skin_tone,
        lch: skin_tone.to_lch(),
        ita,
        ita_category: ItaCategory::from_angle(ita),
        shade_matches,
        capture,
    };
    Ok((analysis, personal_color::tone_confidence(&skin_tone)))
}

/// Posture, proportions and optional BMI. Confidence is the mean landmark visibility,
/// or [`UNREPORTED_VISIBILITY_CONFIDENCE`] when no landmark reports one.
pub fn body_analysis(
    geometry: &PoseGeometry<'_>,
    bmi: Option<BmiReading>,
) -> Result<(BodyAnalysis, f64), AppError> {
    let segments = posture::assess(&geometry.deviations()?);
    let shoulder_hip_ratio = geometry.proportions()?.ratio();

    let visibilities: Vec<f64> = PostureSegment::ALL
        .iter()
        .filter_map(|segment| geometry.segment_visibility(*segment))
        .collect();
    let confidence = if visibilities.is_empty() {
        UNREPORTED_VISIBILITY_CONFIDENCE
    } else {
        clamp_score(100.0 * visibilities.iter().sum::<f64>() / visibilities.len() as f64)
    };

    let analysis = BodyAnalysis {
        posture_score: posture::posture_score(&segments),
        segments,
        shoulder_hip_ratio,
        shape: shoulder_hip_ratio.map(body::body_shape),
        bmi,
    };
    Ok((analysis, confidence))
}
