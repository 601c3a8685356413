use super::glcm::GlcmStats;
use super::lbp::LbpHistogram;
use crate::common::numeric::clamp_score;
use serde::{Deserialize, Serialize};

const PORE_HOMOGENEITY_WEIGHT: f64 = 0.6;
const PORE_UNIFORMITY_WEIGHT: f64 = 0.4;
const WRINKLE_CONTRAST_WEIGHT: f64 = 0.7;
const WRINKLE_ENTROPY_WEIGHT: f64 = 0.3;
const TEXTURE_PORE_WEIGHT: f64 = 0.35;
const TEXTURE_WRINKLE_WEIGHT: f64 = 0.35;
const TEXTURE_HOMOGENEITY_WEIGHT: f64 = 0.30;

/// Maximum entropy of a 256-bin histogram.
const LBP_MAX_ENTROPY: f64 = 8.0;

/// 0..=100, higher is smoother.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureScores {
    pub pore: f64,
    pub wrinkle: f64,
    pub texture: f64,
}

impl TextureScores {
    /// Scores for a region too small to measure.
    pub const fn unmeasured() -> Self {
        Self {
            pore: 0.0,
            wrinkle: 0.0,
            texture: 0.0,
        }
    }
}

/// Contrast scaled by the largest possible contrast for `levels`, then square-rooted.
fn normalized_contrast(contrast: f64, levels: u8) -> f64 {
    let max = (levels.max(2) as f64 - 1.0).powi(2);
    (contrast / max).max(0.0).sqrt().min(1.0)
}

pub fn score(glcm: &GlcmStats, lbp: &LbpHistogram, levels: u8) -> TextureScores {
    let pore = clamp_score(
        100.0
            * (PORE_HOMOGENEITY_WEIGHT * glcm.homogeneity
                + PORE_UNIFORMITY_WEIGHT * lbp.uniform_ratio),
    );

    let roughness = WRINKLE_CONTRAST_WEIGHT * normalized_contrast(glcm.contrast, levels)
        + WRINKLE_ENTROPY_WEIGHT * (lbp.entropy / LBP_MAX_ENTROPY).min(1.0);
    let wrinkle = clamp_score(100.0 * (1.0 - roughness));

    let texture = clamp_score(
        TEXTURE_PORE_WEIGHT * pore
            + TEXTURE_WRINKLE_WEIGHT * wrinkle
            + TEXTURE_HOMOGENEITY_WEIGHT * 100.0 * glcm.homogeneity,
    );

    TextureScores {
        pore,
        wrinkle,
        texture,
    }
}
