use crate::color::{rgb_to_xyz, Rgb};
use crate::common::numeric::safe_div;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Below this left/right brightness ratio the lighting counts as uneven.
pub const UNEVEN_BALANCE_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightingCondition {
    Warm,
    Neutral,
    Cool,
    Unknown,
}

impl LightingCondition {
    /// < 4000 K warm, [4000, 6500) neutral, >= 6500 K cool.
    pub fn from_cct(cct: f64) -> Self {
        if !cct.is_finite() {
            LightingCondition::Unknown
        } else if cct < 4000.0 {
            LightingCondition::Warm
        } else if cct < 6500.0 {
            LightingCondition::Neutral
        } else {
            LightingCondition::Cool
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingReport {
    /// Correlated color temperature in kelvin.
    pub cct: Option<f64>,
    /// min/max of left and right half brightness; 1.0 is perfectly even.
    pub balance: f64,
    pub condition: LightingCondition,
}

impl LightingReport {
    pub fn is_uneven(&self) -> bool {
        self.balance < UNEVEN_BALANCE_THRESHOLD
    }
}

impl Default for LightingReport {
    fn default() -> Self {
        Self {
            cct: None,
            balance: 1.0,
            condition: LightingCondition::Unknown,
        }
    }
}

/// McCamy's approximation from CIE 1931 chromaticity.
pub fn mccamy_cct(x: f64, y: f64) -> Option<f64> {
    let denominator = 0.1858 - y;
    if denominator == 0.0 {
        return None;
    }
    let n = (x - 0.3320) / denominator;
    let cct = 449.0 * n.powi(3) + 3525.0 * n.powi(2) + 6823.3 * n + 5520.33;
    cct.is_finite().then_some(cct)
}

pub fn analyze(image: &RgbImage) -> LightingReport {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return LightingReport::default();
    }

    let count = width as f64 * height as f64;
    let (sum_r, sum_g, sum_b) = image.pixels().fold((0.0, 0.0, 0.0), |acc, p| {
        (acc.0 + p[0] as f64, acc.1 + p[1] as f64, acc.2 + p[2] as f64)
    });
    let mean = Rgb::new(
        (sum_r / count).round() as u8,
        (sum_g / count).round() as u8,
        (sum_b / count).round() as u8,
    );

    let cct = rgb_to_xyz(mean)
        .chromaticity()
        .and_then(|(x, y)| mccamy_cct(x, y));

    let half = width / 2;
    let mut left = (0.0, 0.0);
    let mut right = (0.0, 0.0);
    for (x, _, p) in image.enumerate_pixels() {
        let luma = Rgb::from_image(p).luma();
        if x < half {
            left = (left.0 + luma, left.1 + 1.0);
        } else {
            right = (right.0 + luma, right.1 + 1.0);
        }
    }
    let left_mean = safe_div(left.0, left.1, 0.0, "lighting_left_mean");
    let right_mean = safe_div(right.0, right.1, 0.0, "lighting_right_mean");
    let balance = safe_div(
        left_mean.min(right_mean),
        left_mean.max(right_mean),
        1.0,
        "lighting_balance",
    );

    LightingReport {
        cct,
        balance,
        condition: cct.map_or(LightingCondition::Unknown, LightingCondition::from_cct),
    }
}
