use crate::color::clamp_channel;
use crate::common::numeric::safe_div;
use image::RgbImage;
use serde::{Deserialize, Serialize};

const MIN_GAIN: f64 = 0.5;
const MAX_GAIN: f64 = 2.0;

/// Per-channel multipliers from the gray-world assumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhiteBalanceGains {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl WhiteBalanceGains {
    pub const fn identity() -> Self {
        Self {
            r: 1.0,
            g: 1.0,
            b: 1.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

impl Default for WhiteBalanceGains {
    fn default() -> Self {
        Self::identity()
    }
}

/// Gray-world gains, clamped to [0.5, 2.0]. Empty images get identity.
pub fn estimate_gains(image: &RgbImage) -> WhiteBalanceGains {
    let count = image.width() as f64 * image.height() as f64;
    if count == 0.0 {
        return WhiteBalanceGains::identity();
    }

    let (sum_r, sum_g, sum_b) = image.pixels().fold((0.0, 0.0, 0.0), |acc, p| {
        (acc.0 + p[0] as f64, acc.1 + p[1] as f64, acc.2 + p[2] as f64)
    });
    let (mean_r, mean_g, mean_b) = (sum_r / count, sum_g / count, sum_b / count);
    let gray = (mean_r + mean_g + mean_b) / 3.0;

    let gain = |mean: f64| safe_div(gray, mean, 1.0, "white_balance_gain").clamp(MIN_GAIN, MAX_GAIN);

    WhiteBalanceGains {
        r: gain(mean_r),
        g: gain(mean_g),
        b: gain(mean_b),
    }
}

pub fn apply_gains(image: &RgbImage, gains: WhiteBalanceGains) -> RgbImage {
    let mut corrected = image.clone();
    for pixel in corrected.pixels_mut() {
        pixel[0] = clamp_channel(pixel[0] as f64 * gains.r);
        pixel[1] = clamp_channel(pixel[1] as f64 * gains.g);
        pixel[2] = clamp_channel(pixel[2] as f64 * gains.b);
    }
    corrected
}

/// Estimate and apply in one pass.
pub fn correct(image: &RgbImage) -> (RgbImage, WhiteBalanceGains) {
    let gains = estimate_gains(image);
    (apply_gains(image, gains), gains)
}
