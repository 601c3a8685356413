//! Melanin and hemoglobin maps from per-pixel optical density.
//!
//! Melanin index is `100 * log10(1 / R)` and the erythema (hemoglobin) index
//! is `100 * (log10(1 / G) - log10(1 / R))`, with channels scaled to 0..1 and
//! floored at 1/255 so a zero channel yields a finite maximum.

use crate::common::numeric::{clamp_score, mean_std, safe_div};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

const CHANNEL_FLOOR: f64 = 1.0 / 255.0;

fn optical_density(channel: u8) -> f64 {
    let reflectance = (channel as f64 / 255.0).max(CHANNEL_FLOOR);
    (1.0 / reflectance).log10()
}

pub fn melanin_index(r: u8) -> f64 {
    100.0 * optical_density(r)
}

pub fn erythema_index(r: u8, g: u8) -> f64 {
    100.0 * (optical_density(g) - optical_density(r))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PigmentStats {
    pub melanin_mean: f64,
    pub melanin_std: f64,
    pub hemoglobin_mean: f64,
    pub hemoglobin_std: f64,
    /// 100 * (1 - coefficient of variation of melanin), clamped to 0..=100.
    pub uniformity: f64,
}

impl PigmentStats {
    fn from_samples(melanin: &[f64], hemoglobin: &[f64]) -> Option<Self> {
        let (melanin_mean, melanin_std) = mean_std(melanin)?;
        let (hemoglobin_mean, hemoglobin_std) = mean_std(hemoglobin)?;
        // A perfectly white patch has zero melanin and no variation.
        let cv = safe_div(melanin_std, melanin_mean, 0.0, "melanin_cv");
        Some(Self {
            melanin_mean,
            melanin_std,
            hemoglobin_mean,
            hemoglobin_std,
            uniformity: clamp_score(100.0 * (1.0 - cv)),
        })
    }
}

/// Parallel per-pixel maps with the dimensions of the source image.
///
/// Scoped to one analysis pass; call [`PigmentMaps::release`] when done.
#[derive(Debug)]
pub struct PigmentMaps {
    width: u32,
    height: u32,
    melanin: Vec<f64>,
    hemoglobin: Vec<f64>,
}

impl PigmentMaps {
    pub fn compute(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let capacity = width as usize * height as usize;
        let mut melanin = Vec::with_capacity(capacity);
        let mut hemoglobin = Vec::with_capacity(capacity);

        for pixel in image.pixels() {
            melanin.push(melanin_index(pixel[0]));
            hemoglobin.push(erythema_index(pixel[0], pixel[1]));
        }

        Self {
            width,
            height,
            melanin,
            hemoglobin,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn melanin_at(&self, x: u32, y: u32) -> Option<f64> {
        self.index(x, y).map(|i| self.melanin[i])
    }

    pub fn hemoglobin_at(&self, x: u32, y: u32) -> Option<f64> {
        self.index(x, y).map(|i| self.hemoglobin[i])
    }

    /// Statistics over the whole map. `None` for an empty image.
    pub fn stats(&self) -> Option<PigmentStats> {
        PigmentStats::from_samples(&self.melanin, &self.hemoglobin)
    }

    /// Statistics over the given pixels; out-of-range coordinates are skipped.
    pub fn region_stats(&self, pixels: impl IntoIterator<Item = (u32, u32)>) -> Option<PigmentStats> {
        let (melanin, hemoglobin): (Vec<f64>, Vec<f64>) = pixels
            .into_iter()
            .filter_map(|(x, y)| self.index(x, y))
            .map(|i| (self.melanin[i], self.hemoglobin[i]))
            .unzip();
        PigmentStats::from_samples(&melanin, &hemoglobin)
    }

    /// Drop both maps, returning the number of bytes released.
    pub fn release(self) -> usize {
        let bytes = (self.melanin.capacity() + self.hemoglobin.capacity()) * std::mem::size_of::<f64>();
        debug!("Releasing pigment maps {}x{} ({} bytes)", self.width, self.height, bytes);
        bytes
    }
}
