use crate::error::AppError;
use crate::pipeline::domain::zones::PixelBounds;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Grayscale pixels of a region, with an optional membership mask.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayRegion {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    mask: Option<Vec<bool>>,
}

impl GrayRegion {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, AppError> {
        if pixels.len() != width as usize * height as usize {
            return Err(AppError::Pipeline(format!(
                "gray region of {}x{} needs {} pixels, got {}",
                width,
                height,
                width as usize * height as usize,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
            mask: None,
        })
    }

    /// Crop `bounds` out of an RGB image and convert to Rec. 709 luma.
    pub fn from_rgb(image: &RgbImage, bounds: PixelBounds) -> Result<Self, AppError> {
        let (image_width, image_height) = image.dimensions();
        if bounds.x + bounds.width > image_width || bounds.y + bounds.height > image_height {
            return Err(AppError::Pipeline(format!(
                "region {:?} exceeds image {}x{}",
                bounds, image_width, image_height
            )));
        }

        let mut pixels = Vec::with_capacity(bounds.area() as usize);
        for y in bounds.y..bounds.y + bounds.height {
            for x in bounds.x..bounds.x + bounds.width {
                let p = image.get_pixel(x, y);
                let luma = 0.2126 * p[0] as f64 + 0.7152 * p[1] as f64 + 0.0722 * p[2] as f64;
                pixels.push(luma.round().clamp(0.0, 255.0) as u8);
            }
        }
        Self::new(bounds.width, bounds.height, pixels)
    }

    pub fn with_mask(mut self, mask: Vec<bool>) -> Result<Self, AppError> {
        if mask.len() != self.pixels.len() {
            return Err(AppError::Pipeline(format!(
                "mask length {} does not match region size {}",
                mask.len(),
                self.pixels.len()
            )));
        }
        self.mask = Some(mask);
        Ok(self)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel value, or `None` when outside the region or masked out.
    pub fn get(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        match &self.mask {
            Some(mask) if !mask[index] => None,
            _ => Some(self.pixels[index]),
        }
    }

    /// Number of pixels inside the mask.
    pub fn pixel_count(&self) -> usize {
        match &self.mask {
            Some(mask) => mask.iter().filter(|m| **m).count(),
            None => self.pixels.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlcmOptions {
    pub levels: u8,
    pub distance: u32,
}

impl Default for GlcmOptions {
    fn default() -> Self {
        Self {
            levels: 16,
            distance: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlcmStats {
    pub contrast: f64,
    pub homogeneity: f64,
    /// Angular second moment.
    pub energy: f64,
    pub correlation: f64,
    /// Shannon entropy in bits.
    pub entropy: f64,
}

fn quantize(value: u8, levels: u8) -> usize {
    (value as usize * levels as usize) / 256
}

/// Symmetric, normalized co-occurrence matrix averaged over 0°, 45°, 90° and 135°.
///
/// Row-major `levels × levels`. `None` when no direction yields a pixel pair.
pub fn co_occurrence(region: &GrayRegion, options: GlcmOptions) -> Option<Vec<f64>> {
    let levels = options.levels.max(2) as usize;
    let d = options.distance.max(1) as i64;
    let offsets = [(d, 0), (d, -d), (0, -d), (-d, -d)];

    let mut averaged = vec![0.0; levels * levels];
    let mut directions = 0usize;

    for (dx, dy) in offsets {
        let mut counts = vec![0u64; levels * levels];
        let mut total = 0u64;
        for y in 0..region.height() as i64 {
            for x in 0..region.width() as i64 {
                let (Some(a), Some(b)) = (region.get(x, y), region.get(x + dx, y + dy)) else {
                    continue;
                };
                let i = quantize(a, options.levels.max(2));
                let j = quantize(b, options.levels.max(2));
                counts[i * levels + j] += 1;
                counts[j * levels + i] += 1;
                total += 2;
            }
        }
        if total == 0 {
            continue;
        }
        directions += 1;
        for (slot, count) in averaged.iter_mut().zip(counts) {
            *slot += count as f64 / total as f64;
        }
    }

    if directions == 0 {
        return None;
    }
    for slot in averaged.iter_mut() {
        *slot /= directions as f64;
    }
    Some(averaged)
}

pub fn statistics(matrix: &[f64], levels: u8) -> GlcmStats {
    let levels = levels.max(2) as usize;
    let cell = |i: usize, j: usize| matrix[i * levels + j];

    let mut mean_i = 0.0;
    let mut mean_j = 0.0;
    for i in 0..levels {
        for j in 0..levels {
            mean_i += i as f64 * cell(i, j);
            mean_j += j as f64 * cell(i, j);
        }
    }

    let mut contrast = 0.0;
    let mut homogeneity = 0.0;
    let mut energy = 0.0;
    let mut entropy = 0.0;
    let mut var_i = 0.0;
    let mut var_j = 0.0;
    let mut covariance = 0.0;

    for i in 0..levels {
        for j in 0..levels {
            let p = cell(i, j);
            if p == 0.0 {
                continue;
            }
            let diff = i as f64 - j as f64;
            contrast += p * diff * diff;
            homogeneity += p / (1.0 + diff * diff);
            energy += p * p;
            entropy -= p * p.log2();
            var_i += p * (i as f64 - mean_i).powi(2);
            var_j += p * (j as f64 - mean_j).powi(2);
            covariance += p * (i as f64 - mean_i) * (j as f64 - mean_j);
        }
    }

    // A single gray level is perfectly correlated with itself.
    let correlation = if var_i == 0.0 || var_j == 0.0 {
        1.0
    } else {
        covariance / (var_i.sqrt() * var_j.sqrt())
    };

    GlcmStats {
        contrast,
        homogeneity,
        energy,
        correlation,
        entropy,
    }
}

pub fn glcm_stats(region: &GrayRegion, options: GlcmOptions) -> Option<GlcmStats> {
    co_occurrence(region, options).map(|matrix| statistics(&matrix, options.levels))
}
