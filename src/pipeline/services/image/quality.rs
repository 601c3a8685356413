use crate::config::QualitySettings;
use crate::error::AppError;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest side sampled when estimating sharpness.
const SHARPNESS_SAMPLE_SIDE: u32 = 512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QualityIssue {
    TooDark { brightness: f64 },
    TooBright { brightness: f64 },
    Blurry { sharpness: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub width: u32,
    pub height: u32,
    /// Mean Rec. 709 luma, 0..255.
    pub brightness: f64,
    /// Variance of the Laplacian of luma.
    pub sharpness: f64,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Frame quality validation ahead of landmark detection.
#[derive(Debug, Clone)]
pub struct QualityGate {
    settings: QualitySettings,
}

fn rgb_to_luma(r: u8, g: u8, b: u8) -> f64 {
    // Rec. 709 luminance
    0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64
}

impl QualityGate {
    pub fn new(settings: QualitySettings) -> Self {
        Self { settings }
    }

    /// Measure the frame. Only structural problems are errors here.
    pub fn assess(&self, image: &RgbImage) -> Result<QualityReport, AppError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AppError::InvalidInputImage(
                "image has a zero dimension".to_string(),
            ));
        }
        if width < self.settings.min_dimension || height < self.settings.min_dimension {
            return Err(AppError::InvalidInputImage(format!(
                "image {}x{} is below the {}px minimum",
                width, height, self.settings.min_dimension
            )));
        }

        let brightness = Self::mean_luma(image);
        let sharpness = Self::laplacian_variance(image);

        let mut issues = Vec::new();
        if brightness < self.settings.min_brightness {
            issues.push(QualityIssue::TooDark { brightness });
        } else if brightness > self.settings.max_brightness {
            issues.push(QualityIssue::TooBright { brightness });
        }
        if sharpness < self.settings.min_sharpness {
            issues.push(QualityIssue::Blurry { sharpness });
        }

        debug!(
            "Quality assessed: {}x{}, brightness {:.1}, sharpness {:.1}, {} issues",
            width,
            height,
            brightness,
            sharpness,
            issues.len()
        );

        Ok(QualityReport {
            width,
            height,
            brightness,
            sharpness,
            issues,
        })
    }

    /// Assess and, when enforcing, reject frames with quality issues.
    pub fn check(&self, image: &RgbImage) -> Result<QualityReport, AppError> {
        let report = self.assess(image)?;
        if self.settings.enforce && !report.passed() {
            return Err(AppError::InvalidInputImage(format!(
                "frame failed quality checks: {:?}",
                report.issues
            )));
        }
        Ok(report)
    }

    fn mean_luma(image: &RgbImage) -> f64 {
        let total: f64 = image
            .pixels()
            .map(|p| rgb_to_luma(p[0], p[1], p[2]))
            .sum();
        total / (image.width() as f64 * image.height() as f64)
    }

    fn laplacian_variance(image: &RgbImage) -> f64 {
        let (width, height) = image.dimensions();
        if width < 3 || height < 3 {
            return 0.0;
        }
        let step = (width.max(height) / SHARPNESS_SAMPLE_SIDE).max(1);
        let luma = |x: u32, y: u32| {
            let p = image.get_pixel(x, y);
            rgb_to_luma(p[0], p[1], p[2])
        };

        // One-pass mean/variance (Welford)
        let mut n = 0f64;
        let mut mean = 0f64;
        let mut m2 = 0f64;

        for y in (1..height - 1).step_by(step as usize) {
            for x in (1..width - 1).step_by(step as usize) {
                let v = luma(x - 1, y) + luma(x + 1, y) + luma(x, y - 1) + luma(x, y + 1)
                    - 4.0 * luma(x, y);
                n += 1.0;
                let delta = v - mean;
                mean += delta / n;
                m2 += delta * (v - mean);
            }
        }

        if n < 2.0 {
            0.0
        } else {
            m2 / (n - 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn checkerboard(size: u32) -> RgbImage {
        ImageBuffer::from_fn(size, size, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([200, 170, 150])
            } else {
                Rgb([90, 70, 60])
            }
        })
    }

    #[test]
    fn zero_sized_image_is_invalid() {
        let gate = QualityGate::new(QualitySettings::default());
        let empty: RgbImage = ImageBuffer::new(0, 0);
        assert!(matches!(gate.assess(&empty), Err(AppError::InvalidInputImage(_))));
    }

    #[test]
    fn small_image_is_invalid() {
        let gate = QualityGate::new(QualitySettings::default());
        let tiny = ImageBuffer::from_pixel(16, 16, Rgb([128, 128, 128]));
        assert!(gate.assess(&tiny).is_err());
    }

    #[test]
    fn flat_dark_image_reports_dark_and_blurry() {
        let gate = QualityGate::new(QualitySettings::default());
        let dark = ImageBuffer::from_pixel(64, 64, Rgb([10, 10, 10]));
        let report = gate.assess(&dark).unwrap();
        assert!(report.issues.contains(&QualityIssue::TooDark {
            brightness: report.brightness
        }));
        assert!(report.issues.iter().any(|i| matches!(i, QualityIssue::Blurry { .. })));
        assert!(gate.check(&dark).is_err());
    }

    #[test]
    fn textured_mid_tone_image_passes() {
        let gate = QualityGate::new(QualitySettings::default());
        let report = gate.check(&checkerboard(64)).unwrap();
        assert!(report.passed());
        assert!(report.sharpness > 100.0);
    }

    #[test]
    fn issues_are_reported_but_not_enforced_when_disabled() {
        let settings = QualitySettings {
            enforce: false,
            ..QualitySettings::default()
        };
        let gate = QualityGate::new(settings);
        let dark = ImageBuffer::from_pixel(64, 64, Rgb([10, 10, 10]));
        let report = gate.check(&dark).unwrap();
        assert!(!report.passed());
    }
}
