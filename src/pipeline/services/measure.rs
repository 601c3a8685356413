use crate::color::{rgb_to_lab, Lab, Rgb};
use crate::common::numeric::{clamp_score, mean_std, safe_div};
use crate::error::AppError;
use crate::pipeline::domain::zones::{ZoneMetrics, ZoneMetricsMap, ZoneRegion};
use crate::pipeline::services::pigment::PigmentMaps;
use crate::pipeline::services::texture::{self, GlcmOptions, GrayRegion, TextureScores};
use crate::pipeline::services::zones::polygon;
use image::RgbImage;
use tracing::{debug, instrument};

/// Lightness above the zone mean that counts as specular shine.
const SHINE_L_OFFSET: f64 = 8.0;
/// Shine coverage that maps to an oil score of 100.
const FULL_SHINE_RATIO: f64 = 0.25;
/// a* that maps to a redness score of 100.
const FULL_REDNESS_A: f64 = 25.0;
const MOISTURE_WRINKLE_WEIGHT: f64 = 0.6;
const MOISTURE_EVENNESS_WEIGHT: f64 = 0.4;
/// Lightness coefficient of variation that drives evenness to zero.
const EVENNESS_CV_LIMIT: f64 = 0.2;

/// Per-zone pixel measurement: color, shine, texture and pigment.
#[derive(Debug, Clone, Copy)]
pub struct ZoneMeasurer {
    glcm: GlcmOptions,
}

impl ZoneMeasurer {
    pub fn new(glcm: GlcmOptions) -> Self {
        Self { glcm }
    }

    /// `Ok(None)` when the zone covers no pixels.
    pub fn measure_zone(
        &self,
        image: &RgbImage,
        pigments: &PigmentMaps,
        region: &ZoneRegion,
    ) -> Result<Option<ZoneMetrics>, AppError> {
        let pixels = polygon::pixels_inside(&region.polygon, &region.bounds);
        if pixels.is_empty() {
            return Ok(None);
        }

        let colors: Vec<Rgb> = pixels
            .iter()
            .map(|(x, y)| Rgb::from_image(image.get_pixel(*x, *y)))
            .collect();
        let labs: Vec<Lab> = colors.iter().map(|c| rgb_to_lab(*c)).collect();
        let Some(mean_lab) = Lab::mean(&labs) else {
            return Ok(None);
        };
        let brightness = colors.iter().map(Rgb::luma).sum::<f64>() / colors.len() as f64;

        let mean_chroma = mean_lab.chroma();
        let shine = labs
            .iter()
            .filter(|lab| lab.l >= mean_lab.l + SHINE_L_OFFSET && lab.chroma() <= mean_chroma)
            .count() as f64
            / labs.len() as f64;
        let oil = clamp_score(100.0 * shine / FULL_SHINE_RATIO);

        let redness = clamp_score(100.0 * mean_lab.a / FULL_REDNESS_A);

        let gray = GrayRegion::from_rgb(image, region.bounds)?
            .with_mask(polygon::mask(&region.polygon, &region.bounds))?;
        let scores = match (
            texture::glcm_stats(&gray, self.glcm),
            texture::lbp_histogram(&gray),
        ) {
            (Some(glcm), Some(lbp)) => texture::score(&glcm, &lbp, self.glcm.levels),
            _ => TextureScores::unmeasured(),
        };

        let lightness: Vec<f64> = labs.iter().map(|lab| lab.l).collect();
        let evenness = match mean_std(&lightness) {
            Some((mean, std)) => {
                let cv = safe_div(std, mean, 0.0, "lightness_cv");
                clamp_score(100.0 * (1.0 - cv / EVENNESS_CV_LIMIT))
            }
            None => 0.0,
        };
        let moisture = clamp_score(
            MOISTURE_WRINKLE_WEIGHT * scores.wrinkle + MOISTURE_EVENNESS_WEIGHT * evenness,
        );

        let Some(pigment) = pigments.region_stats(pixels.iter().copied()) else {
            return Ok(None);
        };

        Ok(Some(ZoneMetrics {
            pixel_count: pixels.len(),
            mean_lab,
            brightness,
            oil,
            moisture,
            redness,
            texture_score: scores.texture,
            pore_score: scores.pore,
            wrinkle_score: scores.wrinkle,
            pigmentation_uniformity: pigment.uniformity,
            melanin: pigment.melanin_mean,
            hemoglobin: pigment.hemoglobin_mean,
        }))
    }

    /// Measure every zone; pigment maps live only for the duration of this call.
    #[instrument(skip_all, fields(zones = regions.len()))]
    pub fn measure_face(
        &self,
        image: &RgbImage,
        regions: &[ZoneRegion],
    ) -> Result<ZoneMetricsMap, AppError> {
        let pigments = PigmentMaps::compute(image);
        let mut metrics = ZoneMetricsMap::new();

        for region in regions {
            match self.measure_zone(image, &pigments, region) {
                Ok(Some(zone_metrics)) => {
                    metrics.insert(region.zone, zone_metrics);
                }
                Ok(None) => debug!("Zone {:?} covers no pixels, skipping", region.zone),
                Err(e) => {
                    pigments.release();
                    return Err(e);
                }
            }
        }

        pigments.release();
        Ok(metrics)
    }
}

impl Default for ZoneMeasurer {
    fn default() -> Self {
        Self::new(GlcmOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::geometry::Point;
    use crate::pipeline::domain::zones::{FaceZone, PixelBounds};
    use image::{ImageBuffer, Rgb as ImageRgb};

    fn square_region(zone: FaceZone, x: f64, y: f64, size: f64) -> ZoneRegion {
        let polygon = polygon::convex_hull(&[
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]);
        let bounds = PixelBounds::new(x as u32, y as u32, size as u32, size as u32);
        ZoneRegion {
            zone,
            polygon,
            bounds,
        }
    }

    #[test]
    fn flat_skin_patch_is_smooth_matte_and_even() {
        let image = ImageBuffer::from_pixel(40, 40, ImageRgb([210, 160, 140]));
        let region = square_region(FaceZone::LeftCheek, 10.0, 10.0, 12.0);
        let metrics = ZoneMeasurer::default()
            .measure_face(&image, &[region])
            .unwrap();
        let cheek = metrics[&FaceZone::LeftCheek];

        assert_eq!(cheek.pixel_count, 144);
        assert_eq!(cheek.oil, 0.0);
        assert!((cheek.texture_score - 100.0).abs() < 1e-9);
        assert!((cheek.moisture - 100.0).abs() < 1e-9);
        assert!((cheek.pigmentation_uniformity - 100.0).abs() < 1e-6);
        let expected_lab = rgb_to_lab(Rgb::new(210, 160, 140));
        assert!((cheek.mean_lab.l - expected_lab.l).abs() < 1e-9);
        assert!((cheek.redness - clamp_score(100.0 * expected_lab.a / FULL_REDNESS_A)).abs() < 1e-9);
    }

    #[test]
    fn specular_highlights_raise_oil() {
        let image = ImageBuffer::from_fn(40, 40, |x, y| {
            if (x + y) % 3 == 0 {
                ImageRgb([250, 245, 240])
            } else {
                ImageRgb([200, 150, 130])
            }
        });
        let region = square_region(FaceZone::NoseTip, 5.0, 5.0, 20.0);
        let metrics = ZoneMeasurer::default().measure_face(&image, &[region]).unwrap();
        assert!(metrics[&FaceZone::NoseTip].oil > 50.0);
    }

    #[test]
    fn empty_zone_is_skipped() {
        let image = ImageBuffer::from_pixel(10, 10, ImageRgb([200, 150, 130]));
        let region = ZoneRegion {
            zone: FaceZone::Chin,
            polygon: Vec::new(),
            bounds: PixelBounds::new(0, 0, 0, 0),
        };
        let metrics = ZoneMeasurer::default().measure_face(&image, &[region]).unwrap();
        assert!(metrics.is_empty());
    }
}
