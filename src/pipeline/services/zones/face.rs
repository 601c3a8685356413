use super::polygon;
use crate::error::AppError;
use crate::landmarks::geometry::Point;
use crate::landmarks::tables::face_zone_indices;
use crate::landmarks::{LandmarkModel, LandmarkSet};
use crate::pipeline::domain::zones::{
    FaceZone, FaceZoneGroup, PixelBounds, TuDifference, ZoneGroupMetrics, ZoneMetrics,
    ZoneMetricsMap, ZoneRegion,
};
use tracing::debug;

/// Map validated face-mesh landmarks to the 12 zone polygons of a `width` x `height` image.
///
/// Zones whose hull collapses to nothing inside the image are still returned,
/// with an empty polygon and zero-area bounds, so callers see all 12.
pub fn extract_face_zones(
    landmarks: &LandmarkSet,
    width: u32,
    height: u32,
) -> Result<Vec<ZoneRegion>, AppError> {
    if landmarks.model() != LandmarkModel::FaceMesh {
        return Err(AppError::Pipeline(format!(
            "face zones need {} landmarks, got {}",
            LandmarkModel::FaceMesh.name(),
            landmarks.model().name()
        )));
    }

    FaceZone::ALL
        .iter()
        .map(|zone| {
            let points = face_zone_indices(*zone)
                .iter()
                .map(|index| {
                    landmarks
                        .pixel_point(*index, width, height)
                        .map(Point::from)
                        .ok_or_else(|| {
                            AppError::Pipeline(format!("landmark {} missing for {:?}", index, zone))
                        })
                })
                .collect::<Result<Vec<Point>, AppError>>()?;

            let hull = polygon::convex_hull(&points);
            let region = match polygon::bounds(&hull, width, height) {
                Some(bounds) if hull.len() >= 3 => ZoneRegion {
                    zone: *zone,
                    polygon: hull,
                    bounds,
                },
                _ => {
                    debug!("Zone {:?} is degenerate in a {}x{} image", zone, width, height);
                    ZoneRegion {
                        zone: *zone,
                        polygon: Vec::new(),
                        bounds: PixelBounds::new(0, 0, 0, 0),
                    }
                }
            };
            Ok(region)
        })
        .collect()
}

/// Average fine-zone metrics into the 6 coarse groups; groups with no measured zone are omitted.
pub fn group_metrics(metrics: &ZoneMetricsMap) -> ZoneGroupMetrics {
    FaceZoneGroup::ALL
        .iter()
        .filter_map(|group| {
            ZoneMetrics::average(
                metrics
                    .iter()
                    .filter(|(zone, _)| zone.group() == *group)
                    .map(|(_, m)| m),
            )
            .map(|averaged| (*group, averaged))
        })
        .collect()
}

/// T-zone minus U-zone for oil, moisture and redness. `None` unless both sides were measured.
pub fn tu_zone_difference(metrics: &ZoneMetricsMap) -> Option<TuDifference> {
    let t = ZoneMetrics::average(metrics.iter().filter(|(z, _)| z.is_t_zone()).map(|(_, m)| m))?;
    let u = ZoneMetrics::average(metrics.iter().filter(|(z, _)| z.is_u_zone()).map(|(_, m)| m))?;
    Some(TuDifference {
        oil: t.oil - u.oil,
        moisture: t.moisture - u.moisture,
        redness: t.redness - u.redness,
    })
}
