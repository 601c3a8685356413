use crate::color::Lab;
use crate::landmarks::geometry::Point;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fine 12-zone face taxonomy. "Left"/"Right" are the subject's sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceZone {
    ForeheadCenter,
    ForeheadLeft,
    ForeheadRight,
    LeftUnderEye,
    RightUnderEye,
    NoseBridge,
    NoseTip,
    LeftCheek,
    RightCheek,
    LeftJaw,
    RightJaw,
    Chin,
}

impl FaceZone {
    pub const ALL: [FaceZone; 12] = [
        FaceZone::ForeheadCenter,
        FaceZone::ForeheadLeft,
        FaceZone::ForeheadRight,
        FaceZone::LeftUnderEye,
        FaceZone::RightUnderEye,
        FaceZone::NoseBridge,
        FaceZone::NoseTip,
        FaceZone::LeftCheek,
        FaceZone::RightCheek,
        FaceZone::LeftJaw,
        FaceZone::RightJaw,
        FaceZone::Chin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FaceZone::ForeheadCenter => "forehead_center",
            FaceZone::ForeheadLeft => "forehead_left",
            FaceZone::ForeheadRight => "forehead_right",
            FaceZone::LeftUnderEye => "left_under_eye",
            FaceZone::RightUnderEye => "right_under_eye",
            FaceZone::NoseBridge => "nose_bridge",
            FaceZone::NoseTip => "nose_tip",
            FaceZone::LeftCheek => "left_cheek",
            FaceZone::RightCheek => "right_cheek",
            FaceZone::LeftJaw => "left_jaw",
            FaceZone::RightJaw => "right_jaw",
            FaceZone::Chin => "chin",
        }
    }

    /// Coarse 6-zone group this zone aggregates into.
    pub fn group(&self) -> FaceZoneGroup {
        match self {
            FaceZone::ForeheadCenter | FaceZone::ForeheadLeft | FaceZone::ForeheadRight => {
                FaceZoneGroup::Forehead
            }
            FaceZone::LeftUnderEye | FaceZone::RightUnderEye => FaceZoneGroup::UnderEye,
            FaceZone::NoseBridge | FaceZone::NoseTip => FaceZoneGroup::Nose,
            FaceZone::LeftCheek | FaceZone::LeftJaw => FaceZoneGroup::LeftCheek,
            FaceZone::RightCheek | FaceZone::RightJaw => FaceZoneGroup::RightCheek,
            FaceZone::Chin => FaceZoneGroup::Chin,
        }
    }

    pub fn is_t_zone(&self) -> bool {
        matches!(
            self,
            FaceZone::ForeheadCenter
                | FaceZone::ForeheadLeft
                | FaceZone::ForeheadRight
                | FaceZone::NoseBridge
                | FaceZone::NoseTip
                | FaceZone::Chin
        )
    }

    pub fn is_u_zone(&self) -> bool {
        matches!(
            self,
            FaceZone::LeftCheek | FaceZone::RightCheek | FaceZone::LeftJaw | FaceZone::RightJaw
        )
    }
}

/// Coarse 6-zone grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceZoneGroup {
    Forehead,
    Nose,
    UnderEye,
    LeftCheek,
    RightCheek,
    Chin,
}

impl FaceZoneGroup {
    pub const ALL: [FaceZoneGroup; 6] = [
        FaceZoneGroup::Forehead,
        FaceZoneGroup::Nose,
        FaceZoneGroup::UnderEye,
        FaceZoneGroup::LeftCheek,
        FaceZoneGroup::RightCheek,
        FaceZoneGroup::Chin,
    ];
}

/// Body posture segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureSegment {
    Head,
    Shoulders,
    Spine,
    Pelvis,
    Knees,
}

impl PostureSegment {
    pub const ALL: [PostureSegment; 5] = [
        PostureSegment::Head,
        PostureSegment::Shoulders,
        PostureSegment::Spine,
        PostureSegment::Pelvis,
        PostureSegment::Knees,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PostureSegment::Head => "head",
            PostureSegment::Shoulders => "shoulders",
            PostureSegment::Spine => "spine",
            PostureSegment::Pelvis => "pelvis",
            PostureSegment::Knees => "knees",
        }
    }
}

/// Axis-aligned pixel bounds, inclusive of `x`/`y`, exclusive of `x + width`/`y + height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBounds {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains_point(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }
}

/// A zone's region: convex polygon in pixel space plus its clipped bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRegion {
    pub zone: FaceZone,
    pub polygon: Vec<Point>,
    pub bounds: PixelBounds,
}

/// Metrics measured inside one zone. Scores are 0..=100, higher is better
/// except `oil` and `redness`, which measure intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneMetrics {
    pub pixel_count: usize,
    pub mean_lab: Lab,
    pub brightness: f64,
    pub oil: f64,
    pub moisture: f64,
    pub redness: f64,
    pub texture_score: f64,
    pub pore_score: f64,
    pub wrinkle_score: f64,
    pub pigmentation_uniformity: f64,
    pub melanin: f64,
    pub hemoglobin: f64,
}

impl ZoneMetrics {
    /// Unweighted mean of several zones. `None` when empty.
    pub fn average<'a>(metrics: impl IntoIterator<Item = &'a ZoneMetrics>) -> Option<ZoneMetrics> {
        let items: Vec<&ZoneMetrics> = metrics.into_iter().collect();
        if items.is_empty() {
            return None;
        }
        let n = items.len() as f64;
        let avg = |f: fn(&ZoneMetrics) -> f64| items.iter().map(|m| f(m)).sum::<f64>() / n;
        let labs: Vec<Lab> = items.iter().map(|m| m.mean_lab).collect();

        Some(ZoneMetrics {
            pixel_count: items.iter().map(|m| m.pixel_count).sum(),
            mean_lab: Lab::mean(&labs)?,
            brightness: avg(|m| m.brightness),
            oil: avg(|m| m.oil),
            moisture: avg(|m| m.moisture),
            redness: avg(|m| m.redness),
            texture_score: avg(|m| m.texture_score),
            pore_score: avg(|m| m.pore_score),
            wrinkle_score: avg(|m| m.wrinkle_score),
            pigmentation_uniformity: avg(|m| m.pigmentation_uniformity),
            melanin: avg(|m| m.melanin),
            hemoglobin: avg(|m| m.hemoglobin),
        })
    }
}

/// Per-zone metrics in taxonomy order.
pub type ZoneMetricsMap = IndexMap<FaceZone, ZoneMetrics>;

/// Per-group metrics in group order.
pub type ZoneGroupMetrics = IndexMap<FaceZoneGroup, ZoneMetrics>;

/// Signed T-zone minus U-zone differences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuDifference {
    pub oil: f64,
    pub moisture: f64,
    pub redness: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_zone_belongs_to_one_group_and_at_most_one_of_t_or_u() {
        for zone in FaceZone::ALL {
            assert!(FaceZoneGroup::ALL.contains(&zone.group()));
            assert!(!(zone.is_t_zone() && zone.is_u_zone()));
        }
    }

    #[test]
    fn bounds_are_half_open() {
        let bounds = PixelBounds::new(2, 2, 3, 3);
        assert!(bounds.contains_point(2, 2));
        assert!(bounds.contains_point(4, 4));
        assert!(!bounds.contains_point(5, 4));
        assert_eq!(bounds.area(), 9);
    }
}
