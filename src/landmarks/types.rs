use serde::{Deserialize, Serialize};

/// A single detected point. Index position in its set encodes anatomy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Pose models report a per-point visibility in [0, 1].
    pub visibility: Option<f64>,
}

impl Landmark {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && self.visibility.map_or(true, f64::is_finite)
    }
}

/// Detection model, which fixes the landmark cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandmarkModel {
    FaceMesh,
    Pose,
}

impl LandmarkModel {
    pub const fn expected_count(&self) -> usize {
        match self {
            LandmarkModel::FaceMesh => 468,
            LandmarkModel::Pose => 33,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LandmarkModel::FaceMesh => "face_mesh",
            LandmarkModel::Pose => "pose",
        }
    }
}

/// Coordinate space the detector reported in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CoordinateSpace {
    Normalized,
    Pixel { width: u32, height: u32 },
}

/// Where a landmark set came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionSource {
    Detector(String),
    Mock,
}

impl DetectionSource {
    pub fn is_mock(&self) -> bool {
        matches!(self, DetectionSource::Mock)
    }
}

/// A validated landmark sequence. Only `validation::validate` builds one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandmarkSet {
    pub(super) model: LandmarkModel,
    pub(super) space: CoordinateSpace,
    pub(super) points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn model(&self) -> LandmarkModel {
        self.model
    }

    pub fn space(&self) -> CoordinateSpace {
        self.space
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Indices are guaranteed in range by validation for the model's tables.
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points projected to pixel coordinates of a `width` x `height` image.
    pub fn pixel_point(&self, index: usize, width: u32, height: u32) -> Option<(f64, f64)> {
        let landmark = self.points.get(index)?;
        Some(match self.space {
            CoordinateSpace::Normalized => super::geometry::to_pixel(landmark, width, height),
            CoordinateSpace::Pixel {
                width: source_w,
                height: source_h,
            } => (
                landmark.x * width as f64 / source_w as f64,
                landmark.y * height as f64 / source_h as f64,
            ),
        })
    }
}
