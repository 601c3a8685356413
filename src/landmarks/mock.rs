//! Synthetic landmark generation for when no detection model is available.
//!
//! Output has the same cardinality and index semantics as a real detector:
//! table indices are placed around canonical anatomical positions, and the
//! remaining mesh points are scattered inside the face oval. Generation is
//! seeded, so a given seed always yields the same landmarks.

use super::detector::{LandmarkDetector, RawDetection};
use super::tables::{self, face_zone_indices};
use super::types::{Landmark, LandmarkModel};
use crate::common::Frame;
use crate::error::AppError;
use crate::pipeline::domain::zones::FaceZone;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;

const FACE_CENTER: (f64, f64) = (0.5, 0.48);
const FACE_RADII: (f64, f64) = (0.28, 0.38);
const ZONE_JITTER: f64 = 0.004;
const POSE_JITTER: f64 = 0.002;

/// Canonical (center x, center y, radius) of each zone patch.
fn zone_anchor(zone: FaceZone) -> (f64, f64, f64) {
    match zone {
        FaceZone::ForeheadCenter => (0.50, 0.22, 0.050),
        FaceZone::ForeheadLeft => (0.64, 0.24, 0.045),
        FaceZone::ForeheadRight => (0.36, 0.24, 0.045),
        FaceZone::LeftUnderEye => (0.62, 0.44, 0.035),
        FaceZone::RightUnderEye => (0.38, 0.44, 0.035),
        FaceZone::NoseBridge => (0.50, 0.40, 0.030),
        FaceZone::NoseTip => (0.50, 0.53, 0.035),
        FaceZone::LeftCheek => (0.67, 0.56, 0.055),
        FaceZone::RightCheek => (0.33, 0.56, 0.055),
        FaceZone::LeftJaw => (0.66, 0.72, 0.045),
        FaceZone::RightJaw => (0.34, 0.72, 0.045),
        FaceZone::Chin => (0.50, 0.80, 0.045),
    }
}

/// Canonical standing, front-facing pose (normalized x, y).
const POSE_TEMPLATE: [(f64, f64); 33] = [
    (0.500, 0.120),
    (0.510, 0.105),
    (0.520, 0.105),
    (0.530, 0.105),
    (0.490, 0.105),
    (0.480, 0.105),
    (0.470, 0.105),
    (0.545, 0.115),
    (0.455, 0.115),
    (0.515, 0.140),
    (0.485, 0.140),
    (0.600, 0.220),
    (0.400, 0.220),
    (0.630, 0.360),
    (0.370, 0.360),
    (0.640, 0.480),
    (0.360, 0.480),
    (0.645, 0.510),
    (0.355, 0.510),
    (0.640, 0.520),
    (0.360, 0.520),
    (0.635, 0.500),
    (0.365, 0.500),
    (0.570, 0.500),
    (0.430, 0.500),
    (0.565, 0.700),
    (0.435, 0.700),
    (0.560, 0.900),
    (0.440, 0.900),
    (0.555, 0.920),
    (0.445, 0.920),
    (0.570, 0.940),
    (0.430, 0.940),
];

/// Place `indices` evenly on an ellipse, in table order.
fn place_ring(
    points: &mut [Option<Landmark>],
    indices: &[usize],
    center: (f64, f64),
    radii: (f64, f64),
    rng: &mut StdRng,
) {
    let count = indices.len() as f64;
    for (k, index) in indices.iter().enumerate() {
        let theta = TAU * k as f64 / count;
        let jitter_x = rng.random_range(-ZONE_JITTER..=ZONE_JITTER);
        let jitter_y = rng.random_range(-ZONE_JITTER..=ZONE_JITTER);
        let x = (center.0 + radii.0 * theta.cos() + jitter_x).clamp(0.0, 1.0);
        let y = (center.1 + radii.1 * theta.sin() + jitter_y).clamp(0.0, 1.0);
        points[*index] = Some(Landmark::new(x, y, 0.0));
    }
}

pub fn generate_face_mesh(seed: u64) -> Vec<Landmark> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points: Vec<Option<Landmark>> = vec![None; LandmarkModel::FaceMesh.expected_count()];

    place_ring(&mut points, &tables::FACE_OVAL, FACE_CENTER, FACE_RADII, &mut rng);
    place_ring(&mut points, &tables::LEFT_EYE, (0.62, 0.37), (0.05, 0.02), &mut rng);
    place_ring(&mut points, &tables::RIGHT_EYE, (0.38, 0.37), (0.05, 0.02), &mut rng);
    place_ring(&mut points, &tables::LIPS_OUTER, (0.50, 0.66), (0.08, 0.03), &mut rng);

    for zone in FaceZone::ALL {
        let (cx, cy, r) = zone_anchor(zone);
        place_ring(&mut points, face_zone_indices(zone), (cx, cy), (r, r), &mut rng);
    }

    points
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| {
                let theta = rng.random_range(0.0..TAU);
                let radius = rng.random_range(0.0..0.9f64).sqrt();
                Landmark::new(
                    FACE_CENTER.0 + FACE_RADII.0 * radius * theta.cos(),
                    FACE_CENTER.1 + FACE_RADII.1 * radius * theta.sin(),
                    rng.random_range(-0.05..0.05),
                )
            })
        })
        .collect()
}

pub fn generate_pose(seed: u64) -> Vec<Landmark> {
    let mut rng = StdRng::seed_from_u64(seed);
    POSE_TEMPLATE
        .iter()
        .map(|&(x, y)| {
            let jitter_x = rng.random_range(-POSE_JITTER..=POSE_JITTER);
            let jitter_y = rng.random_range(-POSE_JITTER..=POSE_JITTER);
            Landmark::new(
                (x + jitter_x).clamp(0.0, 1.0),
                (y + jitter_y).clamp(0.0, 1.0),
                0.0,
            )
            .with_visibility(rng.random_range(0.85..=1.0))
        })
        .collect()
}

/// Detector that always succeeds with seeded synthetic landmarks.
pub struct MockLandmarkDetector {
    seed: u64,
}

impl MockLandmarkDetector {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn generate(&self, model: LandmarkModel) -> RawDetection {
        let points = match model {
            LandmarkModel::FaceMesh => generate_face_mesh(self.seed),
            LandmarkModel::Pose => generate_pose(self.seed),
        };
        RawDetection::normalized(points)
    }
}

#[async_trait]
impl LandmarkDetector for MockLandmarkDetector {
    async fn detect(&self, _frame: &Frame, model: LandmarkModel) -> Result<RawDetection, AppError> {
        Ok(self.generate(model))
    }

    fn name(&self) -> &'static str {
        "MockLandmarkDetector"
    }
}
