use crate::error::AppError;
use crate::landmarks::geometry::{joint_angle, tilt_from_horizontal, tilt_from_vertical, Point};
use crate::landmarks::tables::{
    posture_segment_indices, POSE_LEFT_ANKLE, POSE_LEFT_EAR, POSE_LEFT_HIP, POSE_LEFT_KNEE,
    POSE_LEFT_SHOULDER, POSE_NOSE, POSE_RIGHT_ANKLE, POSE_RIGHT_EAR, POSE_RIGHT_HIP,
    POSE_RIGHT_KNEE, POSE_RIGHT_SHOULDER,
};
use crate::landmarks::{LandmarkModel, LandmarkSet};
use crate::pipeline::domain::zones::PostureSegment;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Deviation from ideal alignment, in degrees, per posture segment.
pub type SegmentDeviations = IndexMap<PostureSegment, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProportions {
    /// Pixel distance between the shoulder joints.
    pub shoulder_width: f64,
    /// Pixel distance between the hip joints.
    pub hip_width: f64,
}

impl BodyProportions {
    /// Shoulder-to-hip width ratio. `None` when the hips coincide.
    pub fn ratio(&self) -> Option<f64> {
        let ratio = self.shoulder_width / self.hip_width;
        (self.hip_width > 0.0 && ratio.is_finite()).then_some(ratio)
    }
}

/// Projects pose landmarks into pixel space for segment geometry.
pub struct PoseGeometry<'a> {
    landmarks: &'a LandmarkSet,
    width: u32,
    height: u32,
}

impl<'a> PoseGeometry<'a> {
    pub fn new(landmarks: &'a LandmarkSet, width: u32, height: u32) -> Result<Self, AppError> {
        if landmarks.model() != LandmarkModel::Pose {
            return Err(AppError::Pipeline(format!(
                "posture segments need {} landmarks, got {}",
                LandmarkModel::Pose.name(),
                landmarks.model().name()
            )));
        }
        Ok(Self {
            landmarks,
            width,
            height,
        })
    }

    fn point(&self, index: usize) -> Result<Point, AppError> {
        self.landmarks
            .pixel_point(index, self.width, self.height)
            .map(Point::from)
            .ok_or_else(|| AppError::Pipeline(format!("pose landmark {} missing", index)))
    }

    fn midpoint(&self, a: usize, b: usize) -> Result<Point, AppError> {
        Ok(self.point(a)?.midpoint(&self.point(b)?))
    }

    /// Degrees away from neutral alignment for one segment.
    pub fn deviation(&self, segment: PostureSegment) -> Result<f64, AppError> {
        match segment {
            // Lateral head tilt, or the head shifted off the shoulder centre, whichever is worse.
            PostureSegment::Head => {
                let ear_tilt =
                    tilt_from_horizontal(&self.point(POSE_LEFT_EAR)?, &self.point(POSE_RIGHT_EAR)?);
                let shoulders = self.midpoint(POSE_LEFT_SHOULDER, POSE_RIGHT_SHOULDER)?;
                let shift = tilt_from_vertical(&shoulders, &self.point(POSE_NOSE)?);
                Ok(ear_tilt.max(shift))
            }
            PostureSegment::Shoulders => Ok(tilt_from_horizontal(
                &self.point(POSE_LEFT_SHOULDER)?,
                &self.point(POSE_RIGHT_SHOULDER)?,
            )),
            PostureSegment::Spine => Ok(tilt_from_vertical(
                &self.midpoint(POSE_LEFT_HIP, POSE_RIGHT_HIP)?,
                &self.midpoint(POSE_LEFT_SHOULDER, POSE_RIGHT_SHOULDER)?,
            )),
            PostureSegment::Pelvis => Ok(tilt_from_horizontal(
                &self.point(POSE_LEFT_HIP)?,
                &self.point(POSE_RIGHT_HIP)?,
            )),
            // Mean bend away from a straight hip-knee-ankle line.
            PostureSegment::Knees => {
                let left = joint_angle(
                    &self.point(POSE_LEFT_HIP)?,
                    &self.point(POSE_LEFT_KNEE)?,
                    &self.point(POSE_LEFT_ANKLE)?,
                );
                let right = joint_angle(
                    &self.point(POSE_RIGHT_HIP)?,
                    &self.point(POSE_RIGHT_KNEE)?,
                    &self.point(POSE_RIGHT_ANKLE)?,
                );
                Ok(((180.0 - left) + (180.0 - right)) / 2.0)
            }
        }
    }

    pub fn deviations(&self) -> Result<SegmentDeviations, AppError> {
        PostureSegment::ALL
            .iter()
            .map(|segment| Ok((*segment, self.deviation(*segment)?)))
            .collect()
    }

    /// Mean detector visibility of the landmarks a segment uses. `None` when none report it.
    pub fn segment_visibility(&self, segment: PostureSegment) -> Option<f64> {
        let visibilities: Vec<f64> = posture_segment_indices(segment)
            .iter()
            .filter_map(|index| self.landmarks.get(*index)?.visibility)
            .collect();
        (!visibilities.is_empty()).then(|| visibilities.iter().sum::<f64>() / visibilities.len() as f64)
    }

    pub fn proportions(&self) -> Result<BodyProportions, AppError> {
        Ok(BodyProportions {
            shoulder_width: self
                .point(POSE_LEFT_SHOULDER)?
                .distance(&self.point(POSE_RIGHT_SHOULDER)?),
            hip_width: self.point(POSE_LEFT_HIP)?.distance(&self.point(POSE_RIGHT_HIP)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{validate, CoordinateSpace, Landmark, MockLandmarkDetector};

    fn upright_pose() -> Vec<Landmark> {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); 33];
        points[POSE_NOSE] = Landmark::new(0.50, 0.12, 0.0);
        points[POSE_LEFT_EAR] = Landmark::new(0.55, 0.11, 0.0);
        points[POSE_RIGHT_EAR] = Landmark::new(0.45, 0.11, 0.0);
        points[POSE_LEFT_SHOULDER] = Landmark::new(0.60, 0.22, 0.0);
        points[POSE_RIGHT_SHOULDER] = Landmark::new(0.40, 0.22, 0.0);
        points[POSE_LEFT_HIP] = Landmark::new(0.57, 0.50, 0.0);
        points[POSE_RIGHT_HIP] = Landmark::new(0.43, 0.50, 0.0);
        points[POSE_LEFT_KNEE] = Landmark::new(0.57, 0.70, 0.0);
        points[POSE_RIGHT_KNEE] = Landmark::new(0.43, 0.70, 0.0);
        points[POSE_LEFT_ANKLE] = Landmark::new(0.57, 0.90, 0.0);
        points[POSE_RIGHT_ANKLE] = Landmark::new(0.43, 0.90, 0.0);
        points
    }

    fn pose(points: Vec<Landmark>) -> LandmarkSet {
        validate(LandmarkModel::Pose, CoordinateSpace::Normalized, points).unwrap()
    }

    #[test]
    fn upright_pose_has_no_deviation() {
        let set = pose(upright_pose());
        let deviations = PoseGeometry::new(&set, 400, 800).unwrap().deviations().unwrap();
        assert_eq!(deviations.len(), 5);
        for (segment, degrees) in deviations {
            assert!(degrees.abs() < 1e-9, "{:?} = {}", segment, degrees);
        }
    }

    #[test]
    fn dropped_shoulder_is_measured() {
        let mut points = upright_pose();
        // 0.2 * 400 px wide, 0.02 * 400 px drop on a square frame: atan(0.1)
        points[POSE_RIGHT_SHOULDER] = Landmark::new(0.40, 0.24, 0.0);
        let set = pose(points);
        let geometry = PoseGeometry::new(&set, 400, 400).unwrap();
        let degrees = geometry.deviation(PostureSegment::Shoulders).unwrap();
        assert!((degrees - 0.1f64.atan().to_degrees()).abs() < 1e-9);
    }

    #[test]
    fn proportions_use_joint_widths() {
        let set = pose(upright_pose());
        let proportions = PoseGeometry::new(&set, 1000, 1000).unwrap().proportions().unwrap();
        assert!((proportions.shoulder_width - 200.0).abs() < 1e-9);
        assert!((proportions.hip_width - 140.0).abs() < 1e-9);
        assert!((proportions.ratio().unwrap() - 200.0 / 140.0).abs() < 1e-12);
    }

    #[test]
    fn face_landmarks_are_rejected() {
        let detection = MockLandmarkDetector::new(1).generate(LandmarkModel::FaceMesh);
        let face = validate(LandmarkModel::FaceMesh, detection.space, detection.points).unwrap();
        assert!(PoseGeometry::new(&face, 100, 100).is_err());
    }

    #[test]
    fn visibility_is_averaged_per_segment() {
        let mut points = upright_pose();
        points[POSE_LEFT_HIP] = points[POSE_LEFT_HIP].with_visibility(0.9);
        points[POSE_RIGHT_HIP] = points[POSE_RIGHT_HIP].with_visibility(0.7);
        let set = pose(points);
        let geometry = PoseGeometry::new(&set, 100, 100).unwrap();
        assert!((geometry.segment_visibility(PostureSegment::Pelvis).unwrap() - 0.8).abs() < 1e-12);
        assert_eq!(geometry.segment_visibility(PostureSegment::Shoulders), None);
    }

    #[test]
    fn coincident_hips_have_no_ratio() {
        let proportions = BodyProportions {
            shoulder_width: 10.0,
            hip_width: 0.0,
        };
        assert_eq!(proportions.ratio(), None);
    }
}
