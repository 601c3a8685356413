use super::types::{CoordinateSpace, Landmark, LandmarkModel, LandmarkSet};
use crate::error::LandmarkError;

/// Validate a raw landmark sequence. Any violation rejects the whole sequence.
pub fn validate(
    model: LandmarkModel,
    space: CoordinateSpace,
    points: Vec<Landmark>,
) -> Result<LandmarkSet, LandmarkError> {
    let expected = model.expected_count();
    if points.len() != expected {
        return Err(LandmarkError::CountMismatch {
            expected,
            actual: points.len(),
        });
    }

    let (max_x, max_y) = match space {
        CoordinateSpace::Normalized => (1.0, 1.0),
        CoordinateSpace::Pixel { width, height } => {
            if width == 0 || height == 0 {
                return Err(LandmarkError::EmptyPixelSpace);
            }
            (width as f64, height as f64)
        }
    };

    for (index, point) in points.iter().enumerate() {
        if !point.is_finite() {
            return Err(LandmarkError::NonFinite { index });
        }
        if !(0.0..=max_x).contains(&point.x) || !(0.0..=max_y).contains(&point.y) {
            return Err(LandmarkError::OutOfBounds {
                index,
                x: point.x,
                y: point.y,
            });
        }
        if let Some(visibility) = point.visibility {
            if !(0.0..=1.0).contains(&visibility) {
                return Err(LandmarkError::VisibilityOutOfRange { index, visibility });
            }
        }
    }

    Ok(LandmarkSet {
        model,
        space,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(count: usize) -> Vec<Landmark> {
        (0..count)
            .map(|i| Landmark::new((i % 10) as f64 / 10.0, (i / 10 % 10) as f64 / 10.0, 0.0))
            .collect()
    }

    #[test]
    fn accepts_well_formed_pose() {
        let set = validate(LandmarkModel::Pose, CoordinateSpace::Normalized, grid(33)).unwrap();
        assert_eq!(set.len(), 33);
        assert_eq!(set.model(), LandmarkModel::Pose);
    }

    #[test]
    fn rejects_wrong_cardinality() {
        let err = validate(LandmarkModel::FaceMesh, CoordinateSpace::Normalized, grid(33)).unwrap_err();
        assert_eq!(
            err,
            LandmarkError::CountMismatch {
                expected: 468,
                actual: 33
            }
        );
    }

    #[test]
    fn a_single_nan_rejects_the_whole_sequence() {
        let mut points = grid(468);
        points[200].y = f64::NAN;
        let err = validate(LandmarkModel::FaceMesh, CoordinateSpace::Normalized, points).unwrap_err();
        assert_eq!(err, LandmarkError::NonFinite { index: 200 });
    }

    #[test]
    fn infinite_visibility_is_rejected() {
        let mut points = grid(33);
        points[5] = points[5].with_visibility(f64::INFINITY);
        assert!(validate(LandmarkModel::Pose, CoordinateSpace::Normalized, points).is_err());
    }

    #[test]
    fn visibility_must_be_a_probability() {
        let mut points = grid(33);
        points[7] = points[7].with_visibility(1.7);
        assert_eq!(
            validate(LandmarkModel::Pose, CoordinateSpace::Normalized, points.clone()).unwrap_err(),
            LandmarkError::VisibilityOutOfRange {
                index: 7,
                visibility: 1.7
            }
        );

        points[7] = points[7].with_visibility(1.0);
        points[8] = points[8].with_visibility(0.0);
        assert!(validate(LandmarkModel::Pose, CoordinateSpace::Normalized, points).is_ok());
    }

    #[test]
    fn rejects_out_of_range_normalized_coordinates() {
        let mut points = grid(33);
        points[12].x = 1.2;
        assert!(matches!(
            validate(LandmarkModel::Pose, CoordinateSpace::Normalized, points),
            Err(LandmarkError::OutOfBounds { index: 12, .. })
        ));
    }

    #[test]
    fn pixel_space_uses_declared_bounds() {
        let points: Vec<Landmark> = (0..33).map(|i| Landmark::new(i as f64 * 10.0, 300.0, 0.0)).collect();
        let space = CoordinateSpace::Pixel {
            width: 640,
            height: 480,
        };
        assert!(validate(LandmarkModel::Pose, space, points.clone()).is_ok());

        let small = CoordinateSpace::Pixel {
            width: 200,
            height: 480,
        };
        assert!(validate(LandmarkModel::Pose, small, points.clone()).is_err());

        let empty = CoordinateSpace::Pixel { width: 0, height: 0 };
        assert_eq!(
            validate(LandmarkModel::Pose, empty, points).unwrap_err(),
            LandmarkError::EmptyPixelSpace
        );
    }
}
