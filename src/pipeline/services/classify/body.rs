use crate::error::AppError;
use crate::pipeline::domain::body::{BmiCategory, BmiReading, BodyShape};

/// Shoulder/hip joint-width ratio at or above which the frame reads as an inverted triangle.
pub const INVERTED_TRIANGLE_RATIO: f64 = 1.55;
/// Ratio at or below which the frame reads as a triangle.
pub const TRIANGLE_RATIO: f64 = 1.25;

pub fn body_shape(shoulder_hip_ratio: f64) -> BodyShape {
    if shoulder_hip_ratio >= INVERTED_TRIANGLE_RATIO {
        BodyShape::InvertedTriangle
    } else if shoulder_hip_ratio <= TRIANGLE_RATIO {
        BodyShape::Triangle
    } else {
        BodyShape::Rectangle
    }
}

/// Body-mass index from centimetres and kilograms.
pub fn bmi(height_cm: f64, weight_kg: f64) -> Result<f64, AppError> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(AppError::InvalidMeasurement(format!(
            "height must be a positive number of centimetres, got {}",
            height_cm
        )));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(AppError::InvalidMeasurement(format!(
            "weight must be a positive number of kilograms, got {}",
            weight_kg
        )));
    }
    let meters = height_cm / 100.0;
    Ok(weight_kg / (meters * meters))
}

/// Asian-adjusted bands.
pub fn bmi_category(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 23.0 {
        BmiCategory::Normal
    } else if bmi < 25.0 {
        BmiCategory::Overweight
    } else if bmi < 30.0 {
        BmiCategory::Obese
    } else {
        BmiCategory::SevereObese
    }
}

pub fn bmi_reading(height_cm: f64, weight_kg: f64) -> Result<BmiReading, AppError> {
    let bmi = bmi(height_cm, weight_kg)?;
    Ok(BmiReading {
        height_cm,
        weight_kg,
        bmi,
        category: bmi_category(bmi),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_adult_is_normal() {
        let reading = bmi_reading(175.0, 70.0).unwrap();
        assert!((reading.bmi - 22.857).abs() < 1e-3);
        assert_eq!(reading.category, BmiCategory::Normal);
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(bmi_category(18.49), BmiCategory::Underweight);
        assert_eq!(bmi_category(18.5), BmiCategory::Normal);
        assert_eq!(bmi_category(23.0), BmiCategory::Overweight);
        assert_eq!(bmi_category(25.0), BmiCategory::Obese);
        assert_eq!(bmi_category(30.0), BmiCategory::SevereObese);
    }

    #[test]
    fn rejects_impossible_measurements() {
        for (h, w) in [(0.0, 70.0), (-170.0, 70.0), (175.0, 0.0), (f64::NAN, 70.0), (175.0, f64::INFINITY)] {
            assert!(matches!(bmi(h, w), Err(AppError::InvalidMeasurement(_))), "{} {}", h, w);
        }
    }

    #[test]
    fn shape_boundaries() {
        assert_eq!(body_shape(1.55), BodyShape::InvertedTriangle);
        assert_eq!(body_shape(1.43), BodyShape::Rectangle);
        assert_eq!(body_shape(1.25), BodyShape::Triangle);
    }
}
