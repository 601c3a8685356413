use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input image: {0}")]
    InvalidInputImage(String),
    #[error("Invalid landmark data: {0}")]
    InvalidLandmarkData(#[from] LandmarkError),
    #[error("Landmark detection unavailable: {0}")]
    DetectionUnavailable(String),
    #[error("Numeric domain error in {0}")]
    NumericDomain(&'static str),
    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Stage '{0}' timed out")]
    Timeout(&'static str),
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid settings: {0}")]
    Settings(String),
    #[error("Pipeline error: {0}")]
    Pipeline(String),
    #[error("Store error: {0}")]
    Store(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Short, stable name of the error kind for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInputImage(_) => "invalid_input_image",
            AppError::InvalidLandmarkData(_) => "invalid_landmark_data",
            AppError::DetectionUnavailable(_) => "detection_unavailable",
            AppError::NumericDomain(_) => "numeric_domain",
            AppError::InvalidMeasurement(_) => "invalid_measurement",
            AppError::InvalidColor(_) => "invalid_color",
            AppError::Timeout(_) => "timeout",
            AppError::Config(_) => "config",
            AppError::Settings(_) => "settings",
            AppError::Pipeline(_) => "pipeline",
            AppError::Store(_) => "store",
            AppError::Serialization(_) => "serialization",
        }
    }

    /// The only text a user ever sees; the kind goes to the log.
    pub fn user_message(&self) -> &'static str {
        "analysis unavailable, please retry"
    }

    /// Errors that should route detection to the mock detector instead of failing the run.
    pub fn triggers_fallback(&self) -> bool {
        matches!(
            self,
            AppError::DetectionUnavailable(_) | AppError::Timeout(_)
        )
    }
}

// Landmark Validation Error Type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("expected {expected} landmarks, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
    #[error("landmark {index} at ({x}, {y}) is outside the coordinate bounds")]
    OutOfBounds { index: usize, x: f64, y: f64 },
    #[error("landmark {index} has visibility {visibility} outside [0, 1]")]
    VisibilityOutOfRange { index: usize, visibility: f64 },
    #[error("pixel coordinate space must have non-zero dimensions")]
    EmptyPixelSpace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landmark_errors_convert_into_app_error() {
        let err: AppError = LandmarkError::NonFinite { index: 3 }.into();
        assert_eq!(err.kind(), "invalid_landmark_data");
        assert!(!err.triggers_fallback());
        assert_eq!(err.user_message(), "analysis unavailable, please retry");
    }

    #[test]
    fn detection_failures_trigger_fallback() {
        assert!(AppError::DetectionUnavailable("camera".into()).triggers_fallback());
        assert!(AppError::Timeout("detection").triggers_fallback());
        assert!(!AppError::InvalidInputImage("empty".into()).triggers_fallback());
    }
}
