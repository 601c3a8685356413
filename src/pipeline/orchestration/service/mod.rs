pub mod detection_service;
pub mod fallback;

use crate::error::AppError;

pub use detection_service::{Detection, DetectionRequest, DetectionService};
pub use fallback::{FallbackLayer, FallbackService};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Recover the typed error from a tower service failure.
pub fn into_app_error(err: BoxError, stage: &'static str) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return AppError::Timeout(stage);
    }
    match err.downcast::<AppError>() {
        Ok(app_error) => *app_error,
        Err(other) => AppError::Pipeline(format!("{} failed: {}", stage, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_survive_boxing() {
        let boxed: BoxError = Box::new(AppError::InvalidInputImage("empty".to_string()));
        assert!(matches!(
            into_app_error(boxed, "detection"),
            AppError::InvalidInputImage(_)
        ));

        let elapsed: BoxError = Box::new(tower::timeout::error::Elapsed::new());
        assert!(matches!(into_app_error(elapsed, "detection"), AppError::Timeout("detection")));

        let other: BoxError = "socket closed".into();
        assert!(matches!(into_app_error(other, "detection"), AppError::Pipeline(_)));
    }
}
