pub mod detector;
pub mod geometry;
pub mod mock;
pub mod tables;
pub mod types;
pub mod validation;

pub use detector::{LandmarkDetector, PrecomputedDetector, RawDetection, UnavailableDetector};
pub use mock::MockLandmarkDetector;
pub use types::{CoordinateSpace, DetectionSource, Landmark, LandmarkModel, LandmarkSet};
pub use validation::validate;
