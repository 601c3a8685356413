pub mod body;
pub mod face;
pub mod polygon;

pub use body::{BodyProportions, PoseGeometry, SegmentDeviations};
pub use face::{extract_face_zones, group_metrics, tu_zone_difference};
