pub mod assemble;
pub mod classify;
pub mod image;
pub mod measure;
pub mod pigment;
pub mod texture;
pub mod zones;

pub use measure::ZoneMeasurer;
