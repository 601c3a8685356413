pub mod frame;
pub mod numeric;

pub use frame::{DeviceMetadata, Frame};
