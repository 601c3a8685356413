use chrono::{DateTime, Utc};
use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Camera/device information captured alongside the frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetadata {
    pub device_model: Option<String>,
    pub front_camera: bool,
    pub exposure_ms: Option<f64>,
    pub iso: Option<u32>,
}

/// One captured image, owned by a single analysis run.
#[derive(Clone)]
pub struct Frame {
    user_id: Uuid,
    image: Arc<RgbImage>,
    captured_at: DateTime<Utc>,
    frame_id: Uuid,
    device: DeviceMetadata,
}

impl Frame {
    pub fn new(user_id: Uuid, image: DynamicImage, captured_at: DateTime<Utc>) -> Self {
        Self::from_rgb(user_id, image.to_rgb8(), captured_at)
    }

    pub fn from_rgb(user_id: Uuid, image: RgbImage, captured_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            image: Arc::new(image),
            captured_at,
            frame_id: Uuid::new_v4(),
            device: DeviceMetadata::default(),
        }
    }

    pub fn with_device(mut self, device: DeviceMetadata) -> Self {
        self.device = device;
        self
    }

    /// Same capture, different pixels (e.g. after white balance).
    pub fn with_image(&self, image: RgbImage) -> Self {
        Self {
            user_id: self.user_id,
            image: Arc::new(image),
            captured_at: self.captured_at,
            frame_id: self.frame_id,
            device: self.device.clone(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn frame_id(&self) -> Uuid {
        self.frame_id
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn shared_image(&self) -> Arc<RgbImage> {
        Arc::clone(&self.image)
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn device(&self) -> &DeviceMetadata {
        &self.device
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("user_id", &self.user_id)
            .field("frame_id", &self.frame_id)
            .field("dimensions", &self.dimensions())
            .field("captured_at", &self.captured_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn cloning_frame_shares_image_buffer() {
        let img: DynamicImage = DynamicImage::ImageRgb8(
            ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(16, 16, Rgb([1, 2, 3])),
        );
        let f1 = Frame::new(Uuid::new_v4(), img, Utc::now());
        let f2 = f1.clone();
        assert!(Arc::ptr_eq(&f1.image, &f2.image));
    }

    #[test]
    fn with_image_keeps_identity() {
        let f1 = Frame::from_rgb(
            Uuid::new_v4(),
            ImageBuffer::from_pixel(8, 8, Rgb([10, 20, 30])),
            Utc::now(),
        );
        let f2 = f1.with_image(ImageBuffer::from_pixel(8, 8, Rgb([40, 50, 60])));
        assert_eq!(f1.frame_id(), f2.frame_id());
        assert_eq!(f1.user_id(), f2.user_id());
        assert_eq!(f2.image().get_pixel(0, 0).0, [40, 50, 60]);
    }
}
