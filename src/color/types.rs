use serde::{Deserialize, Serialize};

/// sRGB color, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_image(pixel: &image::Rgb<u8>) -> Self {
        let [r, g, b] = pixel.0;
        Self { r, g, b }
    }

    /// Rec. 601 luma on the 0..255 scale.
    pub fn luma(&self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(pixel: image::Rgb<u8>) -> Self {
        Self::from_image(&pixel)
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(rgb: Rgb) -> Self {
        image::Rgb([rgb.r, rgb.g, rgb.b])
    }
}

/// CIE XYZ tristimulus values, Y on the 0..100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// CIE 1931 (x, y) chromaticity. `None` for black.
    pub fn chromaticity(&self) -> Option<(f64, f64)> {
        let sum = self.x + self.y + self.z;
        if sum <= f64::EPSILON {
            return None;
        }
        Some((self.x / sum, self.y / sum))
    }
}

/// CIELAB color space representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    /// Lightness (0-100)
    pub l: f64,
    /// Green-Red axis
    pub a: f64,
    /// Blue-Yellow axis
    pub b: f64,
}

impl Lab {
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    pub fn chroma(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// Hue angle in degrees [0, 360). Achromatic colors report 0.
    pub fn hue_degrees(&self) -> f64 {
        if self.a == 0.0 && self.b == 0.0 {
            return 0.0;
        }
        let hue = self.b.atan2(self.a).to_degrees();
        if hue < 0.0 {
            hue + 360.0
        } else {
            hue
        }
    }

    pub fn to_lch(&self) -> Lch {
        Lch {
            l: self.l,
            c: self.chroma(),
            h: self.hue_degrees(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.l.is_finite() && self.a.is_finite() && self.b.is_finite()
    }

    /// Component-wise mean. `None` for an empty slice.
    pub fn mean(colors: &[Lab]) -> Option<Lab> {
        if colors.is_empty() {
            return None;
        }
        let n = colors.len() as f64;
        let (l, a, b) = colors.iter().fold((0.0, 0.0, 0.0), |acc, c| {
            (acc.0 + c.l, acc.1 + c.a, acc.2 + c.b)
        });
        Some(Lab::new(l / n, a / n, b / n))
    }
}

/// Cylindrical form of Lab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lch {
    pub l: f64,
    pub c: f64,
    /// Hue in degrees.
    pub h: f64,
}

impl Lch {
    pub fn to_lab(&self) -> Lab {
        let h = self.h.to_radians();
        Lab::new(self.l, self.c * h.cos(), self.c * h.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_wraps_into_positive_range() {
        let lab = Lab::new(50.0, 10.0, -10.0);
        assert!((lab.hue_degrees() - 315.0).abs() < 1e-9);
        assert_eq!(Lab::new(50.0, 0.0, 0.0).hue_degrees(), 0.0);
    }

    #[test]
    fn lch_round_trips() {
        let lab = Lab::new(62.0, 14.5, 18.25);
        let back = lab.to_lch().to_lab();
        assert!((back.a - lab.a).abs() < 1e-9);
        assert!((back.b - lab.b).abs() < 1e-9);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert!(Lab::mean(&[]).is_none());
        let mean = Lab::mean(&[Lab::new(40.0, 2.0, 4.0), Lab::new(60.0, 4.0, 8.0)]).unwrap();
        assert_eq!(mean, Lab::new(50.0, 3.0, 6.0));
    }

    #[test]
    fn black_has_no_chromaticity() {
        assert!(Xyz::new(0.0, 0.0, 0.0).chromaticity().is_none());
    }
}
