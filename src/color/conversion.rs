//! sRGB <-> XYZ <-> Lab conversions (D65).
//!
//! Out-of-range policy: every floating point channel headed for an `Rgb`
//! goes through [`clamp_channel`]. Non-finite values become 0, everything
//! else is clamped to [0, 255] and rounded. Malformed hex is rejected.

#![allow(clippy::excessive_precision)]

use super::types::{Lab, Rgb, Xyz};
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// D65 reference white, Y = 100.
pub const D65_WHITE: Xyz = Xyz::new(95.047, 100.0, 108.883);

/// CIE ε = (6/29)^3, the cube-root / linear switch.
pub const LAB_EPSILON: f64 = 216.0 / 24389.0;
/// CIE κ = (29/3)^3.
pub const LAB_KAPPA: f64 = 24389.0 / 27.0;

const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// The single clamp applied to every float channel before it becomes a `u8`.
pub fn clamp_channel(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn mat_mul(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

pub fn rgb_to_xyz(rgb: Rgb) -> Xyz {
    let linear = [
        srgb_to_linear(rgb.r as f64 / 255.0),
        srgb_to_linear(rgb.g as f64 / 255.0),
        srgb_to_linear(rgb.b as f64 / 255.0),
    ];
    let [x, y, z] = mat_mul(&RGB_TO_XYZ, linear);
    Xyz::new(x * 100.0, y * 100.0, z * 100.0)
}

pub fn xyz_to_rgb(xyz: Xyz) -> Rgb {
    let linear = mat_mul(&XYZ_TO_RGB, [xyz.x / 100.0, xyz.y / 100.0, xyz.z / 100.0]);
    let encode = |c: f64| clamp_channel(linear_to_srgb(c.max(0.0)) * 255.0);
    Rgb::new(encode(linear[0]), encode(linear[1]), encode(linear[2]))
}

fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

fn lab_f_inverse(f: f64) -> f64 {
    let cubed = f * f * f;
    if cubed > LAB_EPSILON {
        cubed
    } else {
        (116.0 * f - 16.0) / LAB_KAPPA
    }
}

pub fn xyz_to_lab(xyz: Xyz) -> Lab {
    let fx = lab_f(xyz.x / D65_WHITE.x);
    let fy = lab_f(xyz.y / D65_WHITE.y);
    let fz = lab_f(xyz.z / D65_WHITE.z);

    Lab::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

pub fn lab_to_xyz(lab: Lab) -> Xyz {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;

    let yr = if lab.l > LAB_KAPPA * LAB_EPSILON {
        fy * fy * fy
    } else {
        lab.l / LAB_KAPPA
    };

    Xyz::new(
        lab_f_inverse(fx) * D65_WHITE.x,
        yr * D65_WHITE.y,
        lab_f_inverse(fz) * D65_WHITE.z,
    )
}

pub fn rgb_to_lab(rgb: Rgb) -> Lab {
    xyz_to_lab(rgb_to_xyz(rgb))
}

pub fn lab_to_rgb(lab: Lab) -> Rgb {
    xyz_to_rgb(lab_to_xyz(lab))
}

/// Parse `#rrggbb` / `rrggbb`, case-insensitive. At most one `#`, no surrounding whitespace.
pub fn hex_to_rgb(hex: &str) -> Result<Rgb, AppError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::InvalidColor(format!(
            "expected 6 hex digits, got '{}'",
            hex
        )));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|e| AppError::InvalidColor(format!("'{}': {}", hex, e)))
    };

    Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

pub fn hex_to_lab(hex: &str) -> Result<Lab, AppError> {
    hex_to_rgb(hex).map(rgb_to_lab)
}

pub fn lab_to_hex(lab: Lab) -> String {
    rgb_to_hex(lab_to_rgb(lab))
}

/// Individual Typology Angle in degrees.
///
/// `atan2` keeps b* = 0 defined: ±90 depending on the side of L* = 50.
pub fn individual_typology_angle(lab: Lab) -> f64 {
    (lab.l - 50.0).atan2(lab.b).to_degrees()
}

/// Skin tone bands by ITA. Boundaries bind to the darker band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItaCategory {
    VeryLight,
    Light,
    Intermediate,
    Tan,
    Brown,
    Dark,
}

impl ItaCategory {
    pub fn from_angle(ita: f64) -> Self {
        if ita > 55.0 {
            ItaCategory::VeryLight
        } else if ita > 41.0 {
            ItaCategory::Light
        } else if ita > 28.0 {
            ItaCategory::Intermediate
        } else if ita > 10.0 {
            ItaCategory::Tan
        } else if ita > -30.0 {
            ItaCategory::Brown
        } else {
            ItaCategory::Dark
        }
    }

    pub fn from_lab(lab: Lab) -> Self {
        Self::from_angle(individual_typology_angle(lab))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_converts_to_reference_lab() {
        let white = hex_to_rgb("#FFFFFF").unwrap();
        assert_eq!(white, Rgb::new(255, 255, 255));

        let lab = rgb_to_lab(white);
        assert!((lab.l - 100.0).abs() < 1e-2, "L = {}", lab.l);
        assert!(lab.a.abs() < 1e-2, "a = {}", lab.a);
        assert!(lab.b.abs() < 1e-2, "b = {}", lab.b);
    }

    #[test]
    fn black_converts_to_zero_lightness() {
        let lab = rgb_to_lab(Rgb::new(0, 0, 0));
        assert!(lab.l.abs() < 1e-9);
    }

    #[test]
    fn lab_round_trip_recovers_every_sampled_rgb() {
        for r in (0..=255).step_by(15) {
            for g in (0..=255).step_by(15) {
                for b in (0..=255).step_by(15) {
                    let rgb = Rgb::new(r as u8, g as u8, b as u8);
                    assert_eq!(lab_to_rgb(rgb_to_lab(rgb)), rgb);
                    assert_eq!(xyz_to_rgb(rgb_to_xyz(rgb)), rgb);
                }
            }
        }
    }

    #[test]
    fn piecewise_boundary_is_continuous() {
        let below = lab_f(LAB_EPSILON - 1e-12);
        let above = lab_f(LAB_EPSILON + 1e-12);
        assert!((below - above).abs() < 1e-9);

        let l_at_switch = LAB_KAPPA * LAB_EPSILON;
        let y_low = lab_to_xyz(Lab::new(l_at_switch - 1e-9, 0.0, 0.0)).y;
        let y_high = lab_to_xyz(Lab::new(l_at_switch + 1e-9, 0.0, 0.0)).y;
        assert!((y_low - y_high).abs() < 1e-6);
    }

    #[test]
    fn hex_is_case_insensitive_and_emits_lowercase() {
        assert_eq!(hex_to_rgb("aBcDeF").unwrap(), Rgb::new(0xab, 0xcd, 0xef));
        assert_eq!(rgb_to_hex(Rgb::new(0xAB, 0x0C, 0xEF)), "#ab0cef");
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(hex_to_rgb("#fff").is_err());
        assert!(hex_to_rgb("#gg0000").is_err());
        assert!(hex_to_rgb("#1234567").is_err());
        assert!(hex_to_rgb("##ffffff").is_err());
        assert!(hex_to_rgb(" #000000 ").is_err());
    }

    #[test]
    fn out_of_gamut_lab_is_clamped() {
        let rgb = lab_to_rgb(Lab::new(150.0, 0.0, 0.0));
        assert_eq!(rgb, Rgb::new(255, 255, 255));
        assert_eq!(clamp_channel(f64::NAN), 0);
        assert_eq!(clamp_channel(-12.0), 0);
        assert_eq!(clamp_channel(300.0), 255);
    }

    #[test]
    fn ita_boundaries_bind_to_darker_band() {
        assert_eq!(ItaCategory::from_angle(55.0), ItaCategory::Light);
        assert_eq!(ItaCategory::from_angle(55.1), ItaCategory::VeryLight);
        assert_eq!(ItaCategory::from_angle(-30.0), ItaCategory::Dark);
        assert_eq!(ItaCategory::from_angle(10.0), ItaCategory::Brown);
    }

    #[test]
    fn ita_is_defined_for_zero_b() {
        assert!((individual_typology_angle(Lab::new(70.0, 0.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((individual_typology_angle(Lab::new(30.0, 0.0, 0.0)) + 90.0).abs() < 1e-9);
    }
}
