pub mod conversion;
pub mod distance;
pub mod shade_matching;
pub mod types;

pub use conversion::{
    clamp_channel, hex_to_lab, hex_to_rgb, individual_typology_angle, lab_to_hex, lab_to_rgb,
    lab_to_xyz, rgb_to_hex, rgb_to_lab, rgb_to_xyz, xyz_to_lab, xyz_to_rgb, ItaCategory,
};
pub use distance::{cie76, ciede2000, ciede2000_with_weights, ParametricFactors};
pub use shade_matching::{rank_shades, MatchQuality, Shade, ShadeMatch};
pub use types::{Lab, Lch, Rgb, Xyz};
