use super::conversion::hex_to_lab;
use super::distance::ciede2000;
use super::types::Lab;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A named product shade (foundation, concealer, lipstick...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shade {
    pub name: String,
    pub hex: String,
}

impl Shade {
    pub fn new(name: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hex: hex.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchQuality {
    Imperceptible,
    Slight,
    Noticeable,
    Distinct,
}

impl MatchQuality {
    pub fn from_delta_e(delta_e: f64) -> Self {
        if delta_e < 1.0 {
            MatchQuality::Imperceptible
        } else if delta_e < 2.0 {
            MatchQuality::Slight
        } else if delta_e < 10.0 {
            MatchQuality::Noticeable
        } else {
            MatchQuality::Distinct
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadeMatch {
    pub shade: Shade,
    pub delta_e: f64,
    pub quality: MatchQuality,
}

/// Rank shades by CIEDE2000 distance from `skin`, closest first.
///
/// Ties keep catalogue order. A shade with a malformed hex fails the whole call.
pub fn rank_shades(skin: Lab, catalogue: &[Shade], limit: usize) -> Result<Vec<ShadeMatch>, AppError> {
    let mut matches = catalogue
        .iter()
        .map(|shade| {
            let delta_e = ciede2000(skin, hex_to_lab(&shade.hex)?);
            Ok(ShadeMatch {
                shade: shade.clone(),
                delta_e,
                quality: MatchQuality::from_delta_e(delta_e),
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    matches.sort_by(|a, b| a.delta_e.partial_cmp(&b.delta_e).unwrap_or(Ordering::Equal));
    matches.truncate(limit);
    Ok(matches)
}
