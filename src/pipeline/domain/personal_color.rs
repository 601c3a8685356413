use super::capture::CaptureConditions;
use crate::color::{ItaCategory, Lab, Lch, ShadeMatch};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Undertone {
    Warm,
    Cool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// 12-tone seasonal palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneType {
    LightSpring,
    TrueSpring,
    BrightSpring,
    LightSummer,
    TrueSummer,
    SoftSummer,
    SoftAutumn,
    TrueAutumn,
    DeepAutumn,
    BrightWinter,
    TrueWinter,
    DeepWinter,
}

impl ToneType {
    pub const ALL: [ToneType; 12] = [
        ToneType::LightSpring,
        ToneType::TrueSpring,
        ToneType::BrightSpring,
        ToneType::LightSummer,
        ToneType::TrueSummer,
        ToneType::SoftSummer,
        ToneType::SoftAutumn,
        ToneType::TrueAutumn,
        ToneType::DeepAutumn,
        ToneType::BrightWinter,
        ToneType::TrueWinter,
        ToneType::DeepWinter,
    ];

    pub fn season(&self) -> Season {
        match self {
            ToneType::LightSpring | ToneType::TrueSpring | ToneType::BrightSpring => Season::Spring,
            ToneType::LightSummer | ToneType::TrueSummer | ToneType::SoftSummer => Season::Summer,
            ToneType::SoftAutumn | ToneType::TrueAutumn | ToneType::DeepAutumn => Season::Autumn,
            ToneType::BrightWinter | ToneType::TrueWinter | ToneType::DeepWinter => Season::Winter,
        }
    }

    pub fn undertone(&self) -> Undertone {
        match self.season() {
            Season::Spring | Season::Autumn => Undertone::Warm,
            Season::Summer | Season::Winter => Undertone::Cool,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToneType::LightSpring => "light_spring",
            ToneType::TrueSpring => "true_spring",
            ToneType::BrightSpring => "bright_spring",
            ToneType::LightSummer => "light_summer",
            ToneType::TrueSummer => "true_summer",
            ToneType::SoftSummer => "soft_summer",
            ToneType::SoftAutumn => "soft_autumn",
            ToneType::TrueAutumn => "true_autumn",
            ToneType::DeepAutumn => "deep_autumn",
            ToneType::BrightWinter => "bright_winter",
            ToneType::TrueWinter => "true_winter",
            ToneType::DeepWinter => "deep_winter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalColorAnalysis {
    pub tone: ToneType,
    pub undertone: Undertone,
    pub skin_tone: Lab,
    pub lch: Lch,
    pub ita: f64,
    pub ita_category: ItaCategory,
    /// Catalogue shades closest to the skin tone, best first.
    pub shade_matches: Vec<ShadeMatch>,
    pub capture: CaptureConditions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_tones_per_season() {
        for season in [Season::Spring, Season::Summer, Season::Autumn, Season::Winter] {
            assert_eq!(ToneType::ALL.iter().filter(|t| t.season() == season).count(), 3);
        }
        assert_eq!(ToneType::DeepAutumn.undertone(), Undertone::Warm);
        assert_eq!(ToneType::SoftSummer.undertone(), Undertone::Cool);
    }
}
