use super::confidence;
use crate::color::Lab;
use crate::pipeline::domain::personal_color::{ToneType, Undertone};
use crate::pipeline::domain::zones::{FaceZone, ZoneMetrics, ZoneMetricsMap};

/// Hue at or above which (up to `COOL_HUE_WRAP`) skin reads warm.
pub const WARM_HUE: f64 = 55.0;
/// Bluish hues are never warm.
pub const COOL_HUE_WRAP: f64 = 180.0;
pub const LIGHT_L: f64 = 65.0;
pub const DEEP_L_BELOW: f64 = 50.0;
/// Splits the middle value band into light-leaning and deep-leaning tones.
pub const MID_L_SPLIT: f64 = 57.5;
pub const BRIGHT_CHROMA: f64 = 24.0;
pub const SOFT_CHROMA_BELOW: f64 = 16.0;

const HUE_CERTAIN_MARGIN: f64 = 15.0;
const LIGHTNESS_CERTAIN_MARGIN: f64 = 7.5;
const CHROMA_CERTAIN_MARGIN: f64 = 4.0;

/// Zones sampled for skin tone: cheeks and central forehead avoid shadows and hair.
pub const TONE_ZONES: [FaceZone; 3] = [
    FaceZone::LeftCheek,
    FaceZone::RightCheek,
    FaceZone::ForeheadCenter,
];

pub fn undertone(lab: &Lab) -> Undertone {
    let hue = lab.hue_degrees();
    if (WARM_HUE..COOL_HUE_WRAP).contains(&hue) {
        Undertone::Warm
    } else {
        Undertone::Cool
    }
}

/// Value (L*) is decided before chroma: very light or very deep skin is
/// Light/Deep whatever its chroma.
pub fn classify(lab: &Lab) -> ToneType {
    let l = lab.l;
    let c = lab.chroma();
    match undertone(lab) {
        Undertone::Warm => {
            if l >= LIGHT_L {
                ToneType::LightSpring
            } else if l < DEEP_L_BELOW {
                ToneType::DeepAutumn
            } else if c >= BRIGHT_CHROMA {
                ToneType::BrightSpring
            } else if c < SOFT_CHROMA_BELOW {
                ToneType::SoftAutumn
            } else if l >= MID_L_SPLIT {
                ToneType::TrueSpring
            } else {
                ToneType::TrueAutumn
            }
        }
        Undertone::Cool => {
            if l >= LIGHT_L {
                ToneType::LightSummer
            } else if l < DEEP_L_BELOW {
                ToneType::DeepWinter
            } else if c >= BRIGHT_CHROMA {
                ToneType::BrightWinter
            } else if c < SOFT_CHROMA_BELOW {
                ToneType::SoftSummer
            } else if l >= MID_L_SPLIT {
                ToneType::TrueSummer
            } else {
                ToneType::TrueWinter
            }
        }
    }
}

/// Normalized distance to the nearest decision boundary that mattered.
pub fn tone_confidence(lab: &Lab) -> f64 {
    let hue = lab.hue_degrees();
    let hue_margin = (hue - WARM_HUE).abs().min((hue - COOL_HUE_WRAP).abs());
    let mut certainty = confidence::from_margin(hue_margin, HUE_CERTAIN_MARGIN);

    let l = lab.l;
    let c = lab.chroma();
    let l_margin = (l - LIGHT_L).abs().min((l - DEEP_L_BELOW).abs());
    certainty = certainty.min(confidence::from_margin(l_margin, LIGHTNESS_CERTAIN_MARGIN));

    // Chroma and the mid split only decide within the middle value band.
    if (DEEP_L_BELOW..LIGHT_L).contains(&l) {
        let c_margin = (c - BRIGHT_CHROMA).abs().min((c - SOFT_CHROMA_BELOW).abs());
        certainty = certainty.min(confidence::from_margin(c_margin, CHROMA_CERTAIN_MARGIN));
        if (SOFT_CHROMA_BELOW..BRIGHT_CHROMA).contains(&c) {
            certainty = certainty.min(confidence::from_margin(
                l - MID_L_SPLIT,
                LIGHTNESS_CERTAIN_MARGIN / 2.0,
            ));
        }
    }
    certainty
}

/// Mean Lab of the tone zones that were measured.
pub fn skin_tone(metrics: &ZoneMetricsMap) -> Option<Lab> {
    ZoneMetrics::average(TONE_ZONES.iter().filter_map(|zone| metrics.get(zone))).map(|m| m.mean_lab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::services::zones::face::tests::metrics_with;

    /// Lab with the given lightness, chroma and hue.
    fn lch(l: f64, c: f64, h: f64) -> Lab {
        let radians = h.to_radians();
        Lab::new(l, c * radians.cos(), c * radians.sin())
    }

    #[test]
    fn undertone_switches_at_warm_hue() {
        assert_eq!(undertone(&lch(60.0, 20.0, 55.01)), Undertone::Warm);
        assert_eq!(undertone(&lch(60.0, 20.0, 54.9)), Undertone::Cool);
        assert_eq!(undertone(&lch(60.0, 20.0, 200.0)), Undertone::Cool);
    }

    #[test]
    fn value_bands() {
        assert_eq!(classify(&lch(65.0, 30.0, 60.0)), ToneType::LightSpring);
        assert_eq!(classify(&lch(49.9, 10.0, 60.0)), ToneType::DeepAutumn);
        assert_eq!(classify(&lch(50.0, 20.0, 40.0)), ToneType::TrueWinter);
        assert_eq!(classify(&lch(70.0, 20.0, 40.0)), ToneType::LightSummer);
        assert_eq!(classify(&lch(45.0, 20.0, 40.0)), ToneType::DeepWinter);
    }

    #[test]
    fn chroma_bands() {
        assert_eq!(classify(&lch(60.0, 24.01, 60.0)), ToneType::BrightSpring);
        assert_eq!(classify(&lch(60.0, 15.9, 60.0)), ToneType::SoftAutumn);
        assert_eq!(classify(&lch(60.0, 24.01, 40.0)), ToneType::BrightWinter);
        assert_eq!(classify(&lch(60.0, 15.9, 40.0)), ToneType::SoftSummer);
    }

    #[test]
    fn middle_band_splits_on_lightness() {
        assert_eq!(classify(&lch(57.5, 20.0, 60.0)), ToneType::TrueSpring);
        assert_eq!(classify(&lch(57.4, 20.0, 60.0)), ToneType::TrueAutumn);
        assert_eq!(classify(&lch(58.0, 20.0, 40.0)), ToneType::TrueSummer);
    }

    #[test]
    fn every_tone_is_reachable() {
        let mut seen = std::collections::HashSet::new();
        for l in [45.0, 53.0, 60.0, 70.0] {
            for c in [10.0, 20.0, 30.0] {
                for h in [30.0, 70.0] {
                    seen.insert(classify(&lch(l, c, h)));
                }
            }
        }
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn confidence_drops_near_boundaries() {
        let centered = tone_confidence(&lch(80.0, 20.0, 75.0));
        let borderline = tone_confidence(&lch(80.0, 20.0, 56.0));
        assert!(centered > borderline);
        assert!((0.0..=100.0).contains(&borderline));
        assert_eq!(tone_confidence(&lch(65.0, 20.0, 75.0)), 0.0);
    }

    #[test]
    fn skin_tone_uses_cheeks_and_forehead() {
        let mut metrics = ZoneMetricsMap::new();
        metrics.insert(FaceZone::Chin, metrics_with(0.0, 0.0, 0.0));
        assert_eq!(skin_tone(&metrics), None);
        metrics.insert(FaceZone::LeftCheek, metrics_with(0.0, 0.0, 0.0));
        assert_eq!(skin_tone(&metrics), Some(Lab::new(65.0, 12.0, 16.0)));
    }
}
