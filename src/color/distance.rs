//! CIE76 and CIEDE2000 color difference.
//!
//! CIEDE2000 follows the computation order in Sharma, Wu & Dalal (2005),
//! including the hue-mean and hue-difference conventions for achromatic
//! pairs and for hue angles straddling 0°.

#![allow(clippy::many_single_char_names)]

use super::types::Lab;

/// 25^7
const POW25_7: f64 = 6_103_515_625.0;

/// Parametric weighting factors kL, kC, kH.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricFactors {
    pub k_l: f64,
    pub k_c: f64,
    pub k_h: f64,
}

impl Default for ParametricFactors {
    fn default() -> Self {
        Self {
            k_l: 1.0,
            k_c: 1.0,
            k_h: 1.0,
        }
    }
}

/// Euclidean distance in Lab.
pub fn cie76(lab1: Lab, lab2: Lab) -> f64 {
    let dl = lab1.l - lab2.l;
    let da = lab1.a - lab2.a;
    let db = lab1.b - lab2.b;
    (dl * dl + da * da + db * db).sqrt()
}

pub fn ciede2000(lab1: Lab, lab2: Lab) -> f64 {
    ciede2000_with_weights(lab1, lab2, ParametricFactors::default())
}

fn hue_prime(b: f64, a_prime: f64) -> f64 {
    if b == 0.0 && a_prime == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a_prime).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

pub fn ciede2000_with_weights(lab1: Lab, lab2: Lab, factors: ParametricFactors) -> f64 {
    // Step 1: C'_i, h'_i
    let c1_ab = lab1.a.hypot(lab1.b);
    let c2_ab = lab2.a.hypot(lab2.b);
    let c_ab_mean = (c1_ab + c2_ab) / 2.0;
    let c_ab_mean_pow7 = c_ab_mean.powi(7);
    let g = 0.5 * (1.0 - (c_ab_mean_pow7 / (c_ab_mean_pow7 + POW25_7)).sqrt());

    let a1_prime = (1.0 + g) * lab1.a;
    let a2_prime = (1.0 + g) * lab2.a;

    let c1_prime = a1_prime.hypot(lab1.b);
    let c2_prime = a2_prime.hypot(lab2.b);

    let h1_prime = hue_prime(lab1.b, a1_prime);
    let h2_prime = hue_prime(lab2.b, a2_prime);

    // Step 2: ΔL', ΔC', ΔH'
    let delta_l_prime = lab2.l - lab1.l;
    let delta_c_prime = c2_prime - c1_prime;

    let c_product = c1_prime * c2_prime;
    let delta_h_prime = if c_product == 0.0 {
        0.0
    } else {
        let diff = h2_prime - h1_prime;
        if diff.abs() <= 180.0 {
            diff
        } else if diff > 180.0 {
            diff - 360.0
        } else {
            diff + 360.0
        }
    };
    let delta_big_h_prime =
        2.0 * c_product.sqrt() * (delta_h_prime.to_radians() / 2.0).sin();

    // Step 3: weighting functions
    let l_prime_mean = (lab1.l + lab2.l) / 2.0;
    let c_prime_mean = (c1_prime + c2_prime) / 2.0;

    let h_prime_mean = if c_product == 0.0 {
        h1_prime + h2_prime
    } else if (h1_prime - h2_prime).abs() <= 180.0 {
        (h1_prime + h2_prime) / 2.0
    } else if h1_prime + h2_prime < 360.0 {
        (h1_prime + h2_prime + 360.0) / 2.0
    } else {
        (h1_prime + h2_prime - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_prime_mean - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_prime_mean).to_radians().cos()
        + 0.32 * (3.0 * h_prime_mean + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_prime_mean - 63.0).to_radians().cos();

    let delta_theta = 30.0 * (-((h_prime_mean - 275.0) / 25.0).powi(2)).exp();
    let c_prime_mean_pow7 = c_prime_mean.powi(7);
    let r_c = 2.0 * (c_prime_mean_pow7 / (c_prime_mean_pow7 + POW25_7)).sqrt();

    let l_offset_sq = (l_prime_mean - 50.0).powi(2);
    let s_l = 1.0 + (0.015 * l_offset_sq) / (20.0 + l_offset_sq).sqrt();
    let s_c = 1.0 + 0.045 * c_prime_mean;
    let s_h = 1.0 + 0.015 * c_prime_mean * t;
    let r_t = -(2.0 * delta_theta).to_radians().sin() * r_c;

    let l_term = delta_l_prime / (factors.k_l * s_l);
    let c_term = delta_c_prime / (factors.k_c * s_c);
    let h_term = delta_big_h_prime / (factors.k_h * s_h);

    (l_term * l_term + c_term * c_term + h_term * h_term + r_t * c_term * h_term).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sharma, Wu & Dalal (2005), Table 1.
    const SHARMA_PAIRS: [([f64; 3], [f64; 3], f64); 34] = [
        ([50.0000, 2.6772, -79.7751], [50.0000, 0.0000, -82.7485], 2.0425),
        ([50.0000, 3.1571, -77.2803], [50.0000, 0.0000, -82.7485], 2.8615),
        ([50.0000, 2.8361, -74.0200], [50.0000, 0.0000, -82.7485], 3.4412),
        ([50.0000, -1.3802, -84.2814], [50.0000, 0.0000, -82.7485], 1.0000),
        ([50.0000, -1.1848, -84.8006], [50.0000, 0.0000, -82.7485], 1.0000),
        ([50.0000, -0.9009, -85.5211], [50.0000, 0.0000, -82.7485], 1.0000),
        ([50.0000, 0.0000, 0.0000], [50.0000, -1.0000, 2.0000], 2.3669),
        ([50.0000, -1.0000, 2.0000], [50.0000, 0.0000, 0.0000], 2.3669),
        ([50.0000, 2.4900, -0.0010], [50.0000, -2.4900, 0.0009], 7.1792),
        ([50.0000, 2.4900, -0.0010], [50.0000, -2.4900, 0.0010], 7.1792),
        ([50.0000, 2.4900, -0.0010], [50.0000, -2.4900, 0.0011], 7.2195),
        ([50.0000, 2.4900, -0.0010], [50.0000, -2.4900, 0.0012], 7.2195),
        ([50.0000, -0.0010, 2.4900], [50.0000, 0.0009, -2.4900], 4.8045),
        ([50.0000, -0.0010, 2.4900], [50.0000, 0.0010, -2.4900], 4.8045),
        ([50.0000, -0.0010, 2.4900], [50.0000, 0.0011, -2.4900], 4.7461),
        ([50.0000, 2.5000, 0.0000], [50.0000, 0.0000, -2.5000], 4.3065),
        ([50.0000, 2.5000, 0.0000], [73.0000, 25.0000, -18.0000], 27.1492),
        ([50.0000, 2.5000, 0.0000], [61.0000, -5.0000, 29.0000], 22.8977),
        ([50.0000, 2.5000, 0.0000], [56.0000, -27.0000, -3.0000], 31.9030),
        ([50.0000, 2.5000, 0.0000], [58.0000, 24.0000, 15.0000], 19.4535),
        ([50.0000, 2.5000, 0.0000], [50.0000, 3.1736, 0.5854], 1.0000),
        ([50.0000, 2.5000, 0.0000], [50.0000, 3.2972, 0.0000], 1.0000),
        ([50.0000, 2.5000, 0.0000], [50.0000, 1.8634, 0.5757], 1.0000),
        ([50.0000, 2.5000, 0.0000], [50.0000, 3.2592, 0.3350], 1.0000),
        ([60.2574, -34.0099, 36.2677], [60.4626, -34.1751, 39.4387], 1.2644),
        ([63.0109, -31.0961, -5.8663], [62.8187, -29.7946, -4.0864], 1.2630),
        ([61.2901, 3.7196, -5.3901], [61.4292, 2.2480, -4.9620], 1.8731),
        ([35.0831, -44.1164, 3.7933], [35.0232, -40.0716, 1.5901], 1.8645),
        ([22.7233, 20.0904, -46.6940], [23.0331, 14.9730, -42.5619], 2.0373),
        ([36.4612, 47.8580, 18.3852], [36.2715, 50.5065, 21.2231], 1.4146),
        ([90.8027, -2.0831, 1.4410], [91.1528, -1.6435, 0.0447], 1.4441),
        ([90.9257, -0.5406, -0.9208], [88.6381, -0.8985, -0.7239], 1.5381),
        ([6.7747, -0.2908, -2.4247], [5.8714, -0.0985, -2.2286], 0.6377),
        ([2.0776, 0.0795, -1.1350], [0.9033, -0.0636, -0.5514], 0.9082),
    ];

    fn lab(v: [f64; 3]) -> Lab {
        Lab::new(v[0], v[1], v[2])
    }

    #[test]
    fn ciede2000_matches_sharma_reference_pairs() {
        for (i, (first, second, expected)) in SHARMA_PAIRS.iter().enumerate() {
            let actual = ciede2000(lab(*first), lab(*second));
            assert!(
                (actual - expected).abs() < 1e-4,
                "pair {}: expected {}, got {}",
                i + 1,
                expected,
                actual
            );
        }
    }

    #[test]
    fn ciede2000_is_symmetric_on_reference_pairs() {
        for (first, second, _) in SHARMA_PAIRS.iter() {
            let forward = ciede2000(lab(*first), lab(*second));
            let backward = ciede2000(lab(*second), lab(*first));
            assert!((forward - backward).abs() < 1e-9);
        }
    }

    #[test]
    fn cie76_is_zero_for_identical_colors_and_symmetric() {
        let a = Lab::new(63.2, 12.1, 17.9);
        let b = Lab::new(48.0, -3.5, 30.25);
        assert_eq!(cie76(a, a), 0.0);
        assert_eq!(cie76(a, b), cie76(b, a));
        assert!((cie76(Lab::new(0.0, 0.0, 0.0), Lab::new(3.0, 4.0, 0.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn ciede2000_is_zero_for_identical_colors() {
        let a = Lab::new(63.2, 12.1, 17.9);
        assert!(ciede2000(a, a).abs() < 1e-12);
    }

    #[test]
    fn lightness_weight_scales_lightness_only_difference() {
        let a = Lab::new(40.0, 0.0, 0.0);
        let b = Lab::new(60.0, 0.0, 0.0);
        let unweighted = ciede2000(a, b);
        let weighted = ciede2000_with_weights(
            a,
            b,
            ParametricFactors {
                k_l: 2.0,
                ..ParametricFactors::default()
            },
        );
        assert!((unweighted / weighted - 2.0).abs() < 1e-9);
    }
}
