use super::glcm::GrayRegion;
use serde::{Deserialize, Serialize};

/// Clockwise from the top-left neighbour; bit 7 is the first.
const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LbpHistogram {
    /// 256 bins, normalized to sum to 1.
    pub bins: Vec<f64>,
    /// Share of codes with at most two circular 0/1 transitions.
    pub uniform_ratio: f64,
    /// Shannon entropy of the histogram in bits (0..=8).
    pub entropy: f64,
}

pub fn is_uniform(code: u8) -> bool {
    (code ^ code.rotate_left(1)).count_ones() <= 2
}

/// 8-neighbour code at (x, y); `None` unless the centre and all neighbours are in the region.
pub fn lbp_code(region: &GrayRegion, x: i64, y: i64) -> Option<u8> {
    let center = region.get(x, y)?;
    let mut code = 0u8;
    for (bit, (dx, dy)) in NEIGHBOURS.iter().enumerate() {
        let neighbour = region.get(x + dx, y + dy)?;
        if neighbour >= center {
            code |= 1 << (7 - bit);
        }
    }
    Some(code)
}

pub fn lbp_histogram(region: &GrayRegion) -> Option<LbpHistogram> {
    let mut counts = [0u64; 256];
    let mut total = 0u64;
    for y in 0..region.height() as i64 {
        for x in 0..region.width() as i64 {
            if let Some(code) = lbp_code(region, x, y) {
                counts[code as usize] += 1;
                total += 1;
            }
        }
    }
    if total == 0 {
        return None;
    }

    let bins: Vec<f64> = counts.iter().map(|c| *c as f64 / total as f64).collect();
    let uniform_ratio = counts
        .iter()
        .enumerate()
        .filter(|(code, _)| is_uniform(*code as u8))
        .map(|(_, count)| *count)
        .sum::<u64>() as f64
        / total as f64;
    let entropy = bins
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| -p * p.log2())
        .sum();

    Some(LbpHistogram {
        bins,
        uniform_ratio,
        entropy,
    })
}
