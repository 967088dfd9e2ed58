//! Joint/axis similarity scoring.
//!
//! The raw score is `1 - MAE` between the aligned curves. It is then bent
//! through a piecewise power curve: near-perfect motion is squared,
//! mediocre motion cubed, and anything worse raised to the fourth power.

use crate::align::AlignedPair;

/// Lowest raw score that is squared.
pub const SQUARE_FLOOR: f64 = 0.80;

/// Lowest raw score that is cubed. Below this the quartic applies.
pub const CUBE_FLOOR: f64 = 0.70;

/// Mean absolute element-wise difference of two equal-length curves.
pub fn mean_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return 0.0;
    }
    let total: f64 = a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum();
    total / a.len() as f64
}

/// `1 - MAE` of an aligned pair. Negative when the curves differ by more than 1 on average.
pub fn raw_score(pair: &AlignedPair) -> f64 {
    1.0 - mean_abs_diff(&pair.reference, &pair.user)
}

/// Nonlinear penalty curve applied to a raw score.
///
/// - `[0.80, 1.0]` → `raw²`
/// - `[0.70, 0.80)` → `raw³`
/// - everything else, negatives included → `raw⁴`
pub fn score_transform(raw: f64) -> f64 {
    if (SQUARE_FLOOR..=1.0).contains(&raw) {
        raw.powi(2)
    } else if (CUBE_FLOOR..SQUARE_FLOOR).contains(&raw) {
        raw.powi(3)
    } else {
        raw.powi(4)
    }
}

/// Final similarity score of an aligned pair.
pub fn score_aligned(pair: &AlignedPair) -> f64 {
    score_transform(raw_score(pair))
}
