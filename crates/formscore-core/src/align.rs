//! Sequence alignment onto a shared normalized time axis.
//!
//! Reference and user recordings differ in length, duration and frame rate.
//! Each curve is stretched onto `t ∈ [0, 1]` and resampled at a fixed
//! resolution, so the comparison measures the shape of the motion rather
//! than its absolute timing.

use crate::error::{CurveRole, FormScoreError, FormScoreResult};

/// Number of samples both curves are resampled to.
pub const RESAMPLE_POINTS: usize = 1000;

/// Reference and user curves on the same time grid.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    pub reference: Vec<f64>,
    pub user: Vec<f64>,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }
}

/// `n` evenly spaced points spanning `[0, 1]` inclusive.
pub fn normalized_time_axis(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (n - 1) as f64;
            (0..n).map(|i| i as f64 / last).collect()
        }
    }
}

/// Piecewise-linear interpolation over a curve sampled uniformly on `[0, 1]`.
///
/// Sample `i` of a curve with `len` samples sits at `t = i / (len - 1)`.
#[derive(Debug, Clone, Copy)]
pub struct LinearInterpolator<'a> {
    values: &'a [f64],
}

impl<'a> LinearInterpolator<'a> {
    /// Returns `None` when the curve has fewer than two samples.
    pub fn new(values: &'a [f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        Some(Self { values })
    }

    /// Interpolated value at normalized time `t`, clamped to `[0, 1]`.
    pub fn eval(&self, t: f64) -> f64 {
        let segments = self.values.len() - 1;
        let pos = t.clamp(0.0, 1.0) * segments as f64;
        let idx = (pos.floor() as usize).min(segments - 1);
        let frac = pos - idx as f64;

        let lo = self.values[idx];
        let hi = self.values[idx + 1];
        lo + frac * (hi - lo)
    }

    /// Evaluate at every point of `grid`.
    pub fn sample(&self, grid: &[f64]) -> Vec<f64> {
        grid.iter().map(|&t| self.eval(t)).collect()
    }
}

/// Resample a curve onto `points` evenly spaced normalized times.
pub fn resample(values: &[f64], points: usize, role: CurveRole) -> FormScoreResult<Vec<f64>> {
    let interp =
        LinearInterpolator::new(values).ok_or(FormScoreError::alignment(role, values.len()))?;
    Ok(interp.sample(&normalized_time_axis(points)))
}

/// Align a reference curve and a user curve on the common time axis.
///
/// Both curves need at least two samples. Single-sample curves are rejected
/// rather than clamped to a constant.
pub fn align(reference: &[f64], user: &[f64]) -> FormScoreResult<AlignedPair> {
    Ok(AlignedPair {
        reference: resample(reference, RESAMPLE_POINTS, CurveRole::Reference)?,
        user: resample(user, RESAMPLE_POINTS, CurveRole::User)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_time_axis_endpoints() {
        let axis = normalized_time_axis(RESAMPLE_POINTS);
        assert_eq!(axis.len(), 1000);
        assert_eq!(axis[0], 0.0);
        assert_eq!(axis[999], 1.0);
        assert_eq!(normalized_time_axis(1), vec![0.0]);
        assert!(normalized_time_axis(0).is_empty());
    }

    #[test]
    fn test_interpolator_hits_samples_and_midpoints() {
        let values = [0.0, 1.0, 0.5];
        let interp = LinearInterpolator::new(&values).unwrap();

        assert_abs_diff_eq!(interp.eval(0.0), 0.0);
        assert_abs_diff_eq!(interp.eval(0.5), 1.0);
        assert_abs_diff_eq!(interp.eval(1.0), 0.5);
        assert_abs_diff_eq!(interp.eval(0.25), 0.5);
        assert_abs_diff_eq!(interp.eval(0.75), 0.75);
    }

    #[test]
    fn test_interpolator_clamps_outside_range() {
        let values = [2.0, 4.0];
        let interp = LinearInterpolator::new(&values).unwrap();
        assert_abs_diff_eq!(interp.eval(-0.5), 2.0);
        assert_abs_diff_eq!(interp.eval(1.5), 4.0);
    }

    #[test]
    fn test_align_unequal_lengths_gives_equal_lengths() {
        let reference: Vec<f64> = (0..50).map(|i| i as f64 / 49.0).collect();
        let user: Vec<f64> = (0..200).map(|i| i as f64 / 199.0).collect();

        let forward = align(&reference, &user).unwrap();
        assert_eq!(forward.reference.len(), RESAMPLE_POINTS);
        assert_eq!(forward.user.len(), RESAMPLE_POINTS);

        let backward = align(&user, &reference).unwrap();
        assert_eq!(backward.len(), RESAMPLE_POINTS);

        // same ramp, so the resampled curves coincide
        for (r, u) in forward.reference.iter().zip(&forward.user) {
            assert_abs_diff_eq!(*r, *u, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_single_sample_curves_are_rejected() {
        let err = align(&[0.5], &[0.1, 0.2]).unwrap_err();
        assert!(matches!(
            err,
            FormScoreError::Alignment {
                curve: CurveRole::Reference,
                len: 1,
                ..
            }
        ));

        let err = align(&[0.1, 0.2], &[0.5]).unwrap_err();
        assert!(matches!(
            err,
            FormScoreError::Alignment {
                curve: CurveRole::User,
                len: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_curve_is_rejected() {
        assert!(matches!(
            align(&[], &[0.1, 0.2]),
            Err(FormScoreError::Alignment { len: 0, .. })
        ));
    }
}
