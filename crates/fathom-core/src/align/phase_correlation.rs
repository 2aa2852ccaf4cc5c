use ndarray::{s, Array2, ArrayView2};
use num_complex::Complex;
use rustfft::FftPlanner;

use crate::consts::{BLOCK_CORRELATION_EPSILON, SEAM_CORRELATION_EPSILON};

/// Taper applied to each patch row before the forward transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Window {
    /// Symmetric Hann window across the row.
    Hann,
    /// Subtract the patch mean; no taper.
    MeanRemoved,
}

/// Transform length policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Padding {
    /// Trim both patches to their common width.
    None,
    /// Zero-pad to the next power of two at least twice the wider patch.
    PowerOfTwo,
}

/// How the correlation profile is searched for the shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchPolicy {
    /// Walk outward from zero over `±min(max_shift, n/4)` on the magnitude
    /// profile; a candidate must beat the running best strictly, positive
    /// shift checked before negative.
    Bracketed,
    /// Global argmax of the real profile, wrapped to a signed index and
    /// clamped to `±max_shift`.
    WrappedPeak,
}

/// Parameters for [`phase_correlate`].
#[derive(Clone, Copy, Debug)]
pub struct CorrelationSpec {
    pub window: Window,
    pub padding: Padding,
    pub search: SearchPolicy,
    /// Added to the cross-power magnitude before normalization.
    pub epsilon: f64,
    pub max_shift: usize,
}

impl CorrelationSpec {
    /// Whole-row correlation used between paired pings of two channels.
    pub fn block(max_shift: usize) -> Self {
        Self {
            window: Window::Hann,
            padding: Padding::None,
            search: SearchPolicy::Bracketed,
            epsilon: BLOCK_CORRELATION_EPSILON,
            max_shift,
        }
    }

    /// Seam-edge correlation used between the halves of a merged ping.
    pub fn seam(max_shift: usize) -> Self {
        Self {
            window: Window::MeanRemoved,
            padding: Padding::PowerOfTwo,
            search: SearchPolicy::WrappedPeak,
            epsilon: SEAM_CORRELATION_EPSILON,
            max_shift,
        }
    }
}

/// Result of a phase correlation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Correlation {
    /// Signed shift of `a` relative to `b`. A `b` displaced `d` samples to
    /// the right of `a` yields `-d`.
    pub shift: i64,
    /// Profile value at `shift` over the profile maximum, in [0, 1].
    pub score: f64,
}

/// Estimate the horizontal shift between two patches.
///
/// Each row is transformed independently and the per-row correlation
/// profiles are averaged, so a one-row patch is plain 1-D phase correlation.
/// Degenerate inputs return a zero shift with zero score.
pub fn phase_correlate(
    a: ArrayView2<'_, f32>,
    b: ArrayView2<'_, f32>,
    spec: &CorrelationSpec,
) -> Correlation {
    let rows = a.nrows().min(b.nrows());
    if rows == 0 || a.ncols() == 0 || b.ncols() == 0 {
        return Correlation::default();
    }

    let n = match spec.padding {
        Padding::None => a.ncols().min(b.ncols()),
        Padding::PowerOfTwo => (a.ncols().max(b.ncols()) * 2).next_power_of_two(),
    };
    if n < 2 {
        return Correlation::default();
    }

    let pa = prepare(a, rows, n, spec.window);
    let pb = prepare(b, rows, n, spec.window);
    let profile = correlation_profile(&pa, &pb, spec);

    if !profile.iter().any(|v| v.is_finite()) {
        return Correlation::default();
    }

    let shift = match spec.search {
        SearchPolicy::Bracketed => bracketed_search(&profile, spec.max_shift),
        SearchPolicy::WrappedPeak => wrapped_peak(&profile, spec.max_shift),
    };
    Correlation {
        shift,
        score: peak_score(&profile, shift),
    }
}

/// Symmetric Hann window of length `n` (`N - 1` denominator).
pub fn hann_window(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![1.0];
    }
    let denom = (n - 1) as f64;
    (0..n)
        .map(|i| 0.5 - 0.5 * (std::f64::consts::TAU * i as f64 / denom).cos())
        .collect()
}

/// Copy the first `rows` rows into an `n`-wide buffer, trimming or
/// zero-padding on the right, and apply the window.
fn prepare(src: ArrayView2<'_, f32>, rows: usize, n: usize, window: Window) -> Array2<f64> {
    let cols = src.ncols().min(n);
    let mut out = Array2::<f64>::zeros((rows, n));

    match window {
        Window::Hann => {
            let taper = hann_window(n);
            for row in 0..rows {
                for col in 0..cols {
                    out[[row, col]] = src[[row, col]] as f64 * taper[col];
                }
            }
        }
        Window::MeanRemoved => {
            let patch = src.slice(s![..rows, ..]);
            let mean = patch.iter().map(|&v| v as f64).sum::<f64>() / patch.len() as f64;
            for row in 0..rows {
                for col in 0..cols {
                    out[[row, col]] = src[[row, col]] as f64 - mean;
                }
            }
        }
    }

    out
}

/// Row-averaged inverse transform of the normalized cross-power spectrum.
fn correlation_profile(a: &Array2<f64>, b: &Array2<f64>, spec: &CorrelationSpec) -> Vec<f64> {
    let (rows, n) = a.dim();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let ifft = planner.plan_fft_inverse(n);

    let mut profile = vec![0.0f64; n];
    let scale = 1.0 / n as f64;

    for row in 0..rows {
        let mut fa: Vec<Complex<f64>> = a.row(row).iter().map(|&v| Complex::new(v, 0.0)).collect();
        let mut fb: Vec<Complex<f64>> = b.row(row).iter().map(|&v| Complex::new(v, 0.0)).collect();
        fft.process(&mut fa);
        fft.process(&mut fb);

        let mut cross: Vec<Complex<f64>> = fa
            .iter()
            .zip(&fb)
            .map(|(x, y)| {
                let c = x * y.conj();
                c / (c.norm() + spec.epsilon)
            })
            .collect();
        ifft.process(&mut cross);

        for (acc, c) in profile.iter_mut().zip(&cross) {
            let c = *c * scale;
            *acc += match spec.search {
                SearchPolicy::Bracketed => c.norm(),
                SearchPolicy::WrappedPeak => c.re,
            };
        }
    }

    for v in profile.iter_mut() {
        *v /= rows as f64;
    }
    profile
}

fn bracketed_search(profile: &[f64], max_shift: usize) -> i64 {
    let n = profile.len();
    let range = max_shift.min(n / 4);

    let mut best_shift = 0i64;
    let mut best_score = profile[0];
    for s in 1..=range {
        if profile[s] > best_score {
            best_score = profile[s];
            best_shift = s as i64;
        }
        let neg = n - s;
        if profile[neg] > best_score {
            best_score = profile[neg];
            best_shift = -(s as i64);
        }
    }
    best_shift
}

fn wrapped_peak(profile: &[f64], max_shift: usize) -> i64 {
    let n = profile.len();
    let mut peak = 0usize;
    let mut best = f64::NEG_INFINITY;
    for (i, &v) in profile.iter().enumerate() {
        if v.is_finite() && v > best {
            best = v;
            peak = i;
        }
    }

    let signed = if peak > n / 2 {
        peak as i64 - n as i64
    } else {
        peak as i64
    };
    signed.clamp(-(max_shift as i64), max_shift as i64)
}

fn peak_score(profile: &[f64], shift: i64) -> f64 {
    let n = profile.len() as i64;
    let max = profile
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if max.is_nan() || max <= 0.0 {
        return 0.0;
    }
    let value = profile[shift.rem_euclid(n) as usize];
    if value.is_finite() {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn hann_endpoints_are_zero() {
        let w = hann_window(9);
        assert!(w[0].abs() < 1e-12);
        assert!(w[8].abs() < 1e-12);
        assert!((w[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_patches_are_degenerate() {
        let empty = Array2::<f32>::zeros((0, 16));
        let c = phase_correlate(empty.view(), empty.view(), &CorrelationSpec::seam(8));
        assert_eq!(c, Correlation::default());
    }

    #[test]
    fn wrapped_peak_clamps_to_max_shift() {
        let mut profile = vec![0.0; 64];
        profile[20] = 1.0;
        assert_eq!(wrapped_peak(&profile, 5), 5);
        profile[20] = 0.0;
        profile[50] = 1.0;
        assert_eq!(wrapped_peak(&profile, 5), -5);
    }

    #[test]
    fn bracketed_search_prefers_positive_on_tie() {
        let mut profile = vec![0.0; 64];
        profile[3] = 1.0;
        profile[61] = 1.0;
        assert_eq!(bracketed_search(&profile, 10), 3);
    }
}
