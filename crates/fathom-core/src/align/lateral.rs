//! Seam detection and lateral alignment for merged pings.
//!
//! A merged ping strip holds both channels side by side. The seam between
//! them is normally the darkest column band near the middle; the halves are
//! re-registered by correlating the columns closest to that seam.

use ndarray::{s, Array2, ArrayView2, Axis};

use crate::consts::{
    DEFAULT_MAX_ALIGN_SHIFT, MIN_HALF_WIDTH, MIN_SEAM_PATCH, MIN_VALLEY_COLUMNS,
    MIN_VALLEY_KERNEL, SEAM_PATCH_PX, VALLEY_EDGE_FRACTION, VALLEY_KERNEL_DIVISOR,
    VALLEY_SEARCH_HI, VALLEY_SEARCH_LO,
};
use crate::record::PixelShift;

use super::phase_correlation::{phase_correlate, CorrelationSpec};

/// A strip cut into its two channel halves.
#[derive(Clone, Debug)]
pub struct SeamSplit {
    pub left: Array2<u8>,
    pub right: Array2<u8>,
    /// Column index where the right half starts.
    pub seam: usize,
}

/// Orientation and search options for [`align_join`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinOptions {
    /// Mirror the right half horizontally before joining.
    pub flip_right: bool,
    /// Exchange the halves before joining.
    pub swap_lr: bool,
    pub max_shift: usize,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            flip_right: true,
            swap_lr: false,
            max_shift: DEFAULT_MAX_ALIGN_SHIFT,
        }
    }
}

/// Output of [`align_join`].
#[derive(Clone, Debug)]
pub struct LateralJoin {
    pub image: Array2<u8>,
    pub shift: PixelShift,
    pub score: f64,
}

/// Split at the middle column.
pub fn split_mid(strip: &Array2<u8>) -> SeamSplit {
    let w = strip.ncols();
    let mid = (w / 2).max(1).min(w);
    split_at(strip, mid)
}

/// Split at the darkest smoothed column in the central band.
///
/// Returns `None` when the strip is too narrow, the valley falls in the
/// outer band, or either half would be narrower than [`MIN_HALF_WIDTH`].
pub fn auto_split_valley(strip: &Array2<u8>) -> Option<SeamSplit> {
    let w = strip.ncols();
    if w < MIN_VALLEY_COLUMNS || strip.nrows() == 0 {
        return None;
    }

    let columns: Vec<f64> = strip
        .map(|&v| v as f64)
        .mean_axis(Axis(0))?
        .to_vec();
    let kernel = MIN_VALLEY_KERNEL.max(w / VALLEY_KERNEL_DIVISOR);
    let smoothed = box_filter_same(&columns, kernel);

    let lo = (w as f64 * VALLEY_SEARCH_LO) as usize;
    let hi = (w as f64 * VALLEY_SEARCH_HI) as usize;
    let mut idx = lo;
    for i in lo..hi {
        if smoothed[i] < smoothed[idx] {
            idx = i;
        }
    }

    let edge_lo = (w as f64 * VALLEY_EDGE_FRACTION) as usize;
    let edge_hi = (w as f64 * (1.0 - VALLEY_EDGE_FRACTION)) as usize;
    if idx < edge_lo || idx > edge_hi {
        return None;
    }
    if idx < MIN_HALF_WIDTH || w - idx < MIN_HALF_WIDTH {
        return None;
    }
    Some(split_at(strip, idx))
}

fn split_at(strip: &Array2<u8>, col: usize) -> SeamSplit {
    SeamSplit {
        left: strip.slice(s![.., ..col]).to_owned(),
        right: strip.slice(s![.., col..]).to_owned(),
        seam: col,
    }
}

/// Moving average with zero-padded ends, output centered like a "same"
/// convolution (even kernels lean one sample to the left).
fn box_filter_same(values: &[f64], kernel: usize) -> Vec<f64> {
    let n = values.len() as isize;
    let k = kernel as isize;
    let offset = (k - 1) / 2;
    (0..n)
        .map(|i| {
            let end = i + offset;
            let start = end - (k - 1);
            let sum: f64 = (start.max(0)..=end.min(n - 1))
                .map(|t| values[t as usize])
                .sum();
            sum / k as f64
        })
        .collect()
}

/// Crop or zero-pad on the right to exactly `width` columns.
pub fn fit_half_width(img: &Array2<u8>, width: usize) -> Array2<u8> {
    let (h, w) = img.dim();
    if w == width {
        return img.clone();
    }
    if w > width {
        return img.slice(s![.., ..width]).to_owned();
    }
    let mut out = Array2::<u8>::zeros((h, width));
    out.slice_mut(s![.., ..w]).assign(img);
    out
}

/// Apply flip/swap options and fit both halves to `half_width`.
pub fn orient_halves(
    left: &Array2<u8>,
    right: &Array2<u8>,
    options: &JoinOptions,
    half_width: usize,
) -> (Array2<u8>, Array2<u8>) {
    let right = if options.flip_right {
        right.slice(s![.., ..;-1]).to_owned()
    } else {
        right.clone()
    };
    let (left, right) = if options.swap_lr {
        (right, left.clone())
    } else {
        (left.clone(), right)
    };
    (
        fit_half_width(&left, half_width),
        fit_half_width(&right, half_width),
    )
}

/// Lateral shift between two oriented halves, measured at the seam.
///
/// Only the middle third of the rows and the innermost [`SEAM_PATCH_PX`]
/// columns of each half (the left half's trailing edge, the right half's
/// leading edge) are compared. Fewer than [`MIN_SEAM_PATCH`] rows or
/// columns gives `(0, 0.0)`.
pub fn seam_shift(left: &Array2<u8>, right: &Array2<u8>, max_shift: usize) -> (PixelShift, f64) {
    let h = left.nrows().min(right.nrows());
    let (wl, wr) = (left.ncols(), right.ncols());
    if h < MIN_SEAM_PATCH || wl < MIN_SEAM_PATCH || wr < MIN_SEAM_PATCH {
        return (PixelShift(0), 0.0);
    }

    let band = h / 3..(2 * h / 3);
    let a = to_f32(left.slice(s![band.clone(), wl - SEAM_PATCH_PX.min(wl)..]));
    let b = to_f32(right.slice(s![band, ..SEAM_PATCH_PX.min(wr)]));

    let bound = max_shift.min(wl.min(wr));
    let corr = phase_correlate(a.view(), b.view(), &CorrelationSpec::seam(bound));
    (PixelShift(corr.shift), corr.score)
}

fn to_f32(view: ArrayView2<'_, u8>) -> Array2<f32> {
    view.mapv(|v| v as f32)
}

/// Delay one half by `shift` columns: zeros enter on its leading edge and
/// the same number of columns drop off its trailing edge. Positive shifts
/// move the left half, negative shifts the right half.
pub fn apply_shift(
    left: Array2<u8>,
    right: Array2<u8>,
    shift: PixelShift,
) -> (Array2<u8>, Array2<u8>) {
    match shift.0 {
        s if s > 0 => (delay_columns(&left, s as usize), right),
        s if s < 0 => (left, delay_columns(&right, s.unsigned_abs() as usize)),
        _ => (left, right),
    }
}

fn delay_columns(img: &Array2<u8>, by: usize) -> Array2<u8> {
    let (h, w) = img.dim();
    let by = by.min(w);
    let mut out = Array2::<u8>::zeros((h, w));
    out.slice_mut(s![.., by..]).assign(&img.slice(s![.., ..w - by]));
    out
}

/// Concatenate two halves side by side. Row counts must match.
pub fn hstack(left: &Array2<u8>, right: &Array2<u8>) -> Array2<u8> {
    let h = left.nrows().min(right.nrows());
    let (wl, wr) = (left.ncols(), right.ncols());
    let mut out = Array2::<u8>::zeros((h, wl + wr));
    out.slice_mut(s![.., ..wl]).assign(&left.slice(s![..h, ..]));
    out.slice_mut(s![.., wl..]).assign(&right.slice(s![..h, ..]));
    out
}

/// Orient, measure, shift and join two halves of a merged ping.
pub fn align_join(
    left: &Array2<u8>,
    right: &Array2<u8>,
    options: &JoinOptions,
    half_width: usize,
) -> LateralJoin {
    let (l, r) = orient_halves(left, right, options, half_width);
    let (shift, score) = seam_shift(&l, &r, options.max_shift);
    let (l, r) = apply_shift(l, r, shift);
    LateralJoin {
        image: hstack(&l, &r),
        shift,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_filter_matches_same_convolution() {
        let values = [0.0, 0.0, 9.0, 0.0, 0.0];
        let out = box_filter_same(&values, 3);
        assert_eq!(out, vec![0.0, 3.0, 3.0, 3.0, 0.0]);
    }

    #[test]
    fn delay_pads_leading_edge() {
        let img = Array2::from_shape_vec((1, 4), vec![1u8, 2, 3, 4]).unwrap();
        let out = delay_columns(&img, 1);
        assert_eq!(out.row(0).to_vec(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn fit_pads_on_the_right() {
        let img = Array2::from_elem((2, 3), 9u8);
        let out = fit_half_width(&img, 5);
        assert_eq!(out.row(0).to_vec(), vec![9, 9, 9, 0, 0]);
        assert_eq!(fit_half_width(&img, 2).ncols(), 2);
    }
}
