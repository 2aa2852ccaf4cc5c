//! Sliding-window compositing of merged ping strips.

use std::collections::VecDeque;

use ndarray::{s, Array2, Array3, Zip};

use crate::align::lateral::{
    apply_shift, auto_split_valley, hstack, orient_halves, seam_shift, split_mid, SeamSplit,
};
use crate::consts::{MIN_HALF_WIDTH, SEAM_MARKER_PX, SEAM_MARKER_RGB};
use crate::pipeline::config::{DisplayConfig, PreviewMode};
use crate::record::PixelShift;

/// Bounded FIFO of recent lateral shifts.
#[derive(Clone, Debug)]
pub struct ShiftHistory {
    capacity: usize,
    shifts: VecDeque<i64>,
}

impl ShiftHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            shifts: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Record a shift and return the median of the retained history.
    ///
    /// Even counts average the middle pair, truncated toward zero.
    pub fn push(&mut self, shift: PixelShift) -> PixelShift {
        self.shifts.push_back(shift.0);
        while self.shifts.len() > self.capacity {
            self.shifts.pop_front();
        }
        self.median().unwrap_or(shift)
    }

    pub fn median(&self) -> Option<PixelShift> {
        if self.shifts.is_empty() {
            return None;
        }
        let mut sorted: Vec<i64> = self.shifts.iter().copied().collect();
        sorted.sort_unstable();
        let n = sorted.len();
        let m = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            ((sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0).trunc() as i64
        };
        Some(PixelShift(m))
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }
}

/// State carried between windows of one stream.
#[derive(Clone, Debug)]
pub struct WindowState {
    /// Half width fixed by the first strip that split cleanly.
    pub half_width: Option<usize>,
    pub history: ShiftHistory,
}

impl WindowState {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            half_width: None,
            history: ShiftHistory::new(config.smooth_shift),
        }
    }
}

/// A composited image, grayscale or RGB.
#[derive(Clone, Debug, PartialEq)]
pub enum Composite {
    Gray(Array2<u8>),
    Rgb(Array3<u8>),
}

impl Composite {
    pub fn height(&self) -> usize {
        match self {
            Self::Gray(a) => a.nrows(),
            Self::Rgb(a) => a.dim().0,
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Self::Gray(a) => a.ncols(),
            Self::Rgb(a) => a.dim().1,
        }
    }

    /// Promote to RGB by replicating the gray plane.
    pub fn into_rgb(self) -> Array3<u8> {
        match self {
            Self::Rgb(a) => a,
            Self::Gray(a) => gray_to_rgb(&a),
        }
    }
}

fn gray_to_rgb(gray: &Array2<u8>) -> Array3<u8> {
    let (h, w) = gray.dim();
    Array3::from_shape_fn((h, w, 3), |(r, c, _)| gray[[r, c]])
}

/// Output of [`compose_window`]. Metadata fields carry the last non-empty
/// value seen in the window.
#[derive(Clone, Debug)]
pub struct WindowComposite {
    pub image: Composite,
    pub seam: Option<usize>,
    pub shift: Option<PixelShift>,
    pub score: Option<f64>,
}

struct StripComposite {
    image: Composite,
    seam: Option<usize>,
    shift: Option<PixelShift>,
    score: Option<f64>,
}

fn split_strip(strip: &Array2<u8>, config: &DisplayConfig) -> Option<SeamSplit> {
    let split = if config.force_split_mid {
        Some(split_mid(strip))
    } else if config.auto_split {
        auto_split_valley(strip)
    } else {
        None
    }?;
    if split.left.ncols().min(split.right.ncols()) < MIN_HALF_WIDTH {
        return None;
    }
    Some(split)
}

fn compose_strip(
    strip: &Array2<u8>,
    config: &DisplayConfig,
    state: &mut WindowState,
) -> StripComposite {
    let Some(split) = split_strip(strip, config) else {
        return StripComposite {
            image: Composite::Gray(strip.clone()),
            seam: None,
            shift: None,
            score: None,
        };
    };

    let half = *state
        .half_width
        .get_or_insert(split.left.ncols().min(split.right.ncols()));
    let options = config.join_options();
    let (left, right) = orient_halves(&split.left, &split.right, &options, half);

    let (shift, score) = if config.align_channels {
        let (raw, score) = seam_shift(&left, &right, options.max_shift);
        let applied = if config.smooth_shift > 1 {
            state.history.push(raw)
        } else {
            raw
        };
        (Some(applied), Some(score))
    } else {
        (None, None)
    };

    let (left, right) = apply_shift(left, right, shift.unwrap_or_default());
    let image = match config.preview_mode {
        PreviewMode::Compose => Composite::Gray(hstack(&left, &right)),
        PreviewMode::Overlay => Composite::Rgb(overlay(&left, &right)),
        PreviewMode::Difference => Composite::Rgb(gray_to_rgb(&difference(&left, &right))),
    };

    StripComposite {
        image,
        seam: Some(split.seam),
        shift,
        score,
    }
}

/// Left half in the red plane, right half in green and blue.
fn overlay(left: &Array2<u8>, right: &Array2<u8>) -> Array3<u8> {
    let h = left.nrows().min(right.nrows());
    let wl = left.ncols();
    let mut out = Array3::<u8>::zeros((h, wl + right.ncols(), 3));
    out.slice_mut(s![.., ..wl, 0]).assign(&left.slice(s![..h, ..]));
    out.slice_mut(s![.., wl.., 1]).assign(&right.slice(s![..h, ..]));
    out.slice_mut(s![.., wl.., 2]).assign(&right.slice(s![..h, ..]));
    out
}

fn difference(left: &Array2<u8>, right: &Array2<u8>) -> Array2<u8> {
    let h = left.nrows().min(right.nrows());
    let w = left.ncols().min(right.ncols());
    let mut out = Array2::<u8>::zeros((h, w));
    Zip::from(&mut out)
        .and(left.slice(s![..h, ..w]))
        .and(right.slice(s![..h, ..w]))
        .for_each(|d, &l, &r| *d = l.abs_diff(r));
    out
}

fn paint_seam(image: &mut Composite, seam: usize) {
    let w = image.width();
    if w < SEAM_MARKER_PX {
        return;
    }
    let x = seam.min(w - SEAM_MARKER_PX);
    match image {
        Composite::Gray(a) => a.slice_mut(s![.., x..x + SEAM_MARKER_PX]).fill(255),
        Composite::Rgb(a) => {
            for (ch, &v) in SEAM_MARKER_RGB.iter().enumerate() {
                a.slice_mut(s![.., x..x + SEAM_MARKER_PX, ch]).fill(v);
            }
        }
    }
}

/// Stack composites vertically, right-padding each to the widest. Gray
/// rows are promoted when any row is RGB.
fn vstack(rows: Vec<Composite>) -> Composite {
    let width = rows.iter().map(Composite::width).max().unwrap_or(0);
    let height: usize = rows.iter().map(Composite::height).sum();
    let any_rgb = rows.iter().any(|r| matches!(r, Composite::Rgb(_)));

    if any_rgb {
        let mut out = Array3::<u8>::zeros((height, width, 3));
        let mut y = 0;
        for row in rows {
            let rgb = row.into_rgb();
            let (h, w, _) = rgb.dim();
            out.slice_mut(s![y..y + h, ..w, ..]).assign(&rgb);
            y += h;
        }
        Composite::Rgb(out)
    } else {
        let mut out = Array2::<u8>::zeros((height, width));
        let mut y = 0;
        for row in rows {
            if let Composite::Gray(g) = row {
                let (h, w) = g.dim();
                out.slice_mut(s![y..y + h, ..w]).assign(&g);
                y += h;
            }
        }
        Composite::Gray(out)
    }
}

fn pad_edges(image: Composite, pad: usize) -> Composite {
    if pad == 0 {
        return image;
    }
    match image {
        Composite::Gray(a) => {
            let (h, w) = a.dim();
            let mut out = Array2::<u8>::zeros((h, w + 2 * pad));
            out.slice_mut(s![.., pad..pad + w]).assign(&a);
            Composite::Gray(out)
        }
        Composite::Rgb(a) => {
            let (h, w, _) = a.dim();
            let mut out = Array3::<u8>::zeros((h, w + 2 * pad, 3));
            out.slice_mut(s![.., pad..pad + w, ..]).assign(&a);
            Composite::Rgb(out)
        }
    }
}

/// Composite a window of merged ping strips into one image.
///
/// Each strip is split into its channel halves, oriented, laterally aligned
/// and joined according to `config`; strips that do not split are passed
/// through unchanged. `state` keeps the half width and shift history
/// between calls.
pub fn compose_window<'a, I>(
    rows: I,
    config: &DisplayConfig,
    state: &mut WindowState,
) -> WindowComposite
where
    I: IntoIterator<Item = &'a Array2<u8>>,
{
    let mut built = Vec::new();
    let (mut seam, mut shift, mut score) = (None, None, None);

    for strip in rows {
        let mut comp = compose_strip(strip, config, state);
        if config.show_seam {
            if let Some(x) = comp.seam {
                paint_seam(&mut comp.image, x);
            }
        }
        seam = comp.seam.or(seam);
        shift = comp.shift.or(shift);
        score = comp.score.or(score);
        built.push(comp.image);
    }

    WindowComposite {
        image: pad_edges(vstack(built), config.edge_pad),
        seam,
        shift,
        score,
    }
}
