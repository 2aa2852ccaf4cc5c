use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::PREVIEW_GAP_PX;
use crate::io::payload::SurveyFile;
use crate::record::{Block, Record, RowShift};
use crate::render::{render_row, Row};

/// Which channels a preview shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelView {
    Left,
    Right,
    #[default]
    Both,
}

impl std::str::FromStr for ChannelView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown channel view: {other}")),
        }
    }
}

/// Options for [`compose_channel_block_preview`].
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewOptions {
    pub view: ChannelView,
    /// Total width; each channel gets half.
    pub width: usize,
    pub flip_left: bool,
    pub flip_right: bool,
    /// Columns blanked at the boat-adjacent edge of each channel; 0 keeps all.
    pub water_column_px: usize,
    pub intensity_scale: f32,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            view: ChannelView::Both,
            width: 512,
            flip_left: false,
            flip_right: false,
            water_column_px: 0,
            intensity_scale: 1.0,
        }
    }
}

/// Options for [`compose_aligned_block`].
#[derive(Clone, Debug, PartialEq)]
pub struct AlignedOptions {
    /// Width of each channel.
    pub width: usize,
    pub gap: usize,
    pub flip_left: bool,
    pub flip_right: bool,
    pub intensity_scale: f32,
}

fn channel_row(survey: &SurveyFile, record: &Record, width: usize, scale: f32, flip: bool) -> Row {
    let mut row = render_row(survey.payload(record), width, scale);
    if flip {
        row.invert_axis(ndarray::Axis(0));
    }
    row
}

/// Side-by-side waterfall of two blocks, one ping per row.
///
/// Rows pair records by index up to the shorter block. The layout is
/// `[left | 4 black columns | right]`; `view` can cut it down to one side.
pub fn compose_channel_block_preview(
    survey: &SurveyFile,
    left: &Block,
    right: &Block,
    options: &PreviewOptions,
) -> Array2<u8> {
    let n = left.len().min(right.len());
    let cw = options.width / 2;
    let total = cw * 2 + PREVIEW_GAP_PX;
    let mut out = Array2::<u8>::zeros((n, total));

    let wc = options.water_column_px;
    for (i, (l, r)) in left.records().iter().zip(right.records()).enumerate() {
        let mut lrow = channel_row(survey, l, cw, options.intensity_scale, options.flip_left);
        let mut rrow = channel_row(survey, r, cw, options.intensity_scale, options.flip_right);

        // Boat side: trailing end of the left channel, leading end of the right.
        if wc > 0 && cw > wc {
            lrow.slice_mut(s![cw - wc..]).fill(0);
            rrow.slice_mut(s![..wc]).fill(0);
        }

        out.slice_mut(s![i, ..cw]).assign(&lrow);
        out.slice_mut(s![i, cw + PREVIEW_GAP_PX..]).assign(&rrow);
    }

    debug!(rows = n, width = total, "Composed block preview");
    match options.view {
        ChannelView::Both => out,
        ChannelView::Left => out.slice(s![.., ..cw]).to_owned(),
        ChannelView::Right => out.slice(s![.., cw + PREVIEW_GAP_PX..]).to_owned(),
    }
}

/// Two full-width channels joined with a gap, the right channel offset by
/// `shift` pings.
///
/// Output row `i` holds left record `i` and right record `i + shift`; rows
/// whose right index falls outside the block stay black on that side.
pub fn compose_aligned_block(
    survey: &SurveyFile,
    left: &Block,
    right: &Block,
    shift: RowShift,
    options: &AlignedOptions,
) -> Array2<u8> {
    let rows = left.len().max(right.len());
    let w = options.width;
    let mut out = Array2::<u8>::zeros((rows, w * 2 + options.gap));

    for i in 0..rows {
        if let Some(record) = left.records().get(i) {
            let row = channel_row(survey, record, w, options.intensity_scale, options.flip_left);
            out.slice_mut(s![i, ..w]).assign(&row);
        }

        let right_idx = i as i64 + shift.0;
        if right_idx < 0 {
            continue;
        }
        if let Some(record) = right.records().get(right_idx as usize) {
            let row = channel_row(survey, record, w, options.intensity_scale, options.flip_right);
            out.slice_mut(s![i, w + options.gap..]).assign(&row);
        }
    }
    out
}
