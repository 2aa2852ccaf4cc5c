use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    ALIGN_SAMPLE_COUNT, CONFIDENCE_STD_SCALE, DEFAULT_MAX_BLOCK_SHIFT, DEFAULT_ROW_WIDTH,
};
use crate::io::payload::SurveyFile;
use crate::record::{Block, PixelShift, RowShift};
use crate::render::{render_row, Row};

use super::phase_correlation::{phase_correlate, CorrelationSpec};

/// Parameters for inter-block alignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockAlignParams {
    /// Width sampled pings are rendered at before correlation.
    pub width: usize,
    /// Search bound for the per-pair correlation.
    pub max_shift: usize,
    pub intensity_scale: f32,
}

impl Default for BlockAlignParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_ROW_WIDTH,
            max_shift: DEFAULT_MAX_BLOCK_SHIFT,
            intensity_scale: 1.0,
        }
    }
}

/// Consensus alignment of a block pair.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockAlignment {
    pub shift: RowShift,
    /// In [0, 1]; 0 when no sample pair carried data.
    pub confidence: f64,
    /// Per-pair measurements the consensus was taken over.
    pub samples: Vec<PixelShift>,
}

/// Phase-correlation shift between two rendered pings.
///
/// Rows are trimmed to their common width. The magnitude never exceeds
/// `min(max_shift, width / 4)`.
pub fn pair_shift(left: &Row, right: &Row, max_shift: usize) -> PixelShift {
    let n = left.len().min(right.len());
    if n < 2 {
        return PixelShift(0);
    }
    let a = Array2::from_shape_fn((1, n), |(_, c)| left[c] as f32);
    let b = Array2::from_shape_fn((1, n), |(_, c)| right[c] as f32);
    PixelShift(phase_correlate(a.view(), b.view(), &CorrelationSpec::block(max_shift)).shift)
}

/// Estimate which right-channel ping lines up with each left-channel ping.
///
/// Up to [`ALIGN_SAMPLE_COUNT`] record pairs around the block midpoint are
/// rendered and correlated; pairs where either payload is missing are
/// skipped. The consensus is the median sample.
pub fn auto_align_block_pair(
    survey: &SurveyFile,
    left: &Block,
    right: &Block,
    params: &BlockAlignParams,
) -> BlockAlignment {
    let sample_size = ALIGN_SAMPLE_COUNT.min(left.len()).min(right.len());
    if sample_size == 0 {
        return BlockAlignment::default();
    }
    let mid_start = (left.len() / 2).saturating_sub(sample_size / 2);

    let samples: Vec<PixelShift> = left
        .records()
        .iter()
        .skip(mid_start)
        .take(sample_size)
        .zip(right.records().iter().skip(mid_start).take(sample_size))
        .filter_map(|(l, r)| {
            let lp = survey.payload(l);
            let rp = survey.payload(r);
            if lp.is_empty() || rp.is_empty() {
                return None;
            }
            let left_row = render_row(lp, params.width, params.intensity_scale);
            let right_row = render_row(rp, params.width, params.intensity_scale);
            Some(pair_shift(&left_row, &right_row, params.max_shift))
        })
        .collect();

    let (shift, confidence) = consensus_shift(&samples);
    debug!(
        left_channel = left.channel_id(),
        right_channel = right.channel_id(),
        samples = samples.len(),
        shift = shift.0,
        confidence,
        "Block pair aligned"
    );
    BlockAlignment {
        shift,
        confidence,
        samples,
    }
}

/// Median of the sampled shifts and a spread-based confidence.
///
/// The per-pair measurements are lateral, but the consensus is applied as a
/// ping-index offset between the two channels. An even sample count takes
/// the mean of the middle two, truncated toward zero. Confidence is
/// `1 - std / (std + 10)` with the population standard deviation.
pub fn consensus_shift(samples: &[PixelShift]) -> (RowShift, f64) {
    if samples.is_empty() {
        return (RowShift(0), 0.0);
    }

    let mut sorted: Vec<i64> = samples.iter().map(|s| s.0).collect();
    sorted.sort_unstable();
    let n = sorted.len();
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        ((sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0).trunc() as i64
    };

    let mean = sorted.iter().sum::<i64>() as f64 / n as f64;
    let variance = sorted
        .iter()
        .map(|&s| (s as f64 - mean).powi(2))
        .sum::<f64>()
        / n as f64;
    let std = variance.sqrt();
    let confidence = (1.0 - std / (std + CONFIDENCE_STD_SCALE)).clamp(0.0, 1.0);

    (RowShift(median), confidence)
}
