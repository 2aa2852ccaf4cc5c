pub mod block_shift;
pub mod lateral;
pub mod phase_correlation;

pub use block_shift::{
    auto_align_block_pair, consensus_shift, pair_shift, BlockAlignParams, BlockAlignment,
};
pub use lateral::{
    align_join, auto_split_valley, fit_half_width, seam_shift, split_mid, JoinOptions,
    LateralJoin, SeamSplit,
};
pub use phase_correlation::{phase_correlate, Correlation, CorrelationSpec};
