/// Blocks (and trailing remainders) shorter than this are treated as noise.
pub const MIN_BLOCK_RECORDS: usize = 5;

/// Default number of records per block.
pub const DEFAULT_BLOCK_SIZE: usize = 50;

/// Default rendered width of a single channel row, in samples.
pub const DEFAULT_ROW_WIDTH: usize = 1024;

/// Number of records sampled around a block midpoint for inter-block alignment.
pub const ALIGN_SAMPLE_COUNT: usize = 5;

/// Default search bound (rows) for inter-block alignment.
pub const DEFAULT_MAX_BLOCK_SHIFT: usize = 50;

/// Default search bound (pixels) for seam alignment.
pub const DEFAULT_MAX_ALIGN_SHIFT: usize = 64;

/// Spread of sampled shifts at which inter-block confidence drops to 0.5.
pub const CONFIDENCE_STD_SCALE: f64 = 10.0;

/// Epsilon added to the cross-power magnitude for inter-block correlation.
pub const BLOCK_CORRELATION_EPSILON: f64 = 1e-10;

/// Epsilon added to the cross-power magnitude for seam correlation.
pub const SEAM_CORRELATION_EPSILON: f64 = 1e-6;

/// Black gap between channels in the channel-block preview.
pub const PREVIEW_GAP_PX: usize = 4;

/// Default gap between channels in aligned block images.
pub const DEFAULT_BLOCK_GAP_PX: usize = 8;

/// Width of the seam region compared by lateral alignment.
pub const SEAM_PATCH_PX: usize = 128;

/// Minimum rows and columns for a seam patch to be correlated.
pub const MIN_SEAM_PATCH: usize = 8;

/// Minimum width of either half after a split.
pub const MIN_HALF_WIDTH: usize = 24;

/// Minimum column count for valley detection.
pub const MIN_VALLEY_COLUMNS: usize = 64;

/// Smallest box-filter width used to smooth column means.
pub const MIN_VALLEY_KERNEL: usize = 7;

/// Columns per box-filter tap when smoothing column means.
pub const VALLEY_KERNEL_DIVISOR: usize = 150;

/// Valley search band, as fractions of the row width.
pub const VALLEY_SEARCH_LO: f64 = 0.30;
pub const VALLEY_SEARCH_HI: f64 = 0.65;

/// Splits inside this outer fraction of the row are rejected.
pub const VALLEY_EDGE_FRACTION: f64 = 0.1;

/// Width of the seam marker painted by `SHOW_SEAM`.
pub const SEAM_MARKER_PX: usize = 2;

/// Seam marker color on RGB composites.
pub const SEAM_MARKER_RGB: [u8; 3] = [255, 255, 0];

/// Default shift-history length for seam smoothing.
pub const DEFAULT_SMOOTH_SHIFT: usize = 11;

/// Records scanned for a transducer serial number.
pub const SERIAL_SCAN_RECORDS: usize = 100;

/// Number of entries in a color lookup table.
pub const LUT_SIZE: usize = 256;
