pub mod builder;
pub mod frame;
pub mod sink;
pub mod strips;

pub use builder::{build_preview_frame, rows_needed, BuilderState, FrameBuilder, VideoFrame};
pub use frame::{even_dims, even_frame, resize_height};
pub use sink::{export_waterfall, FrameSink, PngSequenceSink, RawRgbSink};
pub use strips::{list_strip_images, load_strips, merged_strip, survey_strips};
