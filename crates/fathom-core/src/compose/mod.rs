pub mod block;
pub mod window;

pub use block::{
    compose_aligned_block, compose_channel_block_preview, AlignedOptions, ChannelView,
    PreviewOptions,
};
pub use window::{compose_window, Composite, ShiftHistory, WindowComposite, WindowState};
