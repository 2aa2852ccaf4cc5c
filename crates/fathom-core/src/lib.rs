pub mod align;
pub mod blocks;
pub mod color;
pub mod compose;
pub mod consts;
pub mod error;
pub mod io;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod stream;
