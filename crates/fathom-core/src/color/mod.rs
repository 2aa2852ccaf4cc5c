pub mod lut;
pub mod scheme;

pub use lut::{stretch_to_u8, ColorLut, ColorMapper};
pub use scheme::ColorScheme;
