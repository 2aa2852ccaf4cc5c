use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{GrayImage, ImageFormat, RgbImage};
use ndarray::{Array2, Array3};
use serde::Serialize;

use crate::error::{FathomError, Result};

/// Convert a grayscale array into an `image` buffer.
pub fn to_gray_image(data: &Array2<u8>) -> Result<GrayImage> {
    let (h, w) = data.dim();
    let pixels: Vec<u8> = data.iter().copied().collect();
    GrayImage::from_raw(w as u32, h as u32, pixels)
        .ok_or_else(|| FathomError::Pipeline(format!("bad gray buffer for {w}x{h}")))
}

/// Convert an (H, W, 3) array into an `image` buffer.
pub fn to_rgb_image(data: &Array3<u8>) -> Result<RgbImage> {
    let (h, w, c) = data.dim();
    if c != 3 {
        return Err(FathomError::Pipeline(format!(
            "expected 3 color planes, got {c}"
        )));
    }
    let pixels: Vec<u8> = data.iter().copied().collect();
    RgbImage::from_raw(w as u32, h as u32, pixels)
        .ok_or_else(|| FathomError::Pipeline(format!("bad RGB buffer for {w}x{h}")))
}

/// Save an 8-bit grayscale PNG.
pub fn save_gray_png(data: &Array2<u8>, path: &Path) -> Result<()> {
    to_gray_image(data)?.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save an 8-bit RGB PNG.
pub fn save_rgb_png(data: &Array3<u8>, path: &Path) -> Result<()> {
    to_rgb_image(data)?.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Load any image file as an 8-bit grayscale array.
pub fn load_gray(path: &Path) -> Result<Array2<u8>> {
    let gray = image::open(path)?.to_luma8();
    let (w, h) = gray.dimensions();
    Array2::from_shape_vec((h as usize, w as usize), gray.into_raw())
        .map_err(|e| FathomError::Pipeline(e.to_string()))
}

/// Write a pretty-printed JSON sidecar.
pub fn write_sidecar<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}
