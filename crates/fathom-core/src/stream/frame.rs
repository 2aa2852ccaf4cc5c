use ndarray::{s, Array2, Array3, Axis};

use crate::compose::Composite;

/// Dimensions rounded up to even values.
pub fn even_dims(h: usize, w: usize) -> (usize, usize) {
    (h + h % 2, w + w % 2)
}

/// Zero-pad an RGB frame on the bottom and right to even dimensions.
pub fn even_frame(rgb: &Array3<u8>) -> Array3<u8> {
    let (h, w, c) = rgb.dim();
    let (eh, ew) = even_dims(h, w);
    if (eh, ew) == (h, w) {
        return rgb.clone();
    }
    let mut out = Array3::<u8>::zeros((eh, ew, c));
    out.slice_mut(s![..h, ..w, ..]).assign(rgb);
    out
}

/// Source row for each output row under nearest-neighbour sampling at
/// pixel centers.
fn nearest_rows(src: usize, dst: usize) -> Vec<usize> {
    (0..dst)
        .map(|i| {
            let pos = (i as f64 + 0.5) * src as f64 / dst as f64;
            (pos as usize).min(src - 1)
        })
        .collect()
}

/// Resample a composite to exactly `height` rows; the width is unchanged.
pub fn resize_height(image: Composite, height: usize) -> Composite {
    let src = image.height();
    if height == 0 || src == height {
        return image;
    }
    if src == 0 {
        return match image {
            Composite::Gray(a) => Composite::Gray(Array2::zeros((height, a.ncols()))),
            Composite::Rgb(a) => Composite::Rgb(Array3::zeros((height, a.dim().1, 3))),
        };
    }
    let rows = nearest_rows(src, height);
    match image {
        Composite::Gray(a) => Composite::Gray(a.select(Axis(0), &rows)),
        Composite::Rgb(a) => Composite::Rgb(a.select(Axis(0), &rows)),
    }
}
