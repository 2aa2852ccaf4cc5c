use std::collections::HashMap;
use std::sync::Arc;

use ndarray::{Array2, Array3};
use num_traits::ToPrimitive;

use crate::consts::LUT_SIZE;

use super::scheme::{unpack_rgb, ColorScheme};

/// 256-entry RGB lookup table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorLut {
    table: [[u8; 3]; LUT_SIZE],
}

impl ColorLut {
    /// Piecewise-linear table through the scheme's stops.
    ///
    /// Between stops `(p0, c0)` and `(p1, c1)` entry `p0 + i` is
    /// `trunc(c0 + (c1 - c0) * i / span)`. Entries from the last stop on
    /// repeat its color.
    pub fn build(scheme: ColorScheme) -> Self {
        let stops = scheme.stops();
        let mut table = [[0u8; 3]; LUT_SIZE];

        for pair in stops.windows(2) {
            let (p0, c0) = (pair[0].0 as usize, unpack_rgb(pair[0].1));
            let (p1, c1) = (pair[1].0 as usize, unpack_rgb(pair[1].1));
            let span = p1.saturating_sub(p0).max(1);
            for i in 0..span {
                let t = i as f64 / span as f64;
                for ch in 0..3 {
                    let a = c0[ch] as f64;
                    let b = c1[ch] as f64;
                    table[p0 + i][ch] = (a + (b - a) * t) as u8;
                }
            }
        }

        if let Some(&(last, hex)) = stops.last() {
            let color = unpack_rgb(hex);
            for entry in table.iter_mut().skip(last as usize) {
                *entry = color;
            }
        }

        Self { table }
    }

    pub fn get(&self, index: u8) -> [u8; 3] {
        self.table[index as usize]
    }

    /// Look up 8-bit data directly.
    pub fn map_gray(&self, data: &Array2<u8>) -> Array3<u8> {
        let (h, w) = data.dim();
        let mut out = Array3::<u8>::zeros((h, w, 3));
        for ((row, col), &v) in data.indexed_iter() {
            let rgb = self.table[v as usize];
            for ch in 0..3 {
                out[[row, col, ch]] = rgb[ch];
            }
        }
        out
    }
}

/// Lazily built, shared lookup tables.
#[derive(Debug, Default)]
pub struct ColorMapper {
    luts: HashMap<ColorScheme, Arc<ColorLut>>,
}

impl ColorMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table for `scheme`, built on first use.
    pub fn lut(&mut self, scheme: ColorScheme) -> Arc<ColorLut> {
        Arc::clone(
            self.luts
                .entry(scheme)
                .or_insert_with(|| Arc::new(ColorLut::build(scheme))),
        )
    }

    /// Stretch `data` to its min/max range and color it.
    ///
    /// Constant or non-finite data maps entirely to index 0.
    pub fn apply<T: ToPrimitive + Copy>(
        &mut self,
        data: &Array2<T>,
        scheme: ColorScheme,
    ) -> Array3<u8> {
        let lut = self.lut(scheme);
        lut.map_gray(&stretch_to_u8(data))
    }
}

/// Min/max stretch of any numeric array onto 0..=255.
pub fn stretch_to_u8<T: ToPrimitive + Copy>(data: &Array2<T>) -> Array2<u8> {
    let values = data.mapv(|v| v.to_f64().unwrap_or(f64::NAN));
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return Array2::zeros(data.dim());
    }
    let range = hi - lo;
    values.mapv(|v| {
        if v.is_finite() {
            ((v - lo) / range * 255.0).clamp(0.0, 255.0) as u8
        } else {
            0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_is_identity() {
        let lut = ColorLut::build(ColorScheme::Grayscale);
        for i in 0..=255u8 {
            assert_eq!(lut.get(i), [i, i, i]);
        }
    }

    #[test]
    fn last_stop_fills_tail() {
        let lut = ColorLut::build(ColorScheme::Magma);
        assert_eq!(lut.get(255), [0xfc, 0xfd, 0xbf]);
        assert_eq!(lut.get(0), [0x00, 0x00, 0x04]);
    }

    #[test]
    fn lut_is_built_once() {
        let mut mapper = ColorMapper::new();
        let a = mapper.lut(ColorScheme::Fire);
        let b = mapper.lut(ColorScheme::Fire);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
