use ndarray::Array1;

/// A single-ping intensity row.
pub type Row = Array1<u8>;

/// Render a raw ping payload into a row of exactly `width` samples.
///
/// Bytes are unsigned intensities. When the payload length differs from
/// `width` it is linearly resampled over the normalized index range [0, 1].
/// Values are multiplied by `intensity_scale`, clamped to [0, 255] and
/// truncated. An empty payload renders as a zero row.
pub fn render_row(payload: &[u8], width: usize, intensity_scale: f32) -> Row {
    if payload.is_empty() || width == 0 {
        return Row::zeros(width);
    }

    let scale = intensity_scale as f64;
    if payload.len() == width {
        return payload
            .iter()
            .map(|&v| scale_sample(v as f64, scale))
            .collect();
    }

    resample_linear(payload, width)
        .into_iter()
        .map(|v| scale_sample(v, scale))
        .collect()
}

/// Linear interpolation of `samples` onto `width` evenly spaced points.
///
/// Both grids span [0, 1] end to end, so the first and last samples are
/// preserved exactly.
pub fn resample_linear(samples: &[u8], width: usize) -> Vec<f64> {
    let n = samples.len();
    if n == 0 || width == 0 {
        return vec![0.0; width];
    }
    if n == 1 || width == 1 {
        return vec![samples[0] as f64; width];
    }

    let step = (n - 1) as f64 / (width - 1) as f64;
    (0..width)
        .map(|i| {
            let pos = i as f64 * step;
            let lo = (pos.floor() as usize).min(n - 1);
            let hi = (lo + 1).min(n - 1);
            let frac = pos - lo as f64;
            samples[lo] as f64 * (1.0 - frac) + samples[hi] as f64 * frac
        })
        .collect()
}

#[inline]
fn scale_sample(value: f64, scale: f64) -> u8 {
    (value * scale).clamp(0.0, 255.0) as u8
}
