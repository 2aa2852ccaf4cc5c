use std::collections::VecDeque;
use std::sync::Arc;

use ndarray::{Array2, Array3};

use crate::color::{ColorLut, ColorMapper};
use crate::compose::{compose_window, Composite, WindowComposite, WindowState};
use crate::error::{FathomError, Result};
use crate::pipeline::config::DisplayConfig;
use crate::record::PixelShift;

use super::frame::{even_frame, resize_height};

/// One finished video frame.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    /// (H, W, 3), both dimensions even.
    pub rgb: Array3<u8>,
    pub seam: Option<usize>,
    pub shift: Option<PixelShift>,
    pub confidence: Option<f64>,
}

/// Lifecycle of a [`FrameBuilder`]. Never returns to `Empty`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderState {
    Empty,
    /// Fewer than `capacity` strips buffered; no frames yet.
    Filling,
    /// Window full; every push yields a frame.
    Streaming,
}

/// Strips needed to fill a frame of `video_height` rows.
pub fn rows_needed(video_height: usize, row_height: usize) -> usize {
    video_height.div_ceil(row_height.max(1)).max(1)
}

/// Bounded sliding window over merged ping strips.
///
/// Holds at most `capacity` strips. Once full, each new strip evicts the
/// oldest and the whole window is re-composited into a frame.
pub struct FrameBuilder {
    config: DisplayConfig,
    video_height: usize,
    capacity: usize,
    window: VecDeque<Array2<u8>>,
    state: WindowState,
    lut: Arc<ColorLut>,
    phase: BuilderState,
}

impl FrameBuilder {
    pub fn new(
        config: DisplayConfig,
        row_height: usize,
        video_height: usize,
        lut: Arc<ColorLut>,
    ) -> Self {
        let capacity = rows_needed(video_height, row_height);
        let state = WindowState::new(&config);
        Self {
            config,
            video_height,
            capacity,
            window: VecDeque::with_capacity(capacity + 1),
            state,
            lut,
            phase: BuilderState::Empty,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn state(&self) -> BuilderState {
        self.phase
    }

    pub fn push(&mut self, strip: Array2<u8>) -> Option<VideoFrame> {
        self.window.push_back(strip);
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }

        if self.window.len() < self.capacity {
            self.phase = BuilderState::Filling;
            return None;
        }
        self.phase = BuilderState::Streaming;

        let composite = compose_window(self.window.iter(), &self.config, &mut self.state);
        Some(render_frame(composite, self.video_height, &self.lut))
    }
}

/// Resize, color-map and even-pad a window composite.
pub(crate) fn render_frame(
    composite: WindowComposite,
    video_height: usize,
    lut: &ColorLut,
) -> VideoFrame {
    let rgb = match resize_height(composite.image, video_height) {
        Composite::Gray(gray) => lut.map_gray(&gray),
        Composite::Rgb(rgb) => rgb,
    };
    VideoFrame {
        rgb: even_frame(&rgb),
        seam: composite.seam,
        shift: composite.shift,
        confidence: composite.score,
    }
}

/// Single frame from the first window of `rows`, with fresh state.
pub fn build_preview_frame<'a, I>(
    rows: I,
    config: &DisplayConfig,
    row_height: usize,
    video_height: usize,
    mapper: &mut ColorMapper,
) -> Result<VideoFrame>
where
    I: IntoIterator<Item = &'a Array2<u8>>,
{
    let window: Vec<&Array2<u8>> = rows
        .into_iter()
        .take(rows_needed(video_height, row_height))
        .collect();
    if window.is_empty() {
        return Err(FathomError::EmptySequence);
    }

    let mut state = WindowState::new(config);
    let composite = compose_window(window, config, &mut state);
    let lut = mapper.lut(config.color_scheme());
    Ok(render_frame(composite, video_height, &lut))
}
