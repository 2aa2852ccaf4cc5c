use std::io::Write;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use tracing::{debug, info};

use crate::error::{FathomError, Result};
use crate::io::image_io::save_rgb_png;

use super::builder::{FrameBuilder, VideoFrame};

/// Destination for finished frames, e.g. a video encoder.
pub trait FrameSink {
    fn push(&mut self, frame: &VideoFrame) -> Result<()>;

    /// Flush and close. No frames are pushed afterwards.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Numbered PNG files, `frame_000000.png` onward.
pub struct PngSequenceSink {
    dir: PathBuf,
    written: usize,
}

impl PngSequenceSink {
    /// Creates `dir` if needed.
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            written: 0,
        })
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.png"))
    }
}

impl FrameSink for PngSequenceSink {
    fn push(&mut self, frame: &VideoFrame) -> Result<()> {
        save_rgb_png(&frame.rgb, &self.frame_path(self.written))?;
        self.written += 1;
        Ok(())
    }
}

/// Raw interleaved rgb24 frames, for piping into an external encoder.
///
/// Every frame must have the dimensions of the first.
pub struct RawRgbSink<W: Write> {
    writer: W,
    dims: Option<(usize, usize)>,
    frames: usize,
}

impl<W: Write> RawRgbSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            dims: None,
            frames: 0,
        }
    }

    /// (height, width) of the stream, once a frame has been written.
    pub fn dims(&self) -> Option<(usize, usize)> {
        self.dims
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for RawRgbSink<W> {
    fn push(&mut self, frame: &VideoFrame) -> Result<()> {
        let (h, w, _) = frame.rgb.dim();
        match self.dims {
            None => self.dims = Some((h, w)),
            Some(dims) if dims != (h, w) => {
                return Err(FathomError::Pipeline(format!(
                    "frame size changed from {}x{} to {w}x{h}",
                    dims.1, dims.0
                )));
            }
            Some(_) => {}
        }
        match frame.rgb.as_slice() {
            Some(bytes) => self.writer.write_all(bytes)?,
            None => {
                let bytes: Vec<u8> = frame.rgb.iter().copied().collect();
                self.writer.write_all(&bytes)?;
            }
        }
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Feed strips through `builder` into `sink` until the strips run out or
/// `max_frames` frames have been written. Returns the frame count.
pub fn export_waterfall<I, S>(
    rows: I,
    builder: &mut FrameBuilder,
    sink: &mut S,
    max_frames: Option<usize>,
) -> Result<usize>
where
    I: IntoIterator<Item = Array2<u8>>,
    S: FrameSink + ?Sized,
{
    let mut frames = 0usize;
    for strip in rows {
        if max_frames.is_some_and(|max| frames >= max) {
            break;
        }
        let Some(frame) = builder.push(strip) else {
            continue;
        };
        if let Some(shift) = frame.shift {
            debug!(frame = frames, shift = shift.0, "align: shift={shift}");
        }
        sink.push(&frame)?;
        frames += 1;
    }
    sink.finish()?;
    info!(frames, window = builder.capacity(), "Waterfall export complete");
    Ok(frames)
}
