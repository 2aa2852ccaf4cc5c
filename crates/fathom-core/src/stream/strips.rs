use std::path::{Path, PathBuf};

use ndarray::{s, Array2};
use tracing::warn;

use crate::error::Result;
use crate::io::image_io::load_gray;
use crate::io::payload::SurveyFile;
use crate::pipeline::config::BlockConfig;
use crate::record::Record;
use crate::render::{render_row, Row};

/// Merge one left and one right row into a `row_height`-tall strip.
pub fn merged_strip(left: &Row, right: &Row, row_height: usize) -> Array2<u8> {
    let (wl, wr) = (left.len(), right.len());
    let mut strip = Array2::<u8>::zeros((row_height.max(1), wl + wr));
    for mut row in strip.rows_mut() {
        row.slice_mut(s![..wl]).assign(left);
        row.slice_mut(s![wl..]).assign(right);
    }
    strip
}

/// Merged strips for paired records of two channels, one per index up to
/// the shorter channel. Each channel is rendered at half of `config.width`.
pub fn survey_strips<'a>(
    survey: &'a SurveyFile,
    left: &'a [Record],
    right: &'a [Record],
    config: &'a BlockConfig,
    row_height: usize,
) -> impl Iterator<Item = Array2<u8>> + 'a {
    let half = config.width / 2;
    left.iter().zip(right).map(move |(l, r)| {
        let mut lrow = render_row(survey.payload(l), half, config.intensity_scale);
        let mut rrow = render_row(survey.payload(r), half, config.intensity_scale);
        if config.flip_left {
            lrow.invert_axis(ndarray::Axis(0));
        }
        if config.flip_right {
            rrow.invert_axis(ndarray::Axis(0));
        }
        merged_strip(&lrow, &rrow, row_height)
    })
}

/// Image files in `dir`, sorted by name.
pub fn list_strip_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| {
                    matches!(
                        e.to_ascii_lowercase().as_str(),
                        "png" | "jpg" | "jpeg" | "bmp" | "tif" | "tiff"
                    )
                })
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Load pre-rendered strips as grayscale. Unreadable files are skipped.
pub fn load_strips(paths: &[PathBuf]) -> impl Iterator<Item = Array2<u8>> + '_ {
    paths.iter().filter_map(|p| match load_gray(p) {
        Ok(strip) => Some(strip),
        Err(e) => {
            warn!(path = %p.display(), error = %e, "Skipping unreadable strip");
            None
        }
    })
}
