use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::align::auto_align_block_pair;
use crate::blocks::{
    block_records, detect_transducer_config, pair_blocks, split_by_channel, TransducerConfig,
};
use crate::color::{ColorLut, ColorScheme};
use crate::compose::compose_aligned_block;
use crate::error::{FathomError, Result};
use crate::io::image_io::{save_gray_png, save_rgb_png, write_sidecar};
use crate::io::metadata::read_records;
use crate::io::payload::SurveyFile;
use crate::record::{Block, BlockPair, Record, RowShift};

use super::config::BlockConfig;
use super::types::{NoOpReporter, PipelineStage, ProgressReporter};

/// One composed block pair. Serializes as its JSON sidecar.
#[derive(Clone, Debug, Serialize)]
pub struct BlockResult {
    pub block_index: usize,
    pub left_channel: u32,
    pub right_channel: u32,
    pub left_records: usize,
    pub right_records: usize,
    pub shift: RowShift,
    pub confidence: f64,
    #[serde(skip)]
    pub image: Array2<u8>,
}

impl BlockResult {
    /// File name stem shared by the image and its sidecar.
    pub fn file_stem(&self) -> String {
        format!(
            "block_{:04}_ch{:02}_{:02}",
            self.block_index, self.left_channel, self.right_channel
        )
    }
}

/// A survey opened for block-wise processing.
pub struct BlockProcessor {
    survey: SurveyFile,
    block_size: usize,
    by_channel: BTreeMap<u32, Vec<Record>>,
    transducer: TransducerConfig,
    record_count: usize,
    skipped: usize,
}

impl BlockProcessor {
    /// Read the metadata table, split it by channel and map the survey.
    pub fn open(metadata: &Path, survey: &Path, block_size: usize) -> Result<Self> {
        let set = read_records(metadata)?;
        let survey = SurveyFile::open(survey)?;
        let transducer = detect_transducer_config(&set.records);
        let by_channel = split_by_channel(&set.records);

        info!(
            records = set.records.len(),
            skipped = set.skipped,
            channels = by_channel.len(),
            scan_type = %transducer.scan_type,
            "Survey opened"
        );

        Ok(Self {
            survey,
            block_size,
            record_count: set.records.len(),
            skipped: set.skipped,
            by_channel,
            transducer,
        })
    }

    pub fn survey(&self) -> &SurveyFile {
        &self.survey
    }

    pub fn transducer(&self) -> &TransducerConfig {
        &self.transducer
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Channel ids present in the survey, ascending.
    pub fn channels(&self) -> Vec<u32> {
        self.by_channel.keys().copied().collect()
    }

    /// Sequence-ordered records of one channel.
    pub fn channel_records(&self, channel_id: u32) -> Result<&[Record]> {
        self.by_channel
            .get(&channel_id)
            .map(Vec::as_slice)
            .ok_or(FathomError::UnknownChannel(channel_id))
    }

    /// Blocks of one channel; empty for an unknown channel.
    pub fn channel_blocks(&self, channel_id: u32) -> Vec<Block> {
        self.by_channel
            .get(&channel_id)
            .map(|records| block_records(channel_id, records, self.block_size))
            .unwrap_or_default()
    }

    /// Pair blocks of two channels by index and align each pair.
    pub fn pair_channel(
        &self,
        left: u32,
        right: u32,
        config: &BlockConfig,
    ) -> Result<Vec<BlockPair>> {
        self.channel_records(left)?;
        self.channel_records(right)?;

        let params = config.align_params();
        let pairs = pair_blocks(self.channel_blocks(left), self.channel_blocks(right));
        Ok(pairs
            .into_par_iter()
            .map(|(l, r)| {
                let (shift, confidence) = if config.auto_align {
                    let a = auto_align_block_pair(&self.survey, &l, &r, &params);
                    (RowShift(a.shift.0 + config.manual_shift), a.confidence)
                } else {
                    (RowShift(config.manual_shift), 0.0)
                };
                BlockPair {
                    left: l,
                    right: r,
                    shift,
                    confidence,
                }
            })
            .collect())
    }

    /// Align and compose every block pair of two channels.
    pub fn process_channel_pair(
        &self,
        left: u32,
        right: u32,
        config: &BlockConfig,
    ) -> Result<Vec<BlockResult>> {
        let pairs = self.pair_channel(left, right, config)?;
        Ok(self.compose_pairs(left, right, pairs, config, &NoOpReporter))
    }

    fn compose_pairs(
        &self,
        left: u32,
        right: u32,
        pairs: Vec<BlockPair>,
        config: &BlockConfig,
        reporter: &dyn ProgressReporter,
    ) -> Vec<BlockResult> {
        let options = config.aligned_options();
        let done = AtomicUsize::new(0);
        let results: Vec<BlockResult> = pairs
            .into_par_iter()
            .enumerate()
            .map(|(block_index, pair)| {
                let image = compose_aligned_block(
                    &self.survey,
                    &pair.left,
                    &pair.right,
                    pair.shift,
                    &options,
                );
                debug!(
                    block_index,
                    shift = pair.shift.0,
                    confidence = pair.confidence,
                    "Block composed"
                );
                reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
                BlockResult {
                    block_index,
                    left_channel: left,
                    right_channel: right,
                    left_records: pair.left.len(),
                    right_records: pair.right.len(),
                    shift: pair.shift,
                    confidence: pair.confidence,
                    image,
                }
            })
            .collect();

        info!(left, right, blocks = results.len(), "Channel pair processed");
        results
    }

    /// Write each block of a channel pair as a PNG plus JSON sidecar.
    ///
    /// With a colormap the PNG is RGB, otherwise grayscale. Returns the
    /// written paths, image before sidecar for each block.
    pub fn export_block_results(
        &self,
        out_dir: &Path,
        left: u32,
        right: u32,
        config: &BlockConfig,
        colormap: Option<ColorScheme>,
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(out_dir)?;

        reporter.begin_stage(PipelineStage::Alignment, None);
        let pairs = self.pair_channel(left, right, config)?;
        reporter.finish_stage();

        reporter.begin_stage(PipelineStage::Composing, Some(pairs.len()));
        let results = self.compose_pairs(left, right, pairs, config, reporter);
        reporter.finish_stage();

        let lut = colormap.map(ColorLut::build);
        let done = AtomicUsize::new(0);
        reporter.begin_stage(PipelineStage::Writing, Some(results.len()));

        let written: Vec<Vec<PathBuf>> = results
            .par_iter()
            .map(|result| {
                let stem = result.file_stem();
                let img_path = out_dir.join(format!("{stem}.png"));
                let meta_path = out_dir.join(format!("{stem}.json"));

                match &lut {
                    Some(lut) => save_rgb_png(&lut.map_gray(&result.image), &img_path)?,
                    None => save_gray_png(&result.image, &img_path)?,
                }
                write_sidecar(result, &meta_path)?;

                reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
                Ok(vec![img_path, meta_path])
            })
            .collect::<Result<_>>()?;
        reporter.finish_stage();

        let files: Vec<PathBuf> = written.into_iter().flatten().collect();
        info!(output = %out_dir.display(), files = files.len(), "Block export complete");
        Ok(files)
    }
}
