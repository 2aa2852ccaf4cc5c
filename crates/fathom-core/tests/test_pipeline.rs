mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use fathom_core::color::ColorScheme;
use fathom_core::error::FathomError;
use fathom_core::pipeline::config::BlockConfig;
use fathom_core::pipeline::{BlockProcessor, NoOpReporter, PipelineStage, ProgressReporter};
use fathom_core::record::RowShift;
use tempfile::TempDir;

use common::{lagged_survey, write_survey, Ping};

#[derive(Default)]
struct RecordingReporter {
    stages: Mutex<Vec<(PipelineStage, Option<usize>)>>,
    advanced: AtomicUsize,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.stages.lock().unwrap().push((stage, total_items));
    }

    fn advance(&self, _items_done: usize) {
        self.advanced.fetch_add(1, Ordering::Relaxed);
    }
}

fn open(fixture: &common::SurveyFixture, block_size: usize) -> BlockProcessor {
    BlockProcessor::open(&fixture.metadata, &fixture.survey, block_size).unwrap()
}

#[test]
fn test_processor_summarizes_survey() {
    let mut pings: Vec<Ping> = (0..12).map(|i| Ping::new(0, i, vec![1; 8])).collect();
    pings.extend((0..7).map(|i| Ping::new(1, i, vec![2; 8])));
    let fixture = write_survey(&pings);
    let processor = open(&fixture, 5);

    assert_eq!(processor.record_count(), 19);
    assert_eq!(processor.skipped(), 0);
    assert_eq!(processor.channels(), vec![0, 1]);
    assert_eq!(processor.channel_records(0).unwrap().len(), 12);
    // 12 records in fives: the trailing two are dropped.
    assert_eq!(processor.channel_blocks(0).len(), 2);
    assert_eq!(processor.channel_blocks(1).len(), 1);
}

#[test]
fn test_missing_channel_is_an_error() {
    let fixture = lagged_survey(10, 256, 0);
    let processor = open(&fixture, 50);
    let err = processor
        .process_channel_pair(0, 7, &BlockConfig::default())
        .unwrap_err();
    assert!(matches!(err, FathomError::UnknownChannel(7)));
}

#[test]
fn test_missing_survey_file_fails_to_open() {
    let fixture = lagged_survey(10, 256, 0);
    let missing = fixture.dir.path().join("nope.bin");
    assert!(BlockProcessor::open(&fixture.metadata, &missing, 50).is_err());
}

#[test]
fn test_lagged_channels_align() {
    let fixture = lagged_survey(20, 1024, 2);
    let processor = open(&fixture, 50);
    let results = processor
        .process_channel_pair(0, 1, &BlockConfig::default())
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].shift, RowShift(2));
    assert!(results[0].confidence > 0.5);
    assert_eq!(results[0].image.dim(), (20, 2 * 1024 + 8));
    assert_eq!(results[0].file_stem(), "block_0000_ch00_01");
}

#[test]
fn test_manual_shift_without_alignment() {
    let fixture = lagged_survey(20, 256, 2);
    let processor = open(&fixture, 10);
    let config = BlockConfig {
        block_size: 10,
        width: 256,
        auto_align: false,
        manual_shift: -4,
        ..Default::default()
    };
    let pairs = processor.pair_channel(0, 1, &config).unwrap();
    assert_eq!(pairs.len(), 2);
    for pair in &pairs {
        assert_eq!(pair.shift, RowShift(-4));
        assert_eq!(pair.confidence, 0.0);
    }
}

#[test]
fn test_export_writes_image_and_sidecar() {
    let fixture = lagged_survey(20, 1024, 2);
    let processor = open(&fixture, 50);
    let out = TempDir::new().unwrap();
    let reporter = RecordingReporter::default();

    let files = processor
        .export_block_results(out.path(), 0, 1, &BlockConfig::default(), None, &reporter)
        .unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0], out.path().join("block_0000_ch00_01.png"));
    assert_eq!(files[1], out.path().join("block_0000_ch00_01.json"));

    let img = image::open(&files[0]).unwrap();
    assert_eq!((img.width(), img.height()), (2056, 20));
    assert!(matches!(img, image::DynamicImage::ImageLuma8(_)));

    let sidecar: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&files[1]).unwrap()).unwrap();
    assert_eq!(sidecar["shift"], 2);
    assert_eq!(sidecar["left_records"], 20);
    assert_eq!(sidecar["right_channel"], 1);
    assert!(sidecar.get("image").is_none());

    let stages = reporter.stages.lock().unwrap();
    assert_eq!(
        *stages,
        vec![
            (PipelineStage::Alignment, None),
            (PipelineStage::Composing, Some(1)),
            (PipelineStage::Writing, Some(1)),
        ]
    );
    // One block composed, one block written.
    assert_eq!(reporter.advanced.load(Ordering::Relaxed), 2);
}

#[test]
fn test_export_with_colormap_is_rgb() {
    let fixture = lagged_survey(20, 128, 0);
    let processor = open(&fixture, 10);
    let out = TempDir::new().unwrap();
    let config = BlockConfig {
        block_size: 10,
        width: 128,
        ..Default::default()
    };

    let files = processor
        .export_block_results(out.path(), 0, 1, &config, Some(ColorScheme::Fire), &NoOpReporter)
        .unwrap();
    assert_eq!(files.len(), 4);
    assert!(out.path().join("block_0001_ch00_01.png").exists());
    let img = image::open(out.path().join("block_0001_ch00_01.png")).unwrap();
    assert!(matches!(img, image::DynamicImage::ImageRgb8(_)));
    assert_eq!((img.width(), img.height()), (264, 10));
}
