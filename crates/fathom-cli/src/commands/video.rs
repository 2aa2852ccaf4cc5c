use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use fathom_core::color::ColorMapper;
use fathom_core::io::image_io::save_rgb_png;
use fathom_core::pipeline::config::PreviewMode;
use fathom_core::pipeline::BlockProcessor;
use fathom_core::stream::{
    build_preview_frame, export_waterfall, list_strip_images, load_strips, rows_needed,
    survey_strips, FrameBuilder, FrameSink, PngSequenceSink, RawRgbSink,
};
use ndarray::Array2;
use tracing::debug;

use super::{load_config, resolve_pair};
use crate::summary::print_video_summary;

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Compose,
    Overlay,
    Difference,
}

impl From<ModeArg> for PreviewMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Compose => PreviewMode::Compose,
            ModeArg::Overlay => PreviewMode::Overlay,
            ModeArg::Difference => PreviewMode::Difference,
        }
    }
}

#[derive(Args)]
pub struct VideoArgs {
    /// Metadata table (CSV); not needed with --rows-dir
    pub metadata: Option<PathBuf>,

    /// Binary survey file; not needed with --rows-dir
    pub survey: Option<PathBuf>,

    /// Survey config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read pre-rendered merged strips from a directory of images instead
    #[arg(long)]
    pub rows_dir: Option<PathBuf>,

    #[arg(long)]
    pub left: Option<u32>,

    #[arg(long)]
    pub right: Option<u32>,

    /// Write raw rgb24 frames to this file instead of PNGs
    #[arg(long)]
    pub raw: Option<PathBuf>,

    #[arg(long)]
    pub video_height: Option<usize>,

    /// Height of each merged strip
    #[arg(long)]
    pub row_height: Option<usize>,

    #[arg(long)]
    pub max_frames: Option<usize>,

    #[arg(long)]
    pub colormap: Option<String>,

    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Mark the detected seam
    #[arg(long)]
    pub show_seam: bool,

    /// Only write a single preview frame
    #[arg(long)]
    pub preview: bool,

    /// Output directory
    #[arg(short, long, default_value = "frames")]
    pub output: PathBuf,
}

pub fn run(args: &VideoArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    config.output = args.output.clone();
    if let Some(h) = args.video_height {
        config.video.video_height = h;
    }
    if let Some(h) = args.row_height {
        config.video.row_height = h;
    }
    if args.max_frames.is_some() {
        config.video.max_frames = args.max_frames;
    }
    if let Some(ref name) = args.colormap {
        config.display.colormap = name.clone();
    }
    if let Some(mode) = args.mode {
        config.display.preview_mode = mode.into();
    }
    if args.show_seam {
        config.display.show_seam = true;
    }

    let paths: Vec<PathBuf>;
    let processor: BlockProcessor;
    let (source, strips): (String, Box<dyn Iterator<Item = Array2<u8>> + '_>) =
        if let Some(ref dir) = args.rows_dir {
            paths = list_strip_images(dir)
                .with_context(|| format!("Failed to list {}", dir.display()))?;
            (dir.display().to_string(), Box::new(load_strips(&paths)))
        } else {
            let (Some(metadata), Some(survey)) = (&args.metadata, &args.survey) else {
                bail!("Pass METADATA and SURVEY, or --rows-dir");
            };
            processor = BlockProcessor::open(metadata, survey, config.blocks.block_size)
                .with_context(|| format!("Failed to open survey {}", survey.display()))?;
            let (left, right) = resolve_pair(args.left, args.right, processor.transducer())?;
            let strips = survey_strips(
                processor.survey(),
                processor.channel_records(left)?,
                processor.channel_records(right)?,
                &config.blocks,
                config.video.row_height,
            );
            (format!("channels {left}/{right}"), Box::new(strips))
        };

    print_video_summary(&config, &source);
    std::fs::create_dir_all(&config.output)
        .with_context(|| format!("Failed to create {}", config.output.display()))?;

    let mut mapper = ColorMapper::new();
    if args.preview {
        let needed = rows_needed(config.video.video_height, config.video.row_height);
        let window: Vec<Array2<u8>> = strips.take(needed).collect();
        let frame = build_preview_frame(
            &window,
            &config.display,
            config.video.row_height,
            config.video.video_height,
            &mut mapper,
        )?;
        let path = config.output.join("preview.png");
        save_rgb_png(&frame.rgb, &path)?;
        println!("Preview saved to {}", path.display());
        return Ok(());
    }

    let lut = mapper.lut(config.display.color_scheme());
    let mut builder = FrameBuilder::new(
        config.display.clone(),
        config.video.row_height,
        config.video.video_height,
        lut,
    );
    let mut sink: Box<dyn FrameSink> = match args.raw {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(RawRgbSink::new(BufWriter::new(file)))
        }
        None => Box::new(PngSequenceSink::create(&config.output)?),
    };

    debug!(window = builder.capacity(), "Frame builder ready");
    let frames = export_waterfall(strips, &mut builder, sink.as_mut(), config.video.max_frames)?;
    println!(
        "\n{} frames written (window of {} strips)",
        frames,
        builder.capacity()
    );
    Ok(())
}
