use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use fathom_core::color::{ColorLut, ColorScheme};
use fathom_core::compose::{compose_channel_block_preview, ChannelView};
use fathom_core::io::image_io::{save_gray_png, save_rgb_png};
use fathom_core::pipeline::BlockProcessor;

use super::{load_config, resolve_pair};

#[derive(Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Both,
    Left,
    Right,
}

impl From<ViewArg> for ChannelView {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::Both => ChannelView::Both,
            ViewArg::Left => ChannelView::Left,
            ViewArg::Right => ChannelView::Right,
        }
    }
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Metadata table (CSV)
    pub metadata: PathBuf,

    /// Binary survey file holding the ping payloads
    pub survey: PathBuf,

    /// Survey config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Block index to render
    #[arg(long, default_value = "0")]
    pub block: usize,

    #[arg(long)]
    pub left: Option<u32>,

    #[arg(long)]
    pub right: Option<u32>,

    /// Channels to show
    #[arg(long, value_enum, default_value = "both")]
    pub view: ViewArg,

    /// Blank this many boat-side columns per channel
    #[arg(long, default_value = "0")]
    pub water_column: usize,

    /// Total preview width (split between both channels)
    #[arg(long, default_value = "512")]
    pub width: usize,

    /// Color the preview with a palette
    #[arg(long)]
    pub colormap: Option<String>,

    /// Output PNG path
    #[arg(short, long, default_value = "preview.png")]
    pub output: PathBuf,
}

pub fn run(args: &PreviewArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let processor = BlockProcessor::open(&args.metadata, &args.survey, config.blocks.block_size)
        .with_context(|| format!("Failed to open survey {}", args.survey.display()))?;
    let (left, right) = resolve_pair(args.left, args.right, processor.transducer())?;

    let left_blocks = processor.channel_blocks(left);
    let right_blocks = processor.channel_blocks(right);
    let (Some(lb), Some(rb)) = (left_blocks.get(args.block), right_blocks.get(args.block)) else {
        bail!(
            "Block {} not available (channel {} has {}, channel {} has {})",
            args.block,
            left,
            left_blocks.len(),
            right,
            right_blocks.len()
        );
    };

    let mut blocks = config.blocks.clone();
    blocks.width = args.width;
    let options = blocks.preview_options(args.view.into(), args.water_column);
    let image = compose_channel_block_preview(processor.survey(), lb, rb, &options);

    match args.colormap.as_deref().map(ColorScheme::resolve) {
        Some(scheme) => save_rgb_png(&ColorLut::build(scheme).map_gray(&image), &args.output)?,
        None => save_gray_png(&image, &args.output)?,
    }

    let (h, w) = image.dim();
    println!("Preview {}x{} saved to {}", w, h, args.output.display());
    Ok(())
}
