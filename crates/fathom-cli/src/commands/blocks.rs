use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fathom_core::color::ColorScheme;
use fathom_core::pipeline::BlockProcessor;
use tracing::info;

use super::{load_config, resolve_pair};
use crate::progress::BarReporter;
use crate::summary::print_blocks_summary;

#[derive(Args)]
pub struct BlocksArgs {
    /// Metadata table (CSV)
    pub metadata: PathBuf,

    /// Binary survey file holding the ping payloads
    pub survey: PathBuf,

    /// Survey config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Left channel id (default: first suggested pair)
    #[arg(long)]
    pub left: Option<u32>,

    /// Right channel id (default: first suggested pair)
    #[arg(long)]
    pub right: Option<u32>,

    /// Records per block
    #[arg(long)]
    pub block_size: Option<usize>,

    /// Rendered width of each channel
    #[arg(long)]
    pub width: Option<usize>,

    /// Disable automatic alignment
    #[arg(long)]
    pub no_align: bool,

    /// Manual ping shift, added to the automatic one
    #[arg(long, allow_hyphen_values = true)]
    pub shift: Option<i64>,

    /// Color the block images with a palette
    #[arg(long)]
    pub colormap: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = "blocks")]
    pub output: PathBuf,
}

pub fn run(args: &BlocksArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    config.metadata = args.metadata.clone();
    config.survey = args.survey.clone();
    config.output = args.output.clone();
    if let Some(size) = args.block_size {
        config.blocks.block_size = size;
    }
    if let Some(width) = args.width {
        config.blocks.width = width;
    }
    if args.no_align {
        config.blocks.auto_align = false;
    }
    if let Some(shift) = args.shift {
        config.blocks.manual_shift = shift;
    }
    let colormap = args.colormap.as_deref().map(ColorScheme::resolve);

    let processor =
        BlockProcessor::open(&config.metadata, &config.survey, config.blocks.block_size)
            .with_context(|| format!("Failed to open survey {}", config.survey.display()))?;
    let (left, right) = resolve_pair(args.left, args.right, processor.transducer())?;
    info!(left, right, blocks = processor.channel_blocks(left).len(), "Exporting channel pair");

    print_blocks_summary(&config, &processor, left, right, colormap);

    let reporter = BarReporter::new()?;
    let files = processor.export_block_results(
        &config.output,
        left,
        right,
        &config.blocks,
        colormap,
        &reporter,
    )?;
    reporter.finish("Done");

    println!(
        "\n{} files written to {}",
        files.len(),
        config.output.display()
    );
    Ok(())
}
