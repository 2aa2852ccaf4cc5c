mod commands;
mod progress;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fathom", about = "Side-scan sonar waterfall toolkit")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show survey metadata and transducer layout
    Info(commands::info::InfoArgs),
    /// Align and export block pairs of two channels
    Blocks(commands::blocks::BlocksArgs),
    /// Render a single channel-block preview
    Preview(commands::preview::PreviewArgs),
    /// Stream a waterfall into video frames
    Video(commands::video::VideoArgs),
    /// Print or save the default survey config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Blocks(args) => commands::blocks::run(args),
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Video(args) => commands::video::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
