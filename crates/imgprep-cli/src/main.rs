mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "imgprep", about = "Crop and compress images for upload")]
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
    /// Show image metadata
    Info(commands::info::InfoArgs),
    /// Validate, auto-crop and compress an image
    Process(commands::process::ProcessArgs),
    /// Drive the cropper with scripted gestures, then compress
    Crop(commands::crop::CropArgs),
    /// Print or save a default widget config
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
        Commands::Process(args) => commands::process::run(args),
        Commands::Crop(args) => commands::crop::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
