use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use imgprep_core::compress::check_output;
use imgprep_core::consts::MAX_COMPRESSION_ATTEMPTS;
use imgprep_core::file::ImageFile;
use imgprep_core::pipeline::ProcessedImage;
use imgprep_core::worker::{spawn_process, JobEvent};

use crate::summary::{print_result_summary, print_settings_summary};

use super::{default_output_path, SettingsArgs};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input image
    pub file: PathBuf,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Fail if the result is over budget or over the size bounds
    #[arg(long)]
    pub strict: bool,

    /// Output file path (auto-generated if not provided)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ProcessArgs) -> Result<()> {
    let config = args.settings.resolve()?;
    let file = ImageFile::from_path(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    print_settings_summary(&args.file, &config);

    let mut job = spawn_process(file, config.clone())?;

    let pb = ProgressBar::new(MAX_COMPRESSION_ATTEMPTS as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Compressing");

    let outcome = loop {
        match job.next_blocking() {
            Some(JobEvent::Attempt {
                attempt,
                quality,
                bytes,
            }) => {
                pb.set_position(attempt as u64);
                pb.set_message(format!("q={quality:.2} {} KB", bytes / 1024));
            }
            Some(JobEvent::Finished(outcome)) => break outcome,
            None => anyhow::bail!("Worker stopped without a result"),
        }
    };
    pb.finish_with_message("Done");

    let processed = outcome.context("Processing failed")?;
    let violations = check_output(&processed.file, &config.compression)?;

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.file, &processed.file.name));
    write_output(&processed, &output_path)?;

    print_result_summary(&processed, &violations, &output_path);

    if args.strict && !violations.is_empty() {
        anyhow::bail!("{} constraint violation(s)", violations.len());
    }
    Ok(())
}

pub(crate) fn write_output(processed: &ProcessedImage, path: &Path) -> Result<()> {
    std::fs::write(path, &processed.file.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))
}
