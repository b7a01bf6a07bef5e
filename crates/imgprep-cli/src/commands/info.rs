use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use imgprep_core::compress::format_file_size;
use imgprep_core::file::{ImageFile, ImageInfo};

#[derive(Args)]
pub struct InfoArgs {
    /// Input image
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let file = ImageFile::from_path(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let info = ImageInfo::probe(&file)?;

    println!("File:        {}", args.file.display());
    println!("Format:      {}", info.format);
    println!("Dimensions:  {}x{}", info.width, info.height);
    println!("Color:       {:?}", info.color_type);
    println!(
        "Alpha:       {}",
        if info.has_alpha() { "yes" } else { "no" }
    );
    println!("Size:        {}", format_file_size(info.file_size));

    Ok(())
}
