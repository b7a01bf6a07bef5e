use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use imgprep_core::consts::MAX_COMPRESSION_ATTEMPTS;
use imgprep_core::error::PrepError;
use imgprep_core::file::ImageFile;
use imgprep_core::geometry::Handle;
use imgprep_core::widget::{ImageWidget, Selection, WidgetObserver};
use tracing::info;

use crate::summary::{print_result_summary, print_settings_summary};

use super::process::write_output;
use super::{default_output_path, SettingsArgs};

#[derive(Args)]
pub struct CropArgs {
    /// Input image
    pub file: PathBuf,

    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Drag the crop rectangle by DX,DY canvas pixels
    #[arg(long, value_parser = parse_offset, allow_hyphen_values = true)]
    pub drag: Option<(f32, f32)>,

    /// Drag the bottom-right handle by DX,DY canvas pixels
    #[arg(long, value_parser = parse_offset, allow_hyphen_values = true)]
    pub resize: Option<(f32, f32)>,

    /// Save the canvas with the crop overlay as PNG
    #[arg(long)]
    pub overlay: Option<PathBuf>,

    /// Save the live preview thumbnail as PNG
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Output file path (auto-generated if not provided)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

struct BarObserver(ProgressBar);

impl WidgetObserver for BarObserver {
    fn on_attempt(&self, attempt: u32, quality: f32, bytes: u64) {
        self.0.set_position(attempt as u64);
        self.0
            .set_message(format!("q={quality:.2} {} KB", bytes / 1024));
    }

    fn on_error(&self, error: &PrepError) {
        self.0.abandon_with_message(error.to_string());
    }
}

pub fn run(args: &CropArgs) -> Result<()> {
    let mut config = args.settings.resolve()?;
    config.interactive = true;
    let file = ImageFile::from_path(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    print_settings_summary(&args.file, &config);

    let pb = ProgressBar::new(MAX_COMPRESSION_ATTEMPTS as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let compression = config.compression.clone();
    let mut widget = ImageWidget::new("cli", config)?.with_observer(BarObserver(pb.clone()));

    match widget.on_user_select(file)? {
        Selection::Editing => {}
        other => anyhow::bail!("Cropper did not open: {other:?}"),
    }

    let cropper = widget.cropper_mut();
    if let Some((dx, dy)) = args.drag {
        let rect = cropper.crop_rect().context("No crop rectangle")?;
        let (cx, cy) = (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
        cropper.pointer_down(cx, cy);
        cropper.pointer_move(cx + dx, cy + dy);
        cropper.pointer_up();
    }
    if let Some((dx, dy)) = args.resize {
        let rect = cropper.crop_rect().context("No crop rectangle")?;
        let (hx, hy) = Handle::BottomRight.position(&rect);
        cropper.pointer_down(hx, hy);
        cropper.pointer_move(hx + dx, hy + dy);
        cropper.pointer_up();
    }
    if let Some(rect) = cropper.crop_rect() {
        info!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "Final crop"
        );
    }

    if let Some(ref path) = args.overlay {
        cropper
            .overlay()?
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    if let Some(ref path) = args.preview {
        cropper
            .preview()?
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    pb.set_message("Compressing");
    let processed = widget.confirm_crop().context("Crop failed")?;
    pb.finish_with_message("Done");

    let violations = imgprep_core::compress::check_output(&processed.file, &compression)?;
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.file, &processed.file.name));
    write_output(&processed, &output_path)?;

    print_result_summary(&processed, &violations, &output_path);
    Ok(())
}

fn parse_offset(s: &str) -> std::result::Result<(f32, f32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got {s}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad DX: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad DY: {e}"))?;
    Ok((x, y))
}
