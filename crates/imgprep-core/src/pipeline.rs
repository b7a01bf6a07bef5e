//! Non-interactive entry point: validate, auto-crop, compress.

use image::DynamicImage;
use tracing::{info, warn};

use crate::compress::{
    compress_with, AttemptReporter, CancelToken, CompressionResult, CompressionStats,
    NoOpReporter, RenderSurface,
};
use crate::cropper::{CropSettings, SourceImage};
use crate::error::{PrepError, Result};
use crate::file::{ImageFile, ImageMime};
use crate::geometry::{center_crop, PixelRect};
use crate::widget::WidgetConfig;

/// What the host receives for its form field.
#[derive(Clone, Debug)]
pub struct ProcessedImage {
    pub file: ImageFile,
    pub stats: CompressionStats,
    pub width: u32,
    pub height: u32,
    pub attempts: u32,
    pub final_quality: f32,
}

impl From<CompressionResult> for ProcessedImage {
    fn from(result: CompressionResult) -> Self {
        let stats = result.stats();
        Self {
            file: result.output_file,
            stats,
            width: result.width,
            height: result.height,
            attempts: result.attempts,
            final_quality: result.final_quality,
        }
    }
}

/// Reject files whose declared type is not allowed or whose raw size exceeds
/// the pre-processing ceiling. Nothing is decoded.
pub fn validate_file(file: &ImageFile, allowed_types: &[String], max_source_bytes: u64) -> Result<ImageMime> {
    let allowed = allowed_types
        .iter()
        .filter_map(|t| ImageMime::parse(t))
        .collect::<Vec<_>>();

    let mime = file
        .mime()
        .filter(|m| allowed.contains(m))
        .ok_or_else(|| PrepError::UnsupportedType {
            mime_type: file.mime_type.clone(),
            allowed: allowed_types.join(", "),
        })?;

    if file.size() > max_source_bytes {
        return Err(PrepError::FileTooLarge {
            size: file.size(),
            limit: max_source_bytes,
        });
    }

    Ok(mime)
}

/// Centered crop of `source` at the configured ratio, rendered at output size.
///
/// The output width is capped at the crop's natural width so small sources
/// are not upscaled. Without a ratio the whole image passes through.
pub fn auto_crop(source: &SourceImage, settings: &CropSettings) -> Result<DynamicImage> {
    let Some(ratio) = settings.aspect_ratio else {
        return Ok(source.image.clone());
    };

    let rect = center_crop(source.width, source.height, ratio);
    let region = at_least_one_pixel(PixelRect::from_crop(&rect), source.width, source.height)
        .validated(source.width, source.height)?;
    let out_w = settings.output_width.min(region.width).max(1);
    let out_h = ((out_w as f32 / ratio).round() as u32).max(1);
    info!(
        x = region.x,
        y = region.y,
        width = region.width,
        height = region.height,
        out_w,
        out_h,
        "Auto-crop"
    );

    let mut surface = RenderSurface::new(out_w, out_h);
    surface.draw(&source.image, Some(region))?;
    Ok(DynamicImage::ImageRgba8(surface.into_image()))
}

/// Extreme ratios can round the short side of a centered crop to zero.
fn at_least_one_pixel(region: PixelRect, image_width: u32, image_height: u32) -> PixelRect {
    let width = region.width.clamp(1, image_width.max(1));
    let height = region.height.clamp(1, image_height.max(1));
    PixelRect {
        x: region.x.min(image_width.saturating_sub(width)),
        y: region.y.min(image_height.saturating_sub(height)),
        width,
        height,
    }
}

/// Run the non-interactive pipeline on `file`.
pub fn process(file: ImageFile, config: &WidgetConfig) -> Result<ProcessedImage> {
    process_with(file, config, &NoOpReporter, &CancelToken::new())
}

/// [`process`] with attempt reporting and cancellation.
pub fn process_with(
    file: ImageFile,
    config: &WidgetConfig,
    reporter: &dyn AttemptReporter,
    cancel: &CancelToken,
) -> Result<ProcessedImage> {
    config.validate()?;
    validate_file(&file, &config.allowed_types, config.max_source_bytes)?;

    let source = SourceImage::decode(file)?;
    let rendered = auto_crop(&source, &config.crop)?;
    if cancel.is_cancelled() {
        warn!("Cancelled before compression");
        return Err(PrepError::Cancelled);
    }

    let result = compress_with(&rendered, &source.file, &config.compression, reporter, cancel)?;
    Ok(result.into())
}
