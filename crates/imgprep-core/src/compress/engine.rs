use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info, warn};

use crate::consts::{MAX_COMPRESSION_ATTEMPTS, MIN_QUALITY, QUALITY_STEP};
use crate::error::{PrepError, Result};
use crate::file::{ImageFile, ImageMime};
use crate::geometry::fit_within;

use super::config::{CompressionConfig, OutputFormat};
use super::encoder::{encode, supports_quality};
use super::naming::output_file_name;
use super::stats::CompressionStats;
use super::surface::RenderSurface;

/// Outcome of one compression run. A re-run produces a new value.
#[derive(Clone, Debug)]
pub struct CompressionResult {
    pub output_file: ImageFile,
    pub original_size: u64,
    pub compressed_size: u64,
    pub compression_ratio: f64,
    /// Number of encodes performed (1..=10).
    pub attempts: u32,
    /// Quality used for the accepted encoding.
    pub final_quality: f32,
    pub format: ImageMime,
    pub width: u32,
    pub height: u32,
}

impl CompressionResult {
    pub fn stats(&self) -> CompressionStats {
        CompressionStats::new(self.original_size, self.compressed_size)
    }

    /// False when the budget could not be reached even at the floor quality.
    pub fn budget_met(&self, config: &CompressionConfig) -> bool {
        self.compressed_size <= config.budget_bytes()
    }
}

/// Receives a callback after every encode attempt.
///
/// This is where a host regains control between attempts (to repaint, poll
/// input, or cancel). All methods default to no-ops.
pub trait AttemptReporter {
    fn on_attempt(&self, _attempt: u32, _quality: f32, _bytes: u64) {}
}

impl<F: Fn(u32, f32, u64)> AttemptReporter for F {
    fn on_attempt(&self, attempt: u32, quality: f32, bytes: u64) {
        self(attempt, quality, bytes)
    }
}

/// Reporter that ignores every attempt.
pub struct NoOpReporter;
impl AttemptReporter for NoOpReporter {}

/// Shared flag checked between compression attempts.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Pick the concrete encoding for `requested`.
///
/// `Auto` keeps PNG only for PNG sources that contain a non-opaque pixel on
/// the rendered surface; everything else becomes JPEG.
pub fn resolve_format(
    requested: OutputFormat,
    original: &ImageFile,
    surface: &RenderSurface,
) -> ImageMime {
    match requested.mime() {
        Some(mime) => mime,
        None => {
            if original.mime() == Some(ImageMime::Png) && surface.has_transparency() {
                ImageMime::Png
            } else {
                ImageMime::Jpeg
            }
        }
    }
}

fn next_quality(quality: f32) -> f32 {
    (((quality - QUALITY_STEP) * 100.0).round() / 100.0).max(MIN_QUALITY)
}

/// Compress `source` for `original` under `config`.
pub fn compress(
    source: &DynamicImage,
    original: &ImageFile,
    config: &CompressionConfig,
) -> Result<CompressionResult> {
    compress_with(source, original, config, &NoOpReporter, &CancelToken::new())
}

/// Compress with attempt reporting and cooperative cancellation.
///
/// The source is scaled down (never up) to fit `max_width x max_height`, then
/// encoded starting at `config.quality`. Each encode over budget lowers the
/// quality by 0.1 (floor 0.1) for at most 10 attempts; the last encoding is
/// accepted even if it is still over budget. Cancellation is honoured before
/// the first encode and between attempts.
pub fn compress_with(
    source: &DynamicImage,
    original: &ImageFile,
    config: &CompressionConfig,
    reporter: &dyn AttemptReporter,
    cancel: &CancelToken,
) -> Result<CompressionResult> {
    config.validate()?;
    if cancel.is_cancelled() {
        return Err(PrepError::Cancelled);
    }

    let (src_w, src_h) = source.dimensions();
    let (width, height) = fit_within(src_w, src_h, config.max_width, config.max_height);
    if (width, height) != (src_w, src_h) {
        debug!(src_w, src_h, width, height, "Downscaling to output bounds");
    }

    let mut surface = RenderSurface::new(width, height);
    surface.draw(source, None)?;

    let format = resolve_format(config.output_format, original, &surface);
    let budget = config.budget_bytes();
    info!(
        name = %original.name,
        original_size = original.size(),
        %format,
        budget,
        "Compressing"
    );

    let mut quality = config.quality;
    let mut attempts = 0u32;
    let encoded = loop {
        attempts += 1;
        let bytes = encode(surface.pixels(), format, quality)?;
        let size = bytes.len() as u64;
        debug!(attempt = attempts, quality, size, "Encoded");
        reporter.on_attempt(attempts, quality, size);

        if size <= budget || attempts >= MAX_COMPRESSION_ATTEMPTS || !supports_quality(format) {
            break bytes;
        }
        if cancel.is_cancelled() {
            info!(attempts, "Compression cancelled");
            return Err(PrepError::Cancelled);
        }
        quality = next_quality(quality);
    };

    let compressed_size = encoded.len() as u64;
    if compressed_size > budget {
        warn!(
            compressed_size,
            budget, attempts, "Budget not met; keeping lowest-quality encoding"
        );
    }

    let stats = CompressionStats::new(original.size(), compressed_size);
    info!(
        compressed_size,
        attempts,
        ratio = stats.compression_ratio,
        "Compression finished"
    );

    Ok(CompressionResult {
        output_file: ImageFile::new(
            output_file_name(&original.name, format),
            format.as_str(),
            encoded,
        ),
        original_size: stats.original_size,
        compressed_size,
        compression_ratio: stats.compression_ratio,
        attempts,
        final_quality: quality,
        format,
        width,
        height,
    })
}
