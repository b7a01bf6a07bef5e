use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_MAX_HEIGHT, DEFAULT_MAX_SIZE_KB, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY,
};
use crate::error::{PrepError, Result};
use crate::file::ImageMime;

/// Requested output encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JPEG, unless the source is a PNG with transparent pixels.
    #[default]
    Auto,
    Jpeg,
    Png,
    /// Lossless with the bundled encoder: one attempt, the budget is not
    /// searched.
    Webp,
    Gif,
}

impl OutputFormat {
    /// The fixed MIME type for an explicit format; `None` for `Auto`.
    pub fn mime(self) -> Option<ImageMime> {
        match self {
            Self::Auto => None,
            Self::Jpeg => Some(ImageMime::Jpeg),
            Self::Png => Some(ImageMime::Png),
            Self::Webp => Some(ImageMime::Webp),
            Self::Gif => Some(ImageMime::Gif),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
            Self::Webp => write!(f, "webp"),
            Self::Gif => write!(f, "gif"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::Webp),
            "gif" => Ok(Self::Gif),
            other => Err(PrepError::InvalidConfig(format!(
                "unknown output format: {other} (expected auto, jpeg, png, webp or gif)"
            ))),
        }
    }
}

/// Per-session compression settings. Missing fields take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompressionConfig {
    /// Target maximum output size in kilobytes.
    #[serde(default = "default_max_size_kb")]
    pub max_size_kb: u32,
    /// Initial encoder quality in (0, 1].
    #[serde(default = "default_quality")]
    pub quality: f32,
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    #[serde(default = "default_max_height")]
    pub max_height: u32,
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_max_size_kb() -> u32 {
    DEFAULT_MAX_SIZE_KB
}
fn default_quality() -> f32 {
    DEFAULT_QUALITY
}
fn default_max_width() -> u32 {
    DEFAULT_MAX_WIDTH
}
fn default_max_height() -> u32 {
    DEFAULT_MAX_HEIGHT
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            max_size_kb: DEFAULT_MAX_SIZE_KB,
            quality: DEFAULT_QUALITY,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            output_format: OutputFormat::Auto,
        }
    }
}

impl CompressionConfig {
    /// Free-form uploads: 1920x1080, 1 MB, quality 0.8.
    pub fn free_form() -> Self {
        Self::default()
    }

    /// Same defaults with different output bounds.
    pub fn with_bounds(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            ..Self::default()
        }
    }

    pub fn budget_bytes(&self) -> u64 {
        self.max_size_kb as u64 * 1024
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(PrepError::InvalidConfig(format!(
                "quality must be in (0, 1], got {}",
                self.quality
            )));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(PrepError::InvalidConfig(format!(
                "output bounds must be non-zero, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        if self.max_size_kb == 0 {
            return Err(PrepError::InvalidConfig(
                "max_size_kb must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
