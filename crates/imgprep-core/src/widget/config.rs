use serde::{Deserialize, Serialize};

use crate::compress::CompressionConfig;
use crate::consts::{
    COVER_ASPECT_RATIO, COVER_HEIGHT, COVER_WIDTH, DEFAULT_ALLOWED_TYPES, MAX_SOURCE_BYTES,
    PROFILE_ASPECT_RATIO, PROFILE_SIZE,
};
use crate::cropper::CropSettings;
use crate::error::{PrepError, Result};
use crate::file::ImageMime;

/// Everything the host supplies when binding a widget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(flatten)]
    pub compression: CompressionConfig,
    #[serde(flatten)]
    pub crop: CropSettings,
    /// Open the interactive cropper instead of auto-cropping.
    #[serde(default)]
    pub interactive: bool,
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
    /// Raw size ceiling checked before decoding.
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: u64,
}

fn default_allowed_types() -> Vec<String> {
    DEFAULT_ALLOWED_TYPES.iter().map(|s| s.to_string()).collect()
}
fn default_max_source_bytes() -> u64 {
    MAX_SOURCE_BYTES
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            compression: CompressionConfig::default(),
            crop: CropSettings::default(),
            interactive: false,
            allowed_types: default_allowed_types(),
            max_source_bytes: MAX_SOURCE_BYTES,
        }
    }
}

impl WidgetConfig {
    /// Free-form upload: no ratio, 1920x1080 bounds, auto path.
    pub fn free_form() -> Self {
        Self::default()
    }

    /// Square profile picture, 800x800, interactive crop.
    pub fn profile() -> Self {
        Self {
            compression: CompressionConfig::with_bounds(PROFILE_SIZE, PROFILE_SIZE),
            crop: CropSettings::with_ratio(PROFILE_ASPECT_RATIO, PROFILE_SIZE),
            interactive: true,
            ..Self::default()
        }
    }

    /// 4:1 cover image, 1200x300, interactive crop.
    pub fn cover() -> Self {
        Self {
            compression: CompressionConfig::with_bounds(COVER_WIDTH, COVER_HEIGHT),
            crop: CropSettings::with_ratio(COVER_ASPECT_RATIO, COVER_WIDTH),
            interactive: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.compression.validate()?;
        self.crop.validate()?;

        if self.allowed_types.is_empty() {
            return Err(PrepError::InvalidConfig("allowed_types is empty".into()));
        }
        if let Some(bad) = self
            .allowed_types
            .iter()
            .find(|t| ImageMime::parse(t).is_none())
        {
            return Err(PrepError::InvalidConfig(format!(
                "unsupported type in allowed_types: {bad}"
            )));
        }
        if self.max_source_bytes == 0 {
            return Err(PrepError::InvalidConfig(
                "max_source_bytes must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
