use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CANVAS_MAX_HEIGHT, DEFAULT_CANVAS_MAX_WIDTH, DEFAULT_MIN_CROP_SIZE,
    DEFAULT_PREVIEW_WIDTH, PROFILE_SIZE,
};
use crate::error::{PrepError, Result};

/// Settings for one cropper instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropSettings {
    /// Width/height ratio to lock the crop to; `None` is free crop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f32>,
    /// Output width for ratio-locked crops. Height is `output_width / ratio`.
    #[serde(default = "default_output_width")]
    pub output_width: u32,
    /// Minimum crop side in canvas pixels.
    #[serde(default = "default_min_size")]
    pub min_size: f32,
    /// Largest display canvas; the source is scaled down to fit.
    #[serde(default = "default_canvas_max_width")]
    pub canvas_max_width: u32,
    #[serde(default = "default_canvas_max_height")]
    pub canvas_max_height: u32,
    /// Width of the live preview thumbnail.
    #[serde(default = "default_preview_width")]
    pub preview_width: u32,
}

fn default_output_width() -> u32 {
    PROFILE_SIZE
}
fn default_min_size() -> f32 {
    DEFAULT_MIN_CROP_SIZE
}
fn default_canvas_max_width() -> u32 {
    DEFAULT_CANVAS_MAX_WIDTH
}
fn default_canvas_max_height() -> u32 {
    DEFAULT_CANVAS_MAX_HEIGHT
}
fn default_preview_width() -> u32 {
    DEFAULT_PREVIEW_WIDTH
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: None,
            output_width: PROFILE_SIZE,
            min_size: DEFAULT_MIN_CROP_SIZE,
            canvas_max_width: DEFAULT_CANVAS_MAX_WIDTH,
            canvas_max_height: DEFAULT_CANVAS_MAX_HEIGHT,
            preview_width: DEFAULT_PREVIEW_WIDTH,
        }
    }
}

impl CropSettings {
    pub fn with_ratio(aspect_ratio: f32, output_width: u32) -> Self {
        Self {
            aspect_ratio: Some(aspect_ratio),
            output_width,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(r) = self.aspect_ratio {
            if !(r > 0.0 && r.is_finite()) {
                return Err(PrepError::InvalidConfig(format!(
                    "aspect ratio must be positive, got {r}"
                )));
            }
        }
        if self.output_width == 0 || self.preview_width == 0 {
            return Err(PrepError::InvalidConfig(
                "output and preview widths must be non-zero".into(),
            ));
        }
        if self.canvas_max_width == 0 || self.canvas_max_height == 0 {
            return Err(PrepError::InvalidConfig(
                "canvas bounds must be non-zero".into(),
            ));
        }
        if self.min_size.is_nan() || self.min_size < 0.0 {
            return Err(PrepError::InvalidConfig(format!(
                "min_size must be non-negative, got {}",
                self.min_size
            )));
        }
        Ok(())
    }
}
