pub mod config;
pub mod crop;
pub mod info;
pub mod process;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use imgprep_core::compress::OutputFormat;
use imgprep_core::widget::WidgetConfig;

#[derive(Clone, Copy, ValueEnum)]
pub enum PresetArg {
    /// No ratio, 1920x1080 bounds
    Free,
    /// Square 800x800
    Profile,
    /// 4:1 banner, 1200x300
    Cover,
}

impl PresetArg {
    pub fn config(self) -> WidgetConfig {
        match self {
            Self::Free => WidgetConfig::free_form(),
            Self::Profile => WidgetConfig::profile(),
            Self::Cover => WidgetConfig::cover(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Auto,
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Auto => OutputFormat::Auto,
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Webp => OutputFormat::Webp,
            FormatArg::Gif => OutputFormat::Gif,
        }
    }
}

/// Settings shared by `process` and `crop`. Flags override the config file,
/// which overrides the preset.
#[derive(Args)]
pub struct SettingsArgs {
    /// Widget config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Preset to start from when no config file is given
    #[arg(long, value_enum, default_value = "free")]
    pub preset: PresetArg,

    /// Lock the crop to this width/height ratio
    #[arg(long)]
    pub aspect: Option<f32>,

    /// Output width for ratio-locked crops
    #[arg(long)]
    pub output_width: Option<u32>,

    /// Target maximum size in KB
    #[arg(long)]
    pub max_size_kb: Option<u32>,

    /// Initial encoder quality (0.0-1.0]
    #[arg(long)]
    pub quality: Option<f32>,

    #[arg(long)]
    pub max_width: Option<u32>,

    #[arg(long)]
    pub max_height: Option<u32>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

impl SettingsArgs {
    pub fn resolve(&self) -> Result<WidgetConfig> {
        let mut config = match self.config {
            Some(ref path) => {
                let contents = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                toml::from_str(&contents).context("Invalid widget config")?
            }
            None => self.preset.config(),
        };

        if let Some(aspect) = self.aspect {
            config.crop.aspect_ratio = Some(aspect);
        }
        if let Some(w) = self.output_width {
            config.crop.output_width = w;
        }
        if let Some(kb) = self.max_size_kb {
            config.compression.max_size_kb = kb;
        }
        if let Some(q) = self.quality {
            config.compression.quality = q;
        }
        if let Some(w) = self.max_width {
            config.compression.max_width = w;
        }
        if let Some(h) = self.max_height {
            config.compression.max_height = h;
        }
        if let Some(f) = self.format {
            config.compression.output_format = f.into();
        }

        config.validate().context("Invalid settings")?;
        Ok(config)
    }
}

/// `<dir>/<stem>_prepared.<ext>` next to the source, named after the output.
pub fn default_output_path(source: &Path, output_name: &str) -> PathBuf {
    let output = Path::new(output_name);
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("jpg");
    let parent = source.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_prepared.{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_uses_output_extension() {
        let path = default_output_path(Path::new("/tmp/shots/photo.PNG"), "photo.jpg");
        assert_eq!(path, PathBuf::from("/tmp/shots/photo_prepared.jpg"));
    }

    #[test]
    fn test_flags_override_preset() {
        let args = SettingsArgs {
            config: None,
            preset: PresetArg::Cover,
            aspect: None,
            output_width: None,
            max_size_kb: Some(200),
            quality: Some(0.6),
            max_width: None,
            max_height: None,
            format: Some(FormatArg::Png),
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.crop.aspect_ratio, Some(4.0));
        assert_eq!(config.compression.max_size_kb, 200);
        assert_eq!(config.compression.quality, 0.6);
        assert_eq!(config.compression.output_format, OutputFormat::Png);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let args = SettingsArgs {
            config: None,
            preset: PresetArg::Free,
            aspect: Some(-2.0),
            output_width: None,
            max_size_kb: None,
            quality: None,
            max_width: None,
            max_height: None,
            format: None,
        };
        assert!(args.resolve().is_err());
    }
}
