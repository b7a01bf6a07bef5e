//! In-memory image files as exchanged with the host form.

use std::fmt;
use std::io::Cursor;
use std::path::Path;

use image::{ColorType, ImageDecoder, ImageFormat, ImageReader};

use crate::error::{PrepError, Result};

/// Image MIME types the pipeline understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageMime {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageMime {
    pub const ALL: [ImageMime; 4] = [Self::Jpeg, Self::Png, Self::Gif, Self::Webp];

    /// Parse a MIME string such as `image/png`. `image/jpg` is accepted as
    /// an alias for JPEG.
    pub fn parse(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Webp => ImageFormat::WebP,
        }
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Gif => Some(Self::Gif),
            ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        ImageFormat::from_extension(ext).and_then(Self::from_image_format)
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named binary blob with a declared MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, taking the MIME type from its content and
    /// falling back to the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        let mime = image::guess_format(&bytes)
            .ok()
            .and_then(ImageMime::from_image_format)
            .or_else(|| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .and_then(ImageMime::from_extension)
            })
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Ok(Self::new(name, mime, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn mime(&self) -> Option<ImageMime> {
        ImageMime::parse(&self.mime_type)
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Header-level facts about an image file.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageInfo {
    pub format: ImageMime,
    pub width: u32,
    pub height: u32,
    pub color_type: ColorType,
    pub file_size: u64,
}

impl ImageInfo {
    /// Inspect format and dimensions without decoding pixel data.
    pub fn probe(file: &ImageFile) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(&file.bytes))
            .with_guessed_format()
            .map_err(|e| PrepError::Decode(e.to_string()))?;
        let format = reader
            .format()
            .and_then(ImageMime::from_image_format)
            .ok_or_else(|| PrepError::Decode(format!("unrecognised image data in {}", file.name)))?;

        let decoder = reader
            .into_decoder()
            .map_err(|e| PrepError::Decode(e.to_string()))?;
        let (width, height) = decoder.dimensions();
        let color_type = decoder.color_type();

        Ok(Self {
            format,
            width,
            height,
            color_type,
            file_size: file.size(),
        })
    }

    pub fn file_size_kb(&self) -> f64 {
        self.file_size as f64 / 1024.0
    }

    pub fn file_size_mb(&self) -> f64 {
        self.file_size as f64 / (1024.0 * 1024.0)
    }

    pub fn has_alpha(&self) -> bool {
        self.color_type.has_alpha()
    }
}

/// Decode `file` into pixels, reporting failures as [`PrepError::Decode`].
pub fn decode(file: &ImageFile) -> Result<image::DynamicImage> {
    let reader = ImageReader::new(Cursor::new(&file.bytes))
        .with_guessed_format()
        .map_err(|e| PrepError::Decode(format!("{}: {e}", file.name)))?;
    reader
        .decode()
        .map_err(|e| PrepError::Decode(format!("{}: {e}", file.name)))
}
