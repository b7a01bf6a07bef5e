use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, Rgb, RgbImage, RgbaImage};

use crate::error::{PrepError, Result};
use crate::file::ImageMime;

/// Whether the encoder for `format` honours a quality setting.
///
/// The PNG, GIF and WebP encoders available here are lossless, so re-encoding
/// at a lower quality produces identical bytes.
pub fn supports_quality(format: ImageMime) -> bool {
    matches!(format, ImageMime::Jpeg)
}

/// Map a `(0, 1]` quality onto the JPEG encoder's 1..=100 scale.
pub(crate) fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode the surface pixels as `format`.
pub(crate) fn encode(pixels: &RgbaImage, format: ImageMime, quality: f32) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    match format {
        ImageMime::Jpeg => {
            let rgb = flatten_onto_white(pixels);
            let mut encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality));
            encoder
                .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                .map_err(|e| PrepError::Encode(format!("JPEG: {e}")))?;
        }
        ImageMime::Png => {
            let image = if is_opaque(pixels) {
                DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(pixels.clone()).to_rgb8())
            } else {
                DynamicImage::ImageRgba8(pixels.clone())
            };
            write_with(&image, &mut buf, ImageFormat::Png)?;
        }
        ImageMime::Webp => {
            write_with(&DynamicImage::ImageRgba8(pixels.clone()), &mut buf, ImageFormat::WebP)?;
        }
        ImageMime::Gif => {
            write_with(&DynamicImage::ImageRgba8(pixels.clone()), &mut buf, ImageFormat::Gif)?;
        }
    }

    if buf.is_empty() {
        return Err(PrepError::Encode(format!("{format} encoder produced no data")));
    }
    Ok(buf)
}

fn write_with(image: &DynamicImage, buf: &mut Vec<u8>, format: ImageFormat) -> Result<()> {
    image
        .write_to(&mut Cursor::new(buf), format)
        .map_err(|e| PrepError::Encode(format!("{format:?}: {e}")))
}

fn is_opaque(pixels: &RgbaImage) -> bool {
    pixels.pixels().all(|p| p.0[3] == u8::MAX)
}

/// Composite onto a white background; JPEG has no alpha channel.
fn flatten_onto_white(pixels: &RgbaImage) -> RgbImage {
    let mut out = RgbImage::new(pixels.width(), pixels.height());
    for (src, dst) in pixels.pixels().zip(out.pixels_mut()) {
        let [r, g, b, a] = src.0;
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        *dst = Rgb([blend(r), blend(g), blend(b)]);
    }
    out
}
