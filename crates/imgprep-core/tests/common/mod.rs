#![allow(dead_code)]

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

use imgprep_core::file::ImageFile;

/// Smooth diagonal gradient. Compresses well and re-encodes stably.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        let b = ((x + y) * 127 / (width + height).max(1)) as u8;
        Rgb([r, g, b])
    })
}

/// Deterministic pseudo-random noise. Compresses badly.
pub fn noise(width: u32, height: u32) -> RgbImage {
    let mut state = 0x2545_f491_u32;
    RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state & 0xff) as u8
        };
        Rgb([next(), next(), next()])
    })
}

/// Opaque gradient with a fully transparent square in the middle.
pub fn with_hole(width: u32, height: u32) -> RgbaImage {
    let base = gradient(width, height);
    RgbaImage::from_fn(width, height, |x, y| {
        let Rgb([r, g, b]) = *base.get_pixel(x, y);
        let inside = x > width / 4 && x < 3 * width / 4 && y > height / 4 && y < 3 * height / 4;
        Rgba([r, g, b, if inside { 0 } else { 255 }])
    })
}

pub fn jpeg_file(name: &str, img: &RgbImage, quality: u8) -> ImageFile {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality)
        .encode_image(img)
        .unwrap();
    ImageFile::new(name, "image/jpeg", bytes)
}

pub fn png_file(name: &str, img: DynamicImage) -> ImageFile {
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::Png).unwrap();
    ImageFile::new(name, "image/png", cursor.into_inner())
}

pub fn decode_dimensions(file: &ImageFile) -> (u32, u32) {
    let img = image::load_from_memory(&file.bytes).unwrap();
    (img.width(), img.height())
}
