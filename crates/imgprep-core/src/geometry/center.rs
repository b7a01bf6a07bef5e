use crate::consts::{ASPECT_TOLERANCE, INITIAL_CROP_FRACTION};

use super::rect::CropRect;

/// Whether two aspect ratios are equal within [`ASPECT_TOLERANCE`] (relative).
pub fn ratios_match(a: f32, b: f32) -> bool {
    (a - b).abs() <= ASPECT_TOLERANCE * b.abs().max(a.abs())
}

fn usable_ratio(ratio: Option<f32>) -> Option<f32> {
    ratio.filter(|r| *r > 0.0 && r.is_finite())
}

/// Largest centered rectangle of `aspect_ratio` that fits inside the image.
///
/// A relatively wider image is trimmed left/right, a taller one top/bottom.
/// A non-positive ratio, or one matching the image, yields the full image.
pub fn center_crop(image_width: u32, image_height: u32, aspect_ratio: f32) -> CropRect {
    let w = image_width as f32;
    let h = image_height as f32;
    let full = CropRect::new(0.0, 0.0, w, h);

    let Some(ratio) = usable_ratio(Some(aspect_ratio)) else {
        return full;
    };
    if image_width == 0 || image_height == 0 {
        return full;
    }

    let image_ratio = w / h;
    if ratios_match(image_ratio, ratio) {
        return full;
    }

    if image_ratio > ratio {
        let crop_w = h * ratio;
        CropRect::new((w - crop_w) / 2.0, 0.0, crop_w, h)
    } else {
        let crop_h = w / ratio;
        CropRect::new(0.0, (h - crop_h) / 2.0, w, crop_h)
    }
}

/// Starting rectangle for the interactive editor.
///
/// With a ratio: 80% of the limiting canvas dimension, shaped to the ratio.
/// Free crop: 80% of each dimension. Always centered.
pub fn initial_crop_area(canvas_width: f32, canvas_height: f32, aspect_ratio: Option<f32>) -> CropRect {
    let max_w = canvas_width * INITIAL_CROP_FRACTION;
    let max_h = canvas_height * INITIAL_CROP_FRACTION;

    let (w, h) = match usable_ratio(aspect_ratio) {
        Some(ratio) => {
            let mut w = max_w;
            let mut h = w / ratio;
            if h > max_h {
                h = max_h;
                w = h * ratio;
            }
            (w, h)
        }
        None => (max_w, max_h),
    };

    CropRect::new((canvas_width - w) / 2.0, (canvas_height - h) / 2.0, w, h)
}

/// Scale `(width, height)` down so neither bound is exceeded, keeping the
/// aspect ratio. Images already inside the bounds are returned unchanged.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_w = ((width as f64 * scale).round() as u32).clamp(1, max_width.max(1));
    let new_h = ((height as f64 * scale).round() as u32).clamp(1, max_height.max(1));
    (new_w, new_h)
}
