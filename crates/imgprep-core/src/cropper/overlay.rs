use image::{Rgba, RgbaImage};

use crate::consts::{HANDLE_DRAW_SIZE, OVERLAY_DIM_ALPHA};
use crate::geometry::{CropRect, Handle, PixelRect};

const BORDER_COLOR: Rgba<u8> = Rgba([255, 255, 0, 255]);
const HANDLE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Compose the editor view: the canvas dimmed outside `rect`, a one-pixel
/// border around it and a square on each of the 8 handles.
pub fn render_overlay(canvas: &RgbaImage, rect: &CropRect) -> RgbaImage {
    let mut out = canvas.clone();
    let (w, h) = out.dimensions();
    if w == 0 || h == 0 {
        return out;
    }

    let crop = PixelRect::from_crop(rect);
    let inside = |x: u32, y: u32| {
        x >= crop.x && x < crop.x + crop.width && y >= crop.y && y < crop.y + crop.height
    };

    let keep = 255 - OVERLAY_DIM_ALPHA as u32;
    for (x, y, px) in out.enumerate_pixels_mut() {
        if !inside(x, y) {
            for c in &mut px.0[..3] {
                *c = (*c as u32 * keep / 255) as u8;
            }
        }
    }

    draw_border(&mut out, &crop);
    for handle in Handle::ALL {
        let (hx, hy) = handle.position(rect);
        draw_square(&mut out, hx, hy, HANDLE_DRAW_SIZE, HANDLE_COLOR);
    }
    out
}

fn draw_border(img: &mut RgbaImage, crop: &PixelRect) {
    let (w, h) = img.dimensions();
    if crop.width == 0 || crop.height == 0 {
        return;
    }
    let right = (crop.x + crop.width - 1).min(w - 1);
    let bottom = (crop.y + crop.height - 1).min(h - 1);
    let left = crop.x.min(w - 1);
    let top = crop.y.min(h - 1);

    for x in left..=right {
        img.put_pixel(x, top, BORDER_COLOR);
        img.put_pixel(x, bottom, BORDER_COLOR);
    }
    for y in top..=bottom {
        img.put_pixel(left, y, BORDER_COLOR);
        img.put_pixel(right, y, BORDER_COLOR);
    }
}

fn draw_square(img: &mut RgbaImage, cx: f32, cy: f32, size: u32, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    let half = size as f32 / 2.0;
    let x0 = (cx - half).round().max(0.0) as u32;
    let y0 = (cy - half).round().max(0.0) as u32;
    for y in y0..(y0 + size).min(h) {
        for x in x0..(x0 + size).min(w) {
            img.put_pixel(x, y, color);
        }
    }
}
