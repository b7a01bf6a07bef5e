use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

use crate::error::Result;
use crate::geometry::PixelRect;

/// Off-screen RGBA raster the compressor draws into before encoding.
///
/// One surface belongs to one compression call; every draw clears it first
/// so nothing from a previous frame is composited in.
pub struct RenderSurface {
    canvas: RgbaImage,
    filter: FilterType,
}

impl RenderSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            filter: FilterType::Triangle,
        }
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn clear(&mut self) {
        for px in self.canvas.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    /// Draw `region` of `source` (or all of it) scaled to fill the surface.
    pub fn draw(&mut self, source: &DynamicImage, region: Option<PixelRect>) -> Result<()> {
        self.clear();

        let (src_w, src_h) = source.dimensions();
        let region = match region {
            Some(r) => r.validated(src_w, src_h)?,
            None => PixelRect {
                x: 0,
                y: 0,
                width: src_w,
                height: src_h,
            }
            .validated(src_w, src_h)?,
        };

        let cropped = source.crop_imm(region.x, region.y, region.width, region.height);
        let scaled = if cropped.width() == self.width() && cropped.height() == self.height() {
            cropped.to_rgba8()
        } else {
            imageops::resize(&cropped.to_rgba8(), self.width(), self.height(), self.filter)
        };

        imageops::replace(&mut self.canvas, &scaled, 0, 0);
        Ok(())
    }

    /// True if any pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.canvas.pixels().any(|p| p.0[3] < u8::MAX)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }
}
