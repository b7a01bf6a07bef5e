use crate::error::{PrepError, Result};

/// Width/height of the surface a crop rectangle must stay inside.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }
}

/// A crop rectangle in canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CropRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Width divided by height, or 0 for a degenerate rectangle.
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// True when the rectangle lies fully inside `bounds`, allowing `tol`
    /// of floating-point slack on each edge.
    pub fn fits_within(&self, bounds: Bounds, tol: f32) -> bool {
        self.x >= -tol
            && self.y >= -tol
            && self.right() <= bounds.width + tol
            && self.bottom() <= bounds.height + tol
    }

    /// Map from canvas space to natural image pixels.
    ///
    /// `scale` is the display factor (`canvas = natural * scale`). The result
    /// is rounded and clipped to the natural image size.
    pub fn to_pixels(&self, scale: f32, natural_width: u32, natural_height: u32) -> Result<PixelRect> {
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(PrepError::InvalidCrop(format!(
                "display scale must be positive, got {scale}"
            )));
        }

        let x = (self.x / scale).round().max(0.0) as u32;
        let y = (self.y / scale).round().max(0.0) as u32;
        let x = x.min(natural_width.saturating_sub(1));
        let y = y.min(natural_height.saturating_sub(1));
        let w = ((self.width / scale).round().max(1.0) as u32).min(natural_width - x);
        let h = ((self.height / scale).round().max(1.0) as u32).min(natural_height - y);

        PixelRect {
            x,
            y,
            width: w,
            height: h,
        }
        .validated(natural_width, natural_height)
    }
}

/// A rectangle in natural image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Check that the rectangle is non-empty and fits within the source.
    pub fn validated(&self, src_w: u32, src_h: u32) -> Result<PixelRect> {
        if self.width == 0 || self.height == 0 {
            return Err(PrepError::InvalidCrop(
                "Crop width and height must be > 0".into(),
            ));
        }

        if self.x + self.width > src_w || self.y + self.height > src_h {
            return Err(PrepError::InvalidCrop(format!(
                "Crop region ({},{} {}x{}) exceeds source dimensions ({src_w}x{src_h})",
                self.x, self.y, self.width, self.height
            )));
        }

        Ok(*self)
    }

    /// Round a canvas-space rectangle whose scale is 1.
    pub fn from_crop(rect: &CropRect) -> Self {
        Self {
            x: rect.x.round().max(0.0) as u32,
            y: rect.y.round().max(0.0) as u32,
            width: rect.width.round().max(0.0) as u32,
            height: rect.height.round().max(0.0) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixels_scales_back() {
        let rect = CropRect::new(10.0, 20.0, 100.0, 50.0);
        let px = rect.to_pixels(0.5, 1000, 1000).unwrap();
        assert_eq!(
            px,
            PixelRect {
                x: 20,
                y: 40,
                width: 200,
                height: 100
            }
        );
    }

    #[test]
    fn test_to_pixels_clips_to_source() {
        let rect = CropRect::new(90.0, 0.0, 20.0, 10.0);
        let px = rect.to_pixels(1.0, 100, 100).unwrap();
        assert_eq!(px.x + px.width, 100);
    }

    #[test]
    fn test_validated_rejects_empty() {
        let px = PixelRect {
            x: 0,
            y: 0,
            width: 0,
            height: 5,
        };
        assert!(px.validated(10, 10).is_err());
    }
}
