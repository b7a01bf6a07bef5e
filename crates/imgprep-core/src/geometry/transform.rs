use super::rect::{Bounds, CropRect};

/// Position of a resize handle on the crop rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

/// Which end of an axis a handle moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Low,
    High,
}

impl Handle {
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomRight | Self::BottomLeft
        )
    }

    fn horizontal(self) -> Option<Side> {
        match self {
            Self::TopLeft | Self::Left | Self::BottomLeft => Some(Side::Low),
            Self::TopRight | Self::Right | Self::BottomRight => Some(Side::High),
            Self::Top | Self::Bottom => None,
        }
    }

    fn vertical(self) -> Option<Side> {
        match self {
            Self::TopLeft | Self::Top | Self::TopRight => Some(Side::Low),
            Self::BottomLeft | Self::Bottom | Self::BottomRight => Some(Side::High),
            Self::Left | Self::Right => None,
        }
    }

    /// Canvas position of this handle on `rect`.
    pub fn position(self, rect: &CropRect) -> (f32, f32) {
        let x = match self.horizontal() {
            Some(Side::Low) => rect.x,
            Some(Side::High) => rect.right(),
            None => rect.x + rect.width / 2.0,
        };
        let y = match self.vertical() {
            Some(Side::Low) => rect.y,
            Some(Side::High) => rect.bottom(),
            None => rect.y + rect.height / 2.0,
        };
        (x, y)
    }
}

/// What a pointer lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Handle(Handle),
    Body,
}

/// Hit-test handles first (within `tolerance`), then the rectangle body.
pub fn hit_test(rect: &CropRect, px: f32, py: f32, tolerance: f32) -> Option<Hit> {
    let handle = Handle::ALL.into_iter().find(|h| {
        let (hx, hy) = h.position(rect);
        (px - hx).abs() <= tolerance && (py - hy).abs() <= tolerance
    });

    match handle {
        Some(h) => Some(Hit::Handle(h)),
        None if rect.contains(px, py) => Some(Hit::Body),
        None => None,
    }
}

/// Move `rect` by `(dx, dy)` and clamp it inside `bounds`. Size is preserved.
pub fn translate(rect: &CropRect, dx: f32, dy: f32, bounds: Bounds) -> CropRect {
    let dx = if dx.is_finite() { dx } else { 0.0 };
    let dy = if dy.is_finite() { dy } else { 0.0 };

    let max_x = (bounds.width - rect.width).max(0.0);
    let max_y = (bounds.height - rect.height).max(0.0);

    CropRect {
        x: (rect.x + dx).clamp(0.0, max_x),
        y: (rect.y + dy).clamp(0.0, max_y),
        width: rect.width,
        height: rect.height,
    }
}

/// One axis of the rectangle as a `[lo, hi]` interval.
#[derive(Clone, Copy, Debug)]
struct Span {
    lo: f32,
    hi: f32,
}

impl Span {
    fn len(&self) -> f32 {
        self.hi - self.lo
    }

    /// Resize keeping the non-moving end fixed.
    fn set_len(&mut self, len: f32, moving: Side) {
        match moving {
            Side::High => self.hi = self.lo + len,
            Side::Low => self.lo = self.hi - len,
        }
    }

    fn nudge(&mut self, delta: f32, side: Option<Side>) {
        match side {
            Some(Side::Low) => self.lo += delta,
            Some(Side::High) => self.hi += delta,
            None => {}
        }
    }

    /// Clip to `[0, limit]`. Returns true if anything was cut.
    fn clamp_to(&mut self, limit: f32) -> bool {
        let mut clipped = false;
        if self.lo < 0.0 {
            self.lo = 0.0;
            clipped = true;
        }
        if self.hi > limit {
            self.hi = limit;
            clipped = true;
        }
        clipped
    }

    /// Grow back to `min` without leaving `[0, limit]`; slides the span if
    /// the moving end is pinned against a bound. Requires `min <= limit`.
    fn ensure_min(&mut self, min: f32, limit: f32, moving: Side) {
        if self.len() >= min {
            return;
        }
        self.set_len(min, moving);
        if self.lo < 0.0 {
            self.lo = 0.0;
            self.hi = min;
        }
        if self.hi > limit {
            self.hi = limit;
            self.lo = limit - min;
        }
    }
}

/// Resize `rect` by dragging `handle` by `(dx, dy)`.
///
/// The edge or corner opposite the handle stays put. With an aspect ratio,
/// edge handles derive the cross dimension and corner handles derive height
/// from width. Sides are then held to `min_size` and the result is clipped to
/// `bounds`; clipping a ratio-locked rectangle shrinks both dimensions
/// together. When the bounds are too small to satisfy both ratio and minimum
/// size, staying inside the bounds wins.
pub fn resize(
    rect: &CropRect,
    handle: Handle,
    dx: f32,
    dy: f32,
    bounds: Bounds,
    aspect_ratio: Option<f32>,
    min_size: f32,
) -> CropRect {
    let dx = if dx.is_finite() { dx } else { 0.0 };
    let dy = if dy.is_finite() { dy } else { 0.0 };
    let ratio = aspect_ratio.filter(|r| *r > 0.0 && r.is_finite());

    let min_size = min_size.max(0.0).min(bounds.width).min(bounds.height);
    let (min_w, min_h) = match ratio {
        Some(r) => {
            let w = min_size.max(min_size * r).min(bounds.width);
            (w, (w / r).max(min_size).min(bounds.height))
        }
        None => (min_size, min_size),
    };

    let h_side = handle.horizontal();
    let v_side = handle.vertical();
    let h_moving = h_side.unwrap_or(Side::High);
    let v_moving = v_side.unwrap_or(Side::High);

    let mut horiz = Span {
        lo: rect.x,
        hi: rect.right(),
    };
    let mut vert = Span {
        lo: rect.y,
        hi: rect.bottom(),
    };
    horiz.nudge(dx, h_side);
    vert.nudge(dy, v_side);

    match ratio {
        Some(r) if h_side.is_some() => {
            let w = horiz.len().max(min_w);
            horiz.set_len(w, h_moving);
            vert.set_len(w / r, v_moving);
        }
        Some(r) => {
            let h = vert.len().max(min_h);
            vert.set_len(h, v_moving);
            horiz.set_len(h * r, h_moving);
        }
        None => {
            horiz.set_len(horiz.len().max(min_w), h_moving);
            vert.set_len(vert.len().max(min_h), v_moving);
        }
    }

    let h_clipped = horiz.clamp_to(bounds.width);
    let v_clipped = vert.clamp_to(bounds.height);

    if let Some(r) = ratio {
        if h_clipped || v_clipped {
            let w = horiz.len();
            let h = vert.len();
            if w > h * r {
                horiz.set_len(h * r, h_moving);
            } else if h > w / r {
                vert.set_len(w / r, v_moving);
            }
        }
    }

    horiz.ensure_min(min_w, bounds.width, h_moving);
    vert.ensure_min(min_h, bounds.height, v_moving);

    CropRect {
        x: horiz.lo,
        y: vert.lo,
        width: horiz.len(),
        height: vert.len(),
    }
}
