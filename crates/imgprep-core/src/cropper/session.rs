use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};
use tracing::{debug, info, warn};

use crate::compress::{
    compress_with, AttemptReporter, CancelToken, CompressionConfig, CompressionResult,
    RenderSurface,
};
use crate::consts::HANDLE_HIT_TOLERANCE;
use crate::error::{PrepError, Result};
use crate::file::{decode, ImageFile};
use crate::geometry::{
    hit_test, initial_crop_area, resize, translate, Bounds, CropRect, Hit, PixelRect,
};

use super::config::CropSettings;
use super::overlay::render_overlay;
use super::state::{CropperState, CursorHint, Gesture};

/// A decoded source image and the file it came from.
pub struct SourceImage {
    pub file: ImageFile,
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
}

impl SourceImage {
    pub fn decode(file: ImageFile) -> Result<Self> {
        let image = decode(&file)?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PrepError::Decode(format!("{} has no pixels", file.name)));
        }
        Ok(Self {
            file,
            image,
            width,
            height,
        })
    }
}

/// Everything owned while the modal is open.
struct CropSession {
    source: SourceImage,
    /// Source scaled to the display canvas.
    canvas: RgbaImage,
    /// `canvas = natural * scale`, never above 1.
    scale: f32,
    rect: CropRect,
    gesture: Option<Gesture>,
}

impl CropSession {
    fn bounds(&self) -> Bounds {
        Bounds::from_dimensions(self.canvas.width(), self.canvas.height())
    }
}

/// Interactive crop editor driven by canvas-space pointer events.
pub struct Cropper {
    settings: CropSettings,
    state: CropperState,
    session: Option<CropSession>,
}

impl Cropper {
    pub fn new(settings: CropSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            state: CropperState::Closed,
            session: None,
        })
    }

    pub fn settings(&self) -> &CropSettings {
        &self.settings
    }

    pub fn state(&self) -> CropperState {
        self.state
    }

    /// Decode `file`, fit it to the canvas and place the initial crop area.
    ///
    /// A decode failure leaves the cropper closed.
    pub fn open(&mut self, file: ImageFile) -> Result<()> {
        if self.state.is_open() {
            return Err(PrepError::InvalidState(format!(
                "cropper is already {}",
                self.state
            )));
        }
        self.close();

        let source = SourceImage::decode(file)?;
        let scale = (self.settings.canvas_max_width as f32 / source.width as f32)
            .min(self.settings.canvas_max_height as f32 / source.height as f32)
            .min(1.0);
        let canvas_w = ((source.width as f32 * scale).round() as u32).max(1);
        let canvas_h = ((source.height as f32 * scale).round() as u32).max(1);

        let canvas = if (canvas_w, canvas_h) == (source.width, source.height) {
            source.image.to_rgba8()
        } else {
            imageops::resize(&source.image.to_rgba8(), canvas_w, canvas_h, FilterType::Triangle)
        };

        let rect = initial_crop_area(canvas_w as f32, canvas_h as f32, self.settings.aspect_ratio);
        info!(
            name = %source.file.name,
            width = source.width,
            height = source.height,
            canvas_w,
            canvas_h,
            scale,
            "Cropper opened"
        );

        self.session = Some(CropSession {
            source,
            canvas,
            scale,
            rect,
            gesture: None,
        });
        self.state = CropperState::Loaded;
        Ok(())
    }

    pub fn crop_rect(&self) -> Option<CropRect> {
        self.session.as_ref().map(|s| s.rect)
    }

    /// Size of the display canvas.
    pub fn bounds(&self) -> Option<Bounds> {
        self.session.as_ref().map(CropSession::bounds)
    }

    pub fn scale(&self) -> Option<f32> {
        self.session.as_ref().map(|s| s.scale)
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.session.as_ref().map(|s| &s.source)
    }

    /// What lies under a canvas point: one of the eight handles, the body, or nothing.
    pub fn handle_at(&self, x: f32, y: f32) -> Option<Hit> {
        let session = self.session.as_ref()?;
        hit_test(&session.rect, x, y, HANDLE_HIT_TOLERANCE)
    }

    /// Begin a drag or resize. Returns what was hit, if anything.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> Option<Hit> {
        if !matches!(self.state, CropperState::Loaded | CropperState::Idle) {
            return None;
        }
        let hit = self.handle_at(x, y);
        let session = self.session.as_mut()?;
        match hit {
            Some(Hit::Handle(handle)) => {
                session.gesture = Some(Gesture::Resize {
                    handle,
                    start_rect: session.rect,
                    start_x: x,
                    start_y: y,
                });
                self.state = CropperState::Resizing;
            }
            Some(Hit::Body) => {
                session.gesture = Some(Gesture::Drag {
                    offset_x: x - session.rect.x,
                    offset_y: y - session.rect.y,
                });
                self.state = CropperState::Dragging;
            }
            None => {
                self.state = CropperState::Idle;
            }
        }
        debug!(x, y, ?hit, state = %self.state, "Pointer down");
        hit
    }

    /// Update the active gesture. Returns the new rectangle when it changed.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Option<CropRect> {
        let min_size = self.settings.min_size;
        let ratio = self.settings.aspect_ratio;
        let session = self.session.as_mut()?;
        let bounds = session.bounds();

        let next = match session.gesture? {
            Gesture::Drag { offset_x, offset_y } => {
                let dx = (x - offset_x) - session.rect.x;
                let dy = (y - offset_y) - session.rect.y;
                translate(&session.rect, dx, dy, bounds)
            }
            Gesture::Resize {
                handle,
                start_rect,
                start_x,
                start_y,
            } => resize(
                &start_rect,
                handle,
                x - start_x,
                y - start_y,
                bounds,
                ratio,
                min_size,
            ),
        };

        if next == session.rect {
            return None;
        }
        session.rect = next;
        Some(next)
    }

    pub fn pointer_up(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.gesture = None;
        }
        if matches!(self.state, CropperState::Dragging | CropperState::Resizing) {
            self.state = CropperState::Idle;
        }
    }

    /// Cursor to show at a pointer position.
    pub fn cursor_at(&self, x: f32, y: f32) -> CursorHint {
        let Some(session) = self.session.as_ref() else {
            return CursorHint::Default;
        };
        match session.gesture {
            Some(Gesture::Drag { .. }) => return CursorHint::Grabbing,
            Some(Gesture::Resize { handle, .. }) => return CursorHint::Resize(handle),
            None => {}
        }
        match self.handle_at(x, y) {
            Some(Hit::Handle(h)) => CursorHint::Resize(h),
            Some(Hit::Body) => CursorHint::Move,
            None => CursorHint::Default,
        }
    }

    /// Crop rectangle mapped back to natural image pixels.
    pub fn natural_crop(&self) -> Result<PixelRect> {
        let session = self.open_session()?;
        session
            .rect
            .to_pixels(session.scale, session.source.width, session.source.height)
    }

    /// Pixel size of the confirmed output for a natural crop region.
    pub fn output_dimensions(&self, region: &PixelRect) -> (u32, u32) {
        match self.settings.aspect_ratio {
            Some(ratio) => {
                let w = self.settings.output_width;
                (w, ((w as f32 / ratio).round() as u32).max(1))
            }
            None => (region.width, region.height),
        }
    }

    /// Live preview of the current crop, `preview_width` wide.
    pub fn preview(&self) -> Result<RgbaImage> {
        let session = self.open_session()?;
        let region = self.natural_crop()?;

        let w = self.settings.preview_width;
        let h = match self.settings.aspect_ratio {
            Some(ratio) => w as f32 / ratio,
            None => w as f32 * region.height as f32 / region.width as f32,
        };
        let h = (h.round() as u32).max(1);

        let mut surface = RenderSurface::new(w, h);
        surface.draw(&session.source.image, Some(region))?;
        Ok(surface.into_image())
    }

    /// Display canvas with the dimmed mask, border and handles.
    pub fn overlay(&self) -> Result<RgbaImage> {
        let session = self.open_session()?;
        Ok(render_overlay(&session.canvas, &session.rect))
    }

    /// Render the crop at output size and compress it.
    ///
    /// Success leaves the cropper `Committed`; cancellation leaves it
    /// `Cancelled`; any other failure closes it. The source is released in
    /// every case.
    pub fn confirm(
        &mut self,
        config: &CompressionConfig,
        reporter: &dyn AttemptReporter,
        cancel: &CancelToken,
    ) -> Result<CompressionResult> {
        if !self.state.is_open() {
            return Err(PrepError::InvalidState(format!(
                "cannot confirm while cropper is {}",
                self.state
            )));
        }
        let region = self.natural_crop()?;
        let (out_w, out_h) = self.output_dimensions(&region);

        let Some(session) = self.session.take() else {
            return Err(PrepError::InvalidState("no image loaded".into()));
        };
        info!(
            x = region.x,
            y = region.y,
            width = region.width,
            height = region.height,
            out_w,
            out_h,
            "Confirming crop"
        );

        let outcome = render_and_compress(&session.source, region, out_w, out_h, config, reporter, cancel);
        self.state = match &outcome {
            Ok(_) => CropperState::Committed,
            Err(PrepError::Cancelled) => CropperState::Cancelled,
            Err(e) => {
                warn!(error = %e, "Crop confirmation failed");
                CropperState::Closed
            }
        };
        outcome
    }

    /// Abandon the session without producing output.
    pub fn cancel(&mut self) -> bool {
        if self.session.is_none() && !self.state.is_open() {
            return false;
        }
        self.session = None;
        self.state = CropperState::Cancelled;
        info!("Cropper cancelled");
        true
    }

    /// Release everything and return to `Closed`.
    pub fn close(&mut self) {
        self.session = None;
        self.state = CropperState::Closed;
    }

    fn open_session(&self) -> Result<&CropSession> {
        self.session
            .as_ref()
            .ok_or_else(|| PrepError::InvalidState(format!("cropper is {}", self.state)))
    }
}

fn render_and_compress(
    source: &SourceImage,
    region: PixelRect,
    out_w: u32,
    out_h: u32,
    config: &CompressionConfig,
    reporter: &dyn AttemptReporter,
    cancel: &CancelToken,
) -> Result<CompressionResult> {
    let mut surface = RenderSurface::new(out_w, out_h);
    surface.draw(&source.image, Some(region))?;
    let rendered = DynamicImage::ImageRgba8(surface.into_image());
    compress_with(&rendered, &source.file, config, reporter, cancel)
}
