/// Default compression budget in kilobytes.
pub const DEFAULT_MAX_SIZE_KB: u32 = 1024;

/// Default initial encoder quality.
pub const DEFAULT_QUALITY: f32 = 0.8;

/// Default output bounds for free-form uploads.
pub const DEFAULT_MAX_WIDTH: u32 = 1920;
pub const DEFAULT_MAX_HEIGHT: u32 = 1080;

/// Profile picture preset: square, 800x800.
pub const PROFILE_ASPECT_RATIO: f32 = 1.0;
pub const PROFILE_SIZE: u32 = 800;

/// Cover image preset: 4:1, 1200x300.
pub const COVER_ASPECT_RATIO: f32 = 4.0;
pub const COVER_WIDTH: u32 = 1200;
pub const COVER_HEIGHT: u32 = 300;

/// Quality decrement between compression attempts.
pub const QUALITY_STEP: f32 = 0.1;

/// Lowest quality the compressor will try.
pub const MIN_QUALITY: f32 = 0.1;

/// Upper bound on encode attempts per compression call.
pub const MAX_COMPRESSION_ATTEMPTS: u32 = 10;

/// Hard ceiling on the raw source size, independent of the target budget.
/// Bounds worst-case decode cost. Default: 50 MB.
pub const MAX_SOURCE_BYTES: u64 = 50 * 1024 * 1024;

/// MIME types accepted when the host does not configure an allow-list.
pub const DEFAULT_ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Fraction of the limiting canvas dimension covered by the initial crop area.
pub const INITIAL_CROP_FRACTION: f32 = 0.8;

/// Default minimum crop side, in canvas pixels.
pub const DEFAULT_MIN_CROP_SIZE: f32 = 50.0;

/// Largest canvas used to display the source in the cropper.
pub const DEFAULT_CANVAS_MAX_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_MAX_HEIGHT: u32 = 600;

/// Width of the live crop preview thumbnail.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 150;

/// Distance (canvas pixels) within which a pointer grabs a resize handle.
pub const HANDLE_HIT_TOLERANCE: f32 = 10.0;

/// Side length of the handle squares drawn by the overlay renderer.
pub const HANDLE_DRAW_SIZE: u32 = 8;

/// Alpha of the dimming mask drawn outside the crop rectangle.
pub const OVERLAY_DIM_ALPHA: u8 = 140;

/// Relative tolerance when comparing aspect ratios.
pub const ASPECT_TOLERANCE: f32 = 1e-3;

/// Output dimensions may exceed the configured bounds by this factor before
/// `check_output` reports a violation.
pub const DIMENSION_TOLERANCE: f32 = 1.1;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f32 = 1e-6;
