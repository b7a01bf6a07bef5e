//! Headless interactive cropper.
//!
//! The cropper is a pure state machine over pointer events; a rendering layer
//! only needs to paint [`Cropper::overlay`] and [`Cropper::preview`] and feed
//! canvas-space pointer coordinates back in.

mod config;
mod overlay;
mod session;
mod state;

pub use config::CropSettings;
pub use overlay::render_overlay;
pub use session::{Cropper, SourceImage};
pub use state::{CropperState, CursorHint};
