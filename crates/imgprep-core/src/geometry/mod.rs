//! Pure crop-rectangle arithmetic.
//!
//! Everything here works in the coordinate space of the displayed canvas
//! (`f32`), except [`PixelRect`] which addresses natural image pixels.

mod center;
mod rect;
mod transform;

pub use center::{center_crop, fit_within, initial_crop_area, ratios_match};
pub use rect::{Bounds, CropRect, PixelRect};
pub use transform::{hit_test, resize, translate, Handle, Hit};
