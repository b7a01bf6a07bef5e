use std::fmt;

use crate::geometry::{CropRect, Handle};

/// Lifecycle of the cropper modal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropperState {
    Closed,
    /// Image decoded, initial crop area placed, no interaction yet.
    Loaded,
    Idle,
    Dragging,
    Resizing,
    Committed,
    Cancelled,
}

impl CropperState {
    /// Whether pointer input and confirmation are accepted.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            Self::Loaded | Self::Idle | Self::Dragging | Self::Resizing
        )
    }
}

impl fmt::Display for CropperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Loaded => write!(f, "loaded"),
            Self::Idle => write!(f, "idle"),
            Self::Dragging => write!(f, "dragging"),
            Self::Resizing => write!(f, "resizing"),
            Self::Committed => write!(f, "committed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Cursor the rendering layer should show for a pointer position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Move,
    Grabbing,
    Resize(Handle),
}

/// In-progress pointer gesture.
#[derive(Clone, Copy, Debug)]
pub(super) enum Gesture {
    /// Offset from the pointer to the rectangle origin at pointer-down.
    Drag { offset_x: f32, offset_y: f32 },
    Resize {
        handle: Handle,
        start_rect: CropRect,
        start_x: f32,
        start_y: f32,
    },
}
