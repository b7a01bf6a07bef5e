use crate::error::PrepError;
use crate::pipeline::ProcessedImage;

use super::state::SessionState;

/// Host callbacks for a widget. All methods default to no-ops.
pub trait WidgetObserver {
    fn on_state_change(&self, _from: SessionState, _to: SessionState) {}

    /// Every failure ends up here with a displayable message.
    fn on_error(&self, _error: &PrepError) {}

    fn on_success(&self, _processed: &ProcessedImage) {}

    fn on_cancel(&self) {}

    /// Called after each compression attempt.
    fn on_attempt(&self, _attempt: u32, _quality: f32, _bytes: u64) {}
}

pub struct NoOpObserver;
impl WidgetObserver for NoOpObserver {}
