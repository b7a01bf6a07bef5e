use crate::pipeline::ProcessedImage;

/// The host form field a widget writes its result into.
///
/// Only [`ImageWidget::commit_result`](super::ImageWidget::commit_result)
/// replaces the payload; failures and cancellations leave it as it was.
#[derive(Clone, Debug)]
pub struct BoundInput {
    field_name: String,
    current: Option<ProcessedImage>,
}

impl BoundInput {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            current: None,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn current(&self) -> Option<&ProcessedImage> {
        self.current.as_ref()
    }

    pub fn has_file(&self) -> bool {
        self.current.is_some()
    }

    pub(super) fn replace(&mut self, processed: ProcessedImage) -> Option<ProcessedImage> {
        self.current.replace(processed)
    }

    /// Drop the payload, e.g. when the host form is cleared.
    pub fn clear(&mut self) -> Option<ProcessedImage> {
        self.current.take()
    }
}
