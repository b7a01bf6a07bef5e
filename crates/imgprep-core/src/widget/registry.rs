use std::collections::HashMap;

use tracing::debug;

use crate::error::{PrepError, Result};

use super::config::WidgetConfig;
use super::orchestrator::ImageWidget;

/// Widgets keyed by the host's element id. Owned by the host.
#[derive(Default)]
pub struct WidgetRegistry {
    widgets: HashMap<String, ImageWidget>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new widget to `id`. An id can only be bound once.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        field_name: impl Into<String>,
        config: WidgetConfig,
    ) -> Result<&mut ImageWidget> {
        let id = id.into();
        if self.widgets.contains_key(&id) {
            return Err(PrepError::InvalidState(format!(
                "element {id} already has a widget"
            )));
        }
        let widget = ImageWidget::new(field_name, config)?;
        debug!(id = %id, "Widget registered");
        Ok(self.widgets.entry(id).or_insert(widget))
    }

    pub fn get(&self, id: &str) -> Option<&ImageWidget> {
        self.widgets.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ImageWidget> {
        self.widgets.get_mut(id)
    }

    /// Unbind `id`, aborting any session it still runs.
    pub fn remove(&mut self, id: &str) -> Option<ImageWidget> {
        let mut widget = self.widgets.remove(id)?;
        widget.reset();
        Some(widget)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids = self.widgets.keys().map(String::as_str).collect::<Vec<_>>();
        ids.sort_unstable();
        ids
    }
}
