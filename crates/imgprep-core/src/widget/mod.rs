//! Binds one form field to one processing session.

mod config;
mod input;
mod observer;
mod orchestrator;
mod registry;
mod state;

pub use config::WidgetConfig;
pub use input::BoundInput;
pub use observer::{NoOpObserver, WidgetObserver};
pub use orchestrator::{ImageWidget, Selection};
pub use registry::WidgetRegistry;
pub use state::SessionState;
