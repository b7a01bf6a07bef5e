//! Iterative lossy re-encoding against a byte budget.

mod check;
pub mod config;
mod encoder;
mod engine;
mod naming;
mod stats;
mod surface;

pub use check::{check_output, OutputViolation};
pub use config::{CompressionConfig, OutputFormat};
pub use encoder::supports_quality;
pub use engine::{
    compress, compress_with, resolve_format, AttemptReporter, CancelToken, CompressionResult,
    NoOpReporter,
};
pub use naming::output_file_name;
pub use stats::{format_file_size, CompressionStats};
pub use surface::RenderSurface;
