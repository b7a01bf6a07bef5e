use std::fmt;

use crate::consts::DIMENSION_TOLERANCE;
use crate::error::Result;
use crate::file::{ImageFile, ImageInfo};

use super::config::CompressionConfig;
use super::stats::format_file_size;

/// A way a processed file falls outside its acceptance constraints.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputViolation {
    OverBudget { size: u64, budget: u64 },
    OverDimensions {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },
}

impl fmt::Display for OutputViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverBudget { size, budget } => write!(
                f,
                "file size {} exceeds maximum {}",
                format_file_size(*size),
                format_file_size(*budget)
            ),
            Self::OverDimensions {
                width,
                height,
                max_width,
                max_height,
            } => write!(
                f,
                "dimensions {width}x{height} exceed maximum {max_width}x{max_height}"
            ),
        }
    }
}

/// Re-check a processed file against `config`.
///
/// The compressor accepts an over-budget result rather than failing, so hosts
/// that need a hard guarantee call this. Dimensions get a 10% allowance.
pub fn check_output(file: &ImageFile, config: &CompressionConfig) -> Result<Vec<OutputViolation>> {
    let info = ImageInfo::probe(file)?;
    let mut violations = Vec::new();

    let budget = config.budget_bytes();
    if file.size() > budget {
        violations.push(OutputViolation::OverBudget {
            size: file.size(),
            budget,
        });
    }

    let limit_w = config.max_width as f32 * DIMENSION_TOLERANCE;
    let limit_h = config.max_height as f32 * DIMENSION_TOLERANCE;
    if info.width as f32 > limit_w || info.height as f32 > limit_h {
        violations.push(OutputViolation::OverDimensions {
            width: info.width,
            height: info.height,
            max_width: config.max_width,
            max_height: config.max_height,
        });
    }

    Ok(violations)
}
