use std::path::Path;

use crate::file::ImageMime;

/// Output file name: the original stem with the extension of `format`.
///
/// Deterministic, so reprocessing the same logical image keeps one identity.
pub fn output_file_name(original_name: &str, format: ImageMime) -> String {
    let stem = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    format!("{stem}.{}", format.extension())
}
