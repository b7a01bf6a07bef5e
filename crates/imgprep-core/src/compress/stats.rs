use std::fmt;

/// Before/after sizes of one compression run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressionStats {
    pub original_size: u64,
    pub compressed_size: u64,
    /// `1 - compressed / original`; negative when the output grew.
    pub compression_ratio: f64,
}

impl CompressionStats {
    pub fn new(original_size: u64, compressed_size: u64) -> Self {
        let compression_ratio = if original_size == 0 {
            0.0
        } else {
            1.0 - compressed_size as f64 / original_size as f64
        };
        Self {
            original_size,
            compressed_size,
            compression_ratio,
        }
    }

    pub fn percentage(&self) -> f64 {
        self.compression_ratio * 100.0
    }

    pub fn size_saved(&self) -> u64 {
        self.original_size.saturating_sub(self.compressed_size)
    }
}

impl fmt::Display for CompressionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.compression_ratio >= 0.0 {
            "smaller"
        } else {
            "larger"
        };
        write!(
            f,
            "{} \u{2192} {} ({:.1}% {verb})",
            format_file_size(self.original_size),
            format_file_size(self.compressed_size),
            self.percentage().abs()
        )
    }
}

/// Human-readable byte count with one decimal, e.g. `"1.5 MB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} PB")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size_units() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512.0 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_stats_display() {
        let stats = CompressionStats::new(2048, 1024);
        assert_eq!(stats.to_string(), "2.0 KB \u{2192} 1.0 KB (50.0% smaller)");
    }

    #[test]
    fn test_stats_zero_original() {
        let stats = CompressionStats::new(0, 10);
        assert_eq!(stats.compression_ratio, 0.0);
        assert_eq!(stats.size_saved(), 0);
    }
}
