mod common;

use std::cell::RefCell;

use approx::assert_relative_eq;
use image::DynamicImage;

use imgprep_core::compress::{
    check_output, compress, compress_with, CancelToken, CompressionConfig, OutputFormat,
    OutputViolation,
};
use imgprep_core::error::PrepError;
use imgprep_core::file::{decode, ImageMime};

use common::{gradient, jpeg_file, noise, png_file, with_hole};

#[test]
fn test_under_budget_takes_one_attempt() {
    let original = jpeg_file("photo.jpeg", &gradient(256, 256), 100);
    let source = decode(&original).unwrap();

    let result = compress(&source, &original, &CompressionConfig::default()).unwrap();

    assert_eq!(result.attempts, 1);
    assert!(result.compressed_size <= result.original_size);
    assert_eq!(result.format, ImageMime::Jpeg);
    assert_eq!(result.output_file.name, "photo.jpg");
    assert_eq!(result.output_file.mime_type, "image/jpeg");
    assert_relative_eq!(result.final_quality, 0.8);
}

#[test]
fn test_transparent_png_stays_png() {
    let original = png_file("logo.png", DynamicImage::ImageRgba8(with_hole(500, 500)));
    let source = decode(&original).unwrap();

    let result = compress(&source, &original, &CompressionConfig::default()).unwrap();

    assert_eq!(result.format, ImageMime::Png);
    assert_eq!(result.output_file.name, "logo.png");
    assert_eq!(result.attempts, 1);
    let decoded = decode(&result.output_file).unwrap();
    assert!(decoded.color().has_alpha());
}

#[test]
fn test_opaque_png_becomes_jpeg() {
    let original = png_file("scan.png", DynamicImage::ImageRgb8(gradient(300, 200)));
    let source = decode(&original).unwrap();

    let result = compress(&source, &original, &CompressionConfig::default()).unwrap();

    assert_eq!(result.format, ImageMime::Jpeg);
    assert_eq!(result.output_file.name, "scan.jpg");
}

#[test]
fn test_explicit_png_is_lossless_single_attempt() {
    let original = jpeg_file("photo.jpg", &noise(200, 200), 90);
    let source = decode(&original).unwrap();
    let config = CompressionConfig {
        output_format: OutputFormat::Png,
        max_size_kb: 1,
        ..CompressionConfig::default()
    };

    let result = compress(&source, &original, &config).unwrap();

    assert_eq!(result.format, ImageMime::Png);
    assert_eq!(result.attempts, 1);
    assert!(!result.budget_met(&config));
}

#[test]
fn test_unreachable_budget_runs_ten_attempts_to_floor() {
    let original = jpeg_file("noise.jpg", &noise(400, 400), 95);
    let source = decode(&original).unwrap();
    let config = CompressionConfig {
        max_size_kb: 1,
        ..CompressionConfig::default()
    };
    let seen = RefCell::new(Vec::new());
    let reporter = |attempt: u32, quality: f32, bytes: u64| {
        seen.borrow_mut().push((attempt, quality, bytes));
    };

    let result = compress_with(&source, &original, &config, &reporter, &CancelToken::new()).unwrap();

    assert_eq!(result.attempts, 10);
    assert_relative_eq!(result.final_quality, 0.1, epsilon = 1e-4);
    assert!(!result.budget_met(&config));

    let seen = seen.into_inner();
    assert_eq!(seen.len(), 10);
    assert_eq!(seen[0].0, 1);
    assert_relative_eq!(seen[0].1, 0.8, epsilon = 1e-4);
    assert_relative_eq!(seen[1].1, 0.7, epsilon = 1e-4);
    assert_relative_eq!(seen[9].1, 0.1, epsilon = 1e-4);
    assert_eq!(seen[9].2, result.compressed_size);
    for pair in seen.windows(2) {
        assert!(pair[1].1 <= pair[0].1, "quality went up: {pair:?}");
    }

    let violations = check_output(&result.output_file, &config).unwrap();
    assert!(matches!(
        violations.as_slice(),
        [OutputViolation::OverBudget { .. }]
    ));
}

#[test]
fn test_budget_met_or_floor_reached() {
    let original = jpeg_file("noise.jpg", &noise(600, 600), 95);
    let source = decode(&original).unwrap();
    let config = CompressionConfig {
        max_size_kb: 64,
        ..CompressionConfig::default()
    };

    let result = compress(&source, &original, &config).unwrap();

    assert!(result.attempts <= 10);
    assert!(
        result.budget_met(&config) || (result.attempts == 10 && result.final_quality <= 0.1001),
        "attempts={} quality={} size={}",
        result.attempts,
        result.final_quality,
        result.compressed_size
    );
}

#[test]
fn test_small_image_is_never_upscaled() {
    let original = jpeg_file("small.jpg", &gradient(200, 100), 90);
    let source = decode(&original).unwrap();

    let result = compress(&source, &original, &CompressionConfig::default()).unwrap();

    assert_eq!((result.width, result.height), (200, 100));
    assert_eq!(common::decode_dimensions(&result.output_file), (200, 100));
}

#[test]
fn test_large_image_is_fit_inside_bounds() {
    let original = jpeg_file("wide.jpg", &gradient(800, 400), 90);
    let source = decode(&original).unwrap();
    let config = CompressionConfig::with_bounds(400, 400);

    let result = compress(&source, &original, &config).unwrap();

    assert_eq!((result.width, result.height), (400, 200));
    assert!(check_output(&result.output_file, &config).unwrap().is_empty());
}

#[test]
fn test_recompressing_output_is_near_fixed_point() {
    let original = jpeg_file("photo.jpg", &gradient(320, 240), 90);
    let config = CompressionConfig::default();

    let first = compress(&decode(&original).unwrap(), &original, &config).unwrap();
    let second = compress(
        &decode(&first.output_file).unwrap(),
        &first.output_file,
        &config,
    )
    .unwrap();

    assert_eq!(second.output_file.name, first.output_file.name);
    let a = first.compressed_size as f64;
    let b = second.compressed_size as f64;
    assert!((a - b).abs() / a < 0.05, "first={a} second={b}");
}

#[test]
fn test_cancelled_before_start() {
    let original = jpeg_file("photo.jpg", &gradient(64, 64), 90);
    let source = decode(&original).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = compress_with(
        &source,
        &original,
        &CompressionConfig::default(),
        &|_: u32, _: f32, _: u64| {},
        &cancel,
    )
    .unwrap_err();

    assert!(matches!(err, PrepError::Cancelled));
}

#[test]
fn test_cancel_between_attempts_stops_early() {
    let original = jpeg_file("noise.jpg", &noise(300, 300), 95);
    let source = decode(&original).unwrap();
    let config = CompressionConfig {
        max_size_kb: 1,
        ..CompressionConfig::default()
    };
    let cancel = CancelToken::new();
    let attempts = RefCell::new(0u32);
    let reporter = |attempt: u32, _: f32, _: u64| {
        *attempts.borrow_mut() = attempt;
        if attempt == 2 {
            cancel.cancel();
        }
    };

    let err = compress_with(&source, &original, &config, &reporter, &cancel).unwrap_err();

    assert!(matches!(err, PrepError::Cancelled));
    assert_eq!(*attempts.borrow(), 2);
}

#[test]
fn test_invalid_config_is_rejected() {
    let original = jpeg_file("photo.jpg", &gradient(64, 64), 90);
    let source = decode(&original).unwrap();
    let config = CompressionConfig {
        quality: 1.5,
        ..CompressionConfig::default()
    };

    let err = compress(&source, &original, &config).unwrap_err();
    assert!(matches!(err, PrepError::InvalidConfig(_)));
}
