use std::path::Path;

use console::Style;
use imgprep_core::compress::{format_file_size, OutputViolation};
use imgprep_core::pipeline::ProcessedImage;
use imgprep_core::widget::WidgetConfig;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    warn: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            warn: Style::new().yellow().bold(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_settings_summary(input: &Path, config: &WidgetConfig) {
    let s = Styles::new();
    let c = &config.compression;

    println!();
    println!("  {}", s.title.apply_to("Image Prep"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(10)));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(input.display())
    );
    match config.crop.aspect_ratio {
        Some(ratio) => println!(
            "  {:<14}{}",
            s.label.apply_to("Crop"),
            s.method.apply_to(format!(
                "ratio {ratio}, {} px wide",
                config.crop.output_width
            ))
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Crop"),
            s.disabled.apply_to("free")
        ),
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Bounds"),
        s.value.apply_to(format!("{}x{}", c.max_width, c.max_height))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Budget"),
        s.value.apply_to(format_file_size(c.budget_bytes()))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Quality"),
        s.value.apply_to(format!("{:.2}", c.quality))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Format"),
        s.method.apply_to(c.output_format)
    );
    println!();
}

pub fn print_result_summary(
    processed: &ProcessedImage,
    violations: &[OutputViolation],
    output: &Path,
) {
    let s = Styles::new();
    let stats = &processed.stats;

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Dimensions"),
        s.value
            .apply_to(format!("{}x{}", processed.width, processed.height))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(stats)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Saved"),
        s.value.apply_to(format_file_size(stats.size_saved()))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Attempts"),
        s.value.apply_to(format!(
            "{} (final quality {:.2})",
            processed.attempts, processed.final_quality
        ))
    );
    for v in violations {
        println!("  {:<14}{}", s.label.apply_to("Warning"), s.warn.apply_to(v));
    }
    println!();
}
