use std::path::{Path, PathBuf};

use console::Style;
use hdralign_core::pipeline::config::AlignConfig;
use hdralign_core::pipeline::AlignedImageSet;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    failed: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            failed: Style::new().red(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_align_summary(files: &[PathBuf], config: &AlignConfig, output: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("HDR Alignment"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(13)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Images"),
        s.value.apply_to(files.len())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(output.display())
    );
    println!();

    println!("  {}", s.header.apply_to("Estimation"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Stride"),
        s.value.apply_to(config.histogram_stride)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Levels"),
        s.value.apply_to(config.pyramid_levels)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Segments"),
        s.value
            .apply_to(format!("{}x{}", config.segments_x, config.segments_y))
    );
    match config.diagnostics.patch_dump_dir {
        Some(ref dir) => println!(
            "    {:<12}{}",
            s.label.apply_to("Patches"),
            s.path.apply_to(dir.display())
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Patches"),
            s.disabled.apply_to("not dumped")
        ),
    }
    println!();
}

pub fn print_result_summary(set: &AlignedImageSet, files: &[PathBuf], written: &[Option<PathBuf>]) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{} ({})",
        s.label.apply_to("Reference"),
        s.value.apply_to(set.reference_index),
        s.path.apply_to(files[set.reference_index].display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Crop"),
        s.value.apply_to(set.bbox)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Aligned"),
        s.value
            .apply_to(format!("{} of {}", set.present_count(), set.len()))
    );
    println!();

    let reasons = set.failures();
    for (i, path) in written.iter().enumerate() {
        match path {
            Some(p) => {
                let transform = match set.transforms[i] {
                    Some(t) if !t.is_identity() => t.to_string(),
                    _ => "identity".to_string(),
                };
                println!(
                    "    {:>3}  {}  {}",
                    i,
                    s.path.apply_to(p.display()),
                    s.label.apply_to(transform)
                );
            }
            None => {
                let reason = reasons
                    .iter()
                    .find(|(idx, _)| *idx == i)
                    .map(|(_, r)| *r)
                    .unwrap_or("not aligned");
                println!(
                    "    {:>3}  {} {}",
                    i,
                    s.failed.apply_to("skipped:"),
                    s.disabled.apply_to(reason)
                );
            }
        }
    }
    println!();
}
