use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use hdralign_core::align::SegmentedPhaseEstimator;
use hdralign_core::io::image_io::save_color_image;
use hdralign_core::io::FileImageSource;
use hdralign_core::pipeline::config::AlignConfig;
use hdralign_core::pipeline::{align_images_reported, PipelineStage, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};

use crate::summary::{print_align_summary, print_result_summary};

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Tiff,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Tiff => "tiff",
            Self::Png => "png",
        }
    }
}

#[derive(Args)]
pub struct AlignArgs {
    /// Input images of the exposure stack
    #[arg(required = true, num_args = 2..)]
    pub files: Vec<PathBuf>,

    /// Alignment config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Histogram sampling stride in pixels
    #[arg(long)]
    pub stride: Option<usize>,

    /// Pyramid levels for phase correlation
    #[arg(long)]
    pub levels: Option<usize>,

    /// Segmentation grid as COLSxROWS, e.g. 7x6
    #[arg(long)]
    pub segments: Option<String>,

    /// Write every image's segmentation patches to this directory
    #[arg(long)]
    pub dump_patches: Option<PathBuf>,

    /// Log per-image timing and transform parameters
    #[arg(long)]
    pub timings: bool,

    /// Output directory
    #[arg(short, long, default_value = "aligned")]
    pub output: PathBuf,

    /// Output image format
    #[arg(long, value_enum, default_value = "tiff")]
    pub format: OutputFormat,
}

/// Drives an indicatif bar from pipeline progress callbacks.
struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.bar.set_length(total_items.unwrap_or(1) as u64);
        self.bar.set_position(0);
        self.bar.set_message(stage.to_string());
    }

    fn advance(&self, items_done: usize) {
        self.bar.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        if let Some(len) = self.bar.length() {
            self.bar.set_position(len);
        }
    }
}

pub fn run(args: &AlignArgs) -> Result<()> {
    let config = build_config(args)?;
    print_align_summary(&args.files, &config, &args.output);

    let pb = ProgressBar::new(args.files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = Arc::new(BarReporter { bar: pb.clone() });

    let estimator = SegmentedPhaseEstimator::new(config.min_segment_variance);
    let set = align_images_reported(
        &args.files,
        &config,
        &FileImageSource,
        &estimator,
        reporter,
    )?;
    pb.finish_with_message("Done");

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let mut written = Vec::with_capacity(set.len());
    for (i, input) in args.files.iter().enumerate() {
        let Some(frame) = set.get(i) else {
            written.push(None);
            continue;
        };
        let path = output_path(&args.output, input, i, args.format);
        save_color_image(frame, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(Some(path));
    }

    print_result_summary(&set, &args.files, &written);
    Ok(())
}

fn build_config(args: &AlignArgs) -> Result<AlignConfig> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid alignment config")?
    } else {
        AlignConfig::default()
    };

    if let Some(stride) = args.stride {
        config.histogram_stride = stride;
    }
    if let Some(levels) = args.levels {
        config.pyramid_levels = levels;
    }
    if let Some(ref grid) = args.segments {
        let (x, y) = parse_grid(grid)?;
        config.segments_x = x;
        config.segments_y = y;
    }
    if let Some(ref dir) = args.dump_patches {
        config.diagnostics.patch_dump_dir = Some(dir.clone());
    }
    if args.timings {
        config.diagnostics.verbose = true;
    }
    Ok(config)
}

fn parse_grid(s: &str) -> Result<(usize, usize)> {
    let (x, y) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("Segment grid must look like 7x6, got '{s}'"))?;
    let x = x.trim().parse().context("Invalid segment column count")?;
    let y = y.trim().parse().context("Invalid segment row count")?;
    Ok((x, y))
}

fn output_path(dir: &Path, input: &Path, index: usize, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("image_{index}"));
    dir.join(format!("{index:02}_{stem}_aligned.{}", format.extension()))
}
