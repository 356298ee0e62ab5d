use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::align::{estimate_transforms, segment_grid, SegmentedPhaseEstimator, TransformEstimator};
use crate::consts::{MIN_IMAGES, PARALLEL_FRAME_THRESHOLD};
use crate::error::{AlignError, Result};
use crate::exposure::select_reference_from_proxies;
use crate::frame::{ColorFrame, GrayscaleProxy};
use crate::io::{load_proxies, FileImageSource, ImageSource};
use crate::region::{common_region, BoundingBox};
use crate::transform::AlignmentTransform;
use crate::warp::warp_and_crop;

use super::config::AlignConfig;
use super::diagnostics::dump_patches;
use super::types::{AlignedImageSet, ImageOutcome, NoOpReporter, PipelineStage, ProgressReporter};

/// Align `paths` with the file decoder and the built-in segmented estimator.
pub fn align(paths: &[PathBuf], config: &AlignConfig) -> Result<AlignedImageSet> {
    let estimator = SegmentedPhaseEstimator::new(config.min_segment_variance);
    align_images_reported(
        paths,
        config,
        &FileImageSource,
        &estimator,
        Arc::new(NoOpReporter),
    )
}

/// Align an exposure stack to its widest-range exposure.
///
/// Returns an error only for batch-level failures: fewer than
/// [`MIN_IMAGES`] paths, an unreadable grayscale proxy, proxies of differing
/// sizes, an invalid config or an empty common region. Everything that goes wrong for a single image
/// leaves its slot [`ImageOutcome::Failed`] and the rest of the batch intact.
pub fn align_images_reported(
    paths: &[PathBuf],
    config: &AlignConfig,
    source: &dyn ImageSource,
    estimator: &dyn TransformEstimator,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<AlignedImageSet> {
    if paths.len() < MIN_IMAGES {
        return Err(AlignError::TooFewImages {
            required: MIN_IMAGES,
            provided: paths.len(),
        });
    }
    config.validate()?;
    let total = paths.len();
    info!(images = total, estimator = estimator.name(), "Aligning exposure stack");

    reporter.begin_stage(PipelineStage::Reading, Some(total));
    let proxies = load_proxies(source, paths)?;
    check_dimensions(&proxies)?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::ReferenceSelection, Some(total));
    let selection = select_reference_from_proxies(&proxies, config.histogram_stride)?;
    let reference_idx = selection.index;
    let (width, height) = proxies[reference_idx].dimensions();
    let range = selection.reference_range();
    info!(
        reference = reference_idx,
        path = %paths[reference_idx].display(),
        width,
        height,
        lep = range.lep,
        hep = range.hep,
        "Reference image"
    );
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Estimation, Some(total));
    let params = config.estimate_params();
    let estimated = estimate_transforms(
        &proxies,
        reference_idx,
        estimator,
        &params,
        &config.diagnostics,
        |done| reporter.advance(done),
    )?;
    reporter.finish_stage();

    if let Some(dir) = &config.diagnostics.patch_dump_dir {
        let grid = segment_grid(width, height, params.segments_x, params.segments_y);
        dump_patches(dir, &proxies, &grid);
    }
    drop(proxies);

    let mut transforms: Vec<std::result::Result<AlignmentTransform, String>> = estimated
        .into_iter()
        .map(|r| r.map_err(|e| e.to_string()))
        .collect();

    reporter.begin_stage(PipelineStage::CommonRegion, None);
    let footprints: Vec<(usize, AlignmentTransform)> = transforms
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != reference_idx)
        .filter_map(|(i, t)| t.as_ref().ok().map(|t| (i, *t)))
        .collect();
    let region = common_region(width, height, &footprints)?;
    for (index, err) in region.excluded {
        transforms[index] = Err(err.to_string());
    }
    let bbox = region.bbox;
    info!(bbox = %bbox, "Common region");
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Warping, Some(total));
    let images = warp_all(
        paths,
        &transforms,
        &bbox,
        (width, height),
        source,
        config.diagnostics.verbose,
        reporter.as_ref(),
    );
    reporter.finish_stage();

    let result = AlignedImageSet {
        images,
        reference_index: reference_idx,
        ranges: selection.ranges,
        transforms: transforms.into_iter().map(|t| t.ok()).collect(),
        bbox,
    };
    for (index, reason) in result.failures() {
        warn!(image = index, reason, "Image left out of aligned set");
    }
    info!(
        aligned = result.present_count(),
        total,
        "Alignment finished"
    );
    Ok(result)
}

fn check_dimensions(proxies: &[GrayscaleProxy]) -> Result<()> {
    let Some(first) = proxies.first() else {
        return Ok(());
    };
    let expected = first.dimensions();
    match proxies.iter().find(|p| p.dimensions() != expected) {
        Some(odd) => Err(AlignError::DimensionMismatch {
            expected,
            got: odd.dimensions(),
        }),
        None => Ok(()),
    }
}

fn warp_all(
    paths: &[PathBuf],
    transforms: &[std::result::Result<AlignmentTransform, String>],
    bbox: &BoundingBox,
    canvas: (usize, usize),
    source: &dyn ImageSource,
    verbose: bool,
    reporter: &dyn ProgressReporter,
) -> Vec<ImageOutcome> {
    let counter = AtomicUsize::new(0);

    let warp_one = |index: usize| {
        let outcome = match &transforms[index] {
            Ok(transform) => {
                let started = Instant::now();
                match warp_image(&paths[index], transform, bbox, canvas, source) {
                    Ok(frame) => {
                        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                        if verbose {
                            info!(image = index, elapsed_ms, "Transformation time");
                        } else {
                            debug!(image = index, elapsed_ms, "Transformation time");
                        }
                        ImageOutcome::Aligned(frame)
                    }
                    Err(e) => {
                        warn!(image = index, error = %e, "Warp failed");
                        ImageOutcome::Failed {
                            reason: e.to_string(),
                        }
                    }
                }
            }
            Err(reason) => ImageOutcome::Failed {
                reason: reason.clone(),
            },
        };
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.advance(done);
        outcome
    };

    if paths.len() >= PARALLEL_FRAME_THRESHOLD {
        (0..paths.len()).into_par_iter().map(warp_one).collect()
    } else {
        (0..paths.len()).map(warp_one).collect()
    }
}

fn warp_image(
    path: &Path,
    transform: &AlignmentTransform,
    bbox: &BoundingBox,
    canvas: (usize, usize),
    source: &dyn ImageSource,
) -> Result<ColorFrame> {
    let color = source.load_color(path)?;
    if color.dimensions() != canvas {
        return Err(AlignError::DimensionMismatch {
            expected: canvas,
            got: color.dimensions(),
        });
    }
    warp_and_crop(&color, transform, bbox)
}
