use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{AlignError, Result};
use crate::frame::GrayscaleProxy;
use crate::pipeline::config::DiagnosticsConfig;
use crate::transform::AlignmentTransform;

use super::estimator::{EstimateParams, TransformEstimator};

/// Estimate one transform per proxy against `proxies[reference_idx]`.
///
/// The reference gets the identity without consulting the estimator. Every
/// other slot holds either an invertible transform or the reason it could not
/// be produced; one failure never affects its siblings.
pub fn estimate_transforms<F>(
    proxies: &[GrayscaleProxy],
    reference_idx: usize,
    estimator: &dyn TransformEstimator,
    params: &EstimateParams,
    diagnostics: &DiagnosticsConfig,
    on_image_done: F,
) -> Result<Vec<Result<AlignmentTransform>>>
where
    F: Fn(usize) + Send + Sync,
{
    let reference = proxies
        .get(reference_idx)
        .ok_or(AlignError::ReferenceOutOfRange {
            index: reference_idx,
            count: proxies.len(),
        })?;
    let counter = AtomicUsize::new(0);

    let run = |i: usize, target: &GrayscaleProxy| {
        let result = if i == reference_idx {
            Ok(AlignmentTransform::identity())
        } else {
            estimate_one(i, reference, target, estimator, params, diagnostics)
        };
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        on_image_done(done);
        result
    };

    let results: Vec<Result<AlignmentTransform>> = if proxies.len() >= PARALLEL_FRAME_THRESHOLD {
        proxies
            .par_iter()
            .enumerate()
            .map(|(i, target)| run(i, target))
            .collect()
    } else {
        proxies
            .iter()
            .enumerate()
            .map(|(i, target)| run(i, target))
            .collect()
    };
    Ok(results)
}

fn estimate_one(
    index: usize,
    reference: &GrayscaleProxy,
    target: &GrayscaleProxy,
    estimator: &dyn TransformEstimator,
    params: &EstimateParams,
    diagnostics: &DiagnosticsConfig,
) -> Result<AlignmentTransform> {
    if target.dimensions() != reference.dimensions() {
        let err = AlignError::DimensionMismatch {
            expected: reference.dimensions(),
            got: target.dimensions(),
        };
        warn!(image = index, error = %err, "Skipping image");
        return Err(err);
    }

    let started = Instant::now();
    let result = estimator
        .estimate(reference, target, params)
        .and_then(|t| t.inverse().map(|_| t));
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    match &result {
        Ok(t) if diagnostics.verbose => {
            info!(image = index, estimator = estimator.name(), elapsed_ms, transform = %t, "Estimated transform")
        }
        Ok(t) => {
            debug!(image = index, estimator = estimator.name(), elapsed_ms, transform = %t, "Estimated transform")
        }
        Err(e) => warn!(image = index, estimator = estimator.name(), error = %e, "Transform estimation failed"),
    }
    result
}
