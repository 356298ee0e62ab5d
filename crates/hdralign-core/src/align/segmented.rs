//! Segmented phase-correlation estimator.
//!
//! The canvas is cut into a grid of patches. Each textured patch is matched
//! with pyramid phase correlation, giving one point correspondence at its
//! centre, and a 6-DOF affine is fitted through all correspondences.

use ndarray::{s, Array2};
use tracing::trace;

use crate::consts::DEFAULT_MIN_SEGMENT_VARIANCE;
use crate::error::{AlignError, Result};
use crate::frame::GrayscaleProxy;
use crate::transform::AlignmentTransform;

use super::affine_fit::{fit_affine, Correspondence};
use super::estimator::{EstimateParams, TransformEstimator};
use super::pyramid::compute_offset_pyramid;

/// One cell of the segmentation grid, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PatchRect {
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + (self.width as f64 - 1.0) / 2.0,
            self.y as f64 + (self.height as f64 - 1.0) / 2.0,
        )
    }
}

/// Partition a `width` x `height` canvas into `segments_x` x `segments_y`
/// equal patches, row-major. Remainder pixels on the right and bottom edges
/// belong to no patch.
pub fn segment_grid(
    width: usize,
    height: usize,
    segments_x: usize,
    segments_y: usize,
) -> Vec<PatchRect> {
    if segments_x == 0 || segments_y == 0 {
        return Vec::new();
    }
    let pw = width / segments_x;
    let ph = height / segments_y;
    if pw == 0 || ph == 0 {
        return Vec::new();
    }

    let mut rects = Vec::with_capacity(segments_x * segments_y);
    for sy in 0..segments_y {
        for sx in 0..segments_x {
            rects.push(PatchRect {
                x: sx * pw,
                y: sy * ph,
                width: pw,
                height: ph,
            });
        }
    }
    rects
}

#[derive(Clone, Debug)]
pub struct SegmentedPhaseEstimator {
    /// Reference patches flatter than this are not matched.
    pub min_segment_variance: f32,
}

impl Default for SegmentedPhaseEstimator {
    fn default() -> Self {
        Self {
            min_segment_variance: DEFAULT_MIN_SEGMENT_VARIANCE,
        }
    }
}

impl SegmentedPhaseEstimator {
    pub fn new(min_segment_variance: f32) -> Self {
        Self {
            min_segment_variance,
        }
    }
}

impl TransformEstimator for SegmentedPhaseEstimator {
    fn name(&self) -> &str {
        "segmented-phase"
    }

    fn estimate(
        &self,
        reference: &GrayscaleProxy,
        target: &GrayscaleProxy,
        params: &EstimateParams,
    ) -> Result<AlignmentTransform> {
        if reference.dimensions() != target.dimensions() {
            return Err(AlignError::DimensionMismatch {
                expected: reference.dimensions(),
                got: target.dimensions(),
            });
        }

        let ref_data = reference.to_f32();
        let tgt_data = target.to_f32();
        let grid = segment_grid(
            reference.width(),
            reference.height(),
            params.segments_x,
            params.segments_y,
        );

        let mut pairs = Vec::with_capacity(grid.len());
        for rect in &grid {
            let ref_patch = patch(&ref_data, rect);
            if variance(&ref_patch) < self.min_segment_variance {
                trace!(x = rect.x, y = rect.y, "Skipping flat segment");
                continue;
            }
            let tgt_patch = patch(&tgt_data, rect);
            let offset = compute_offset_pyramid(&ref_patch, &tgt_patch, params.pyramid_levels)?;

            let (cx, cy) = rect.center();
            pairs.push(Correspondence {
                reference: (cx, cy),
                target: (cx - offset.dx, cy - offset.dy),
            });
        }

        let transform = fit_affine(&pairs)?;
        transform.inverse()?;
        Ok(transform)
    }
}

fn patch(data: &Array2<f32>, rect: &PatchRect) -> Array2<f32> {
    data.slice(s![rect.y..rect.y + rect.height, rect.x..rect.x + rect.width])
        .to_owned()
}

fn variance(data: &Array2<f32>) -> f32 {
    let n = data.len();
    if n == 0 {
        return 0.0;
    }
    let mean = data.iter().sum::<f32>() / n as f32;
    data.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_covers_canvas_row_major() {
        let grid = segment_grid(70, 60, 7, 6);
        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0], PatchRect { x: 0, y: 0, width: 10, height: 10 });
        assert_eq!(grid[7], PatchRect { x: 0, y: 10, width: 10, height: 10 });
        assert_eq!(grid[41], PatchRect { x: 60, y: 50, width: 10, height: 10 });
    }

    #[test]
    fn grid_drops_remainder_pixels() {
        let grid = segment_grid(23, 10, 2, 1);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1].x + grid[1].width, 22);
    }

    #[test]
    fn degenerate_grid_is_empty() {
        assert!(segment_grid(10, 10, 0, 3).is_empty());
        assert!(segment_grid(3, 3, 4, 4).is_empty());
    }
}
