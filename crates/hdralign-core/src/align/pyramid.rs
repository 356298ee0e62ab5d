//! Coarse-to-fine Gaussian pyramid phase correlation.
//!
//! Correlating at the coarsest level first lets a patch recover displacements
//! larger than half its size at full resolution; every finer level only has
//! to measure the residual.

use ndarray::Array2;

use crate::consts::{MIN_PYRAMID_LEVEL_SIZE, PYRAMID_BLUR_SIGMA};
use crate::error::Result;
use crate::filters::gaussian_blur::gaussian_blur_array;

use super::phase_correlation::{compute_offset_array, shift_array, PatchOffset};

/// Number of downsampled levels actually usable for an `h` x `w` patch:
/// at most `requested`, and never so many that the coarsest level drops
/// below [`MIN_PYRAMID_LEVEL_SIZE`] on its shorter side.
pub fn effective_levels(h: usize, w: usize, requested: usize) -> usize {
    let mut side = h.min(w);
    let mut levels = 0;
    while levels < requested && side / 2 >= MIN_PYRAMID_LEVEL_SIZE {
        side /= 2;
        levels += 1;
    }
    levels
}

/// Compute the offset of `target` relative to `reference` using up to
/// `levels` downsampled pyramid levels.
pub fn compute_offset_pyramid(
    reference: &Array2<f32>,
    target: &Array2<f32>,
    levels: usize,
) -> Result<PatchOffset> {
    let (h, w) = reference.dim();
    let levels = effective_levels(h, w, levels);

    let ref_pyramid = build_pyramid(reference, levels);
    let tgt_pyramid = build_pyramid(target, levels);

    let mut offset = PatchOffset::default();

    // Coarsest (last) to finest (first = original)
    for level in (0..=levels).rev() {
        if level < levels {
            offset.dx *= 2.0;
            offset.dy *= 2.0;
        }

        let shifted_target = shift_array(&tgt_pyramid[level], &offset);
        let residual = compute_offset_array(&ref_pyramid[level], &shifted_target)?;

        offset.dx += residual.dx;
        offset.dy += residual.dy;
    }

    Ok(offset)
}

/// Returns `levels + 1` arrays; index 0 is the original.
fn build_pyramid(data: &Array2<f32>, levels: usize) -> Vec<Array2<f32>> {
    let mut pyramid = Vec::with_capacity(levels + 1);
    pyramid.push(data.clone());

    for _ in 0..levels {
        let blurred = gaussian_blur_array(&pyramid[pyramid.len() - 1], PYRAMID_BLUR_SIGMA);
        pyramid.push(downsample_2x(&blurred));
    }

    pyramid
}

/// Downsample by 2x, keeping every other pixel.
fn downsample_2x(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let new_h = h.div_ceil(2);
    let new_w = w.div_ceil(2);
    Array2::from_shape_fn((new_h, new_w), |(r, c)| data[[r * 2, c * 2]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_stop_at_minimum_size() {
        assert_eq!(effective_levels(32, 32, 6), 1);
        assert_eq!(effective_levels(128, 96, 6), 2);
        assert_eq!(effective_levels(20, 20, 6), 0);
        assert_eq!(effective_levels(1024, 1024, 3), 3);
    }
}
