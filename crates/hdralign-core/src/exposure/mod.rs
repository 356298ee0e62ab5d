pub mod histogram;
pub mod reference;

pub use histogram::{downsampled_histogram, sampled_positions, Histogram};
pub use reference::{dynamic_range, select_reference, DynamicRange, ReferenceSelection};

use rayon::prelude::*;

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::Result;
use crate::frame::GrayscaleProxy;

/// Histogram every proxy at `stride` and pick the widest-range exposure.
pub fn select_reference_from_proxies(
    proxies: &[GrayscaleProxy],
    stride: usize,
) -> Result<ReferenceSelection> {
    let histograms: Vec<Histogram> = if proxies.len() >= PARALLEL_FRAME_THRESHOLD {
        proxies
            .par_iter()
            .map(|p| downsampled_histogram(p, stride))
            .collect::<Result<_>>()?
    } else {
        proxies
            .iter()
            .map(|p| downsampled_histogram(p, stride))
            .collect::<Result<_>>()?
    };
    select_reference(&histograms)
}
