//! Reference exposure selection.
//!
//! The reference is the exposure whose trimmed histogram spread is widest:
//! 5% of the sampled pixels are cut from each tail so clipped shadows and
//! blown highlights cannot dominate the score.

use tracing::{debug, info};

use crate::consts::{HISTOGRAM_BINS, TRIM_DIVISOR};
use crate::error::{AlignError, Result};

use super::histogram::Histogram;

/// Trimmed end points of one histogram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DynamicRange {
    /// Low end point: first bin where the cumulative count passes the low trim.
    pub lep: usize,
    /// High end point: first bin where the cumulative count passes the high trim.
    pub hep: usize,
}

impl DynamicRange {
    pub fn score(&self) -> usize {
        self.hep - self.lep
    }
}

/// Outcome of reference selection over a whole batch.
#[derive(Clone, Debug)]
pub struct ReferenceSelection {
    pub index: usize,
    /// Per-image end points, index-aligned with the input.
    pub ranges: Vec<DynamicRange>,
}

impl ReferenceSelection {
    pub fn reference_range(&self) -> DynamicRange {
        self.ranges[self.index]
    }
}

/// Compute the trimmed end points of `hist`.
///
/// The high scan resumes at the low end point with the running sum intact,
/// so the LEP bin is counted twice. A scan that never crosses its threshold
/// ends at [`HISTOGRAM_BINS`].
pub fn dynamic_range(hist: &Histogram) -> DynamicRange {
    let total = hist.sample_count();
    let threshold = total / TRIM_DIVISOR;
    let bins = hist.bins();

    let mut sum = 0usize;
    let mut m = 0;
    while m < HISTOGRAM_BINS {
        sum += bins[m] as usize;
        if sum > threshold {
            break;
        }
        m += 1;
    }
    let lep = m;

    let high_threshold = total - threshold;
    while m < HISTOGRAM_BINS {
        sum += bins[m] as usize;
        if sum > high_threshold {
            break;
        }
        m += 1;
    }
    let hep = m;

    DynamicRange { lep, hep }
}

/// Pick the histogram with the strictly largest trimmed spread.
///
/// Ties keep the earliest image; a batch of flat images selects index 0.
pub fn select_reference(histograms: &[Histogram]) -> Result<ReferenceSelection> {
    if histograms.is_empty() {
        return Err(AlignError::TooFewImages {
            required: 1,
            provided: 0,
        });
    }

    let ranges: Vec<DynamicRange> = histograms.iter().map(dynamic_range).collect();

    let mut index = 0;
    let mut best = 0;
    for (i, range) in ranges.iter().enumerate() {
        debug!(image = i, lep = range.lep, hep = range.hep, "Trimmed dynamic range");
        if range.score() == 0 {
            debug!(image = i, "Flat exposure, zero dynamic range");
        }
        if range.score() > best {
            best = range.score();
            index = i;
        }
    }

    info!(reference = index, score = best, "Selected reference exposure");
    Ok(ReferenceSelection { index, ranges })
}
