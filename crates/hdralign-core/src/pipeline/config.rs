use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::align::EstimateParams;
use crate::consts::{
    DEFAULT_HISTOGRAM_STRIDE, DEFAULT_MIN_SEGMENT_VARIANCE, DEFAULT_PYRAMID_LEVELS,
    DEFAULT_SEGMENTS_X, DEFAULT_SEGMENTS_Y,
};
use crate::error::{AlignError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Point-sampling stride of the reference-selection histogram.
    pub histogram_stride: usize,
    /// Coarse-to-fine pyramid levels used by the estimator.
    pub pyramid_levels: usize,
    pub segments_x: usize,
    pub segments_y: usize,
    /// Reference patches flatter than this variance are not matched.
    pub min_segment_variance: f32,
    pub diagnostics: DiagnosticsConfig,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            histogram_stride: DEFAULT_HISTOGRAM_STRIDE,
            pyramid_levels: DEFAULT_PYRAMID_LEVELS,
            segments_x: DEFAULT_SEGMENTS_X,
            segments_y: DEFAULT_SEGMENTS_Y,
            min_segment_variance: DEFAULT_MIN_SEGMENT_VARIANCE,
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl AlignConfig {
    pub fn estimate_params(&self) -> EstimateParams {
        EstimateParams {
            pyramid_levels: self.pyramid_levels,
            segments_x: self.segments_x,
            segments_y: self.segments_y,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.histogram_stride == 0 {
            return Err(AlignError::InvalidConfig(
                "histogram_stride must be at least 1".into(),
            ));
        }
        if self.segments_x == 0 || self.segments_y == 0 {
            return Err(AlignError::InvalidConfig(format!(
                "segmentation grid must be at least 1x1, got {}x{}",
                self.segments_x, self.segments_y
            )));
        }
        if !self.min_segment_variance.is_finite() || self.min_segment_variance < 0.0 {
            return Err(AlignError::InvalidConfig(format!(
                "min_segment_variance must be a non-negative number, got {}",
                self.min_segment_variance
            )));
        }
        Ok(())
    }
}

/// Diagnostic output. Never changes alignment results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Log per-image timing and transform parameters at info level.
    pub verbose: bool,
    /// Write every image's segmentation patches here as PNG.
    pub patch_dump_dir: Option<PathBuf>,
}
