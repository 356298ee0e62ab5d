use crate::error::Result;
use crate::frame::GrayscaleProxy;
use crate::transform::AlignmentTransform;

/// Parameters forwarded to a [`TransformEstimator`] for every target image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EstimateParams {
    /// Number of coarse-to-fine pyramid levels.
    pub pyramid_levels: usize,
    /// Columns of the segmentation grid.
    pub segments_x: usize,
    /// Rows of the segmentation grid.
    pub segments_y: usize,
}

/// Geometric alignment primitive.
///
/// Implementations return a transform mapping reference-frame coordinates to
/// `target` coordinates. Both proxies share the same dimensions; the adapter
/// checks that before calling in.
pub trait TransformEstimator: Send + Sync {
    fn name(&self) -> &str;

    fn estimate(
        &self,
        reference: &GrayscaleProxy,
        target: &GrayscaleProxy,
        params: &EstimateParams,
    ) -> Result<AlignmentTransform>;
}
