pub mod affine_fit;
mod dispatcher;
pub mod estimator;
pub mod phase_correlation;
pub mod pyramid;
pub mod segmented;
pub mod subpixel;

pub use dispatcher::estimate_transforms;
pub use estimator::{EstimateParams, TransformEstimator};
pub use segmented::{segment_grid, PatchRect, SegmentedPhaseEstimator};
