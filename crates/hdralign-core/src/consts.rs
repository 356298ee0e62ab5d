/// Minimum number of images an alignment batch must contain.
pub const MIN_IMAGES: usize = 2;

/// Number of bins in a luminance histogram (one per 8-bit level).
pub const HISTOGRAM_BINS: usize = 256;

/// Default point-sampling stride for the reference-selection histogram.
pub const DEFAULT_HISTOGRAM_STRIDE: usize = 8;

/// Each histogram tail trimmed before measuring dynamic range is
/// `1 / TRIM_DIVISOR` of the sampled pixels (5%).
pub const TRIM_DIVISOR: usize = 20;

/// Default number of coarse-to-fine pyramid levels for transform estimation.
pub const DEFAULT_PYRAMID_LEVELS: usize = 6;

/// Default number of segmentation grid columns.
pub const DEFAULT_SEGMENTS_X: usize = 7;

/// Default number of segmentation grid rows.
pub const DEFAULT_SEGMENTS_Y: usize = 6;

/// Reference patches with a variance below this (on the [0, 1] intensity
/// scale) carry no texture and are skipped during estimation.
pub const DEFAULT_MIN_SEGMENT_VARIANCE: f32 = 1e-4;

/// Smallest side (in pixels) a pyramid level may have.
pub const MIN_PYRAMID_LEVEL_SIZE: usize = 16;

/// Gaussian blur sigma used for building the pyramid in coarse-to-fine alignment.
pub const PYRAMID_BLUR_SIGMA: f32 = 1.0;

/// Minimum number of patch correspondences for a 6-DOF affine fit.
pub const MIN_FIT_CORRESPONDENCES: usize = 3;

/// Determinants below this magnitude are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-12;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum image count to use image-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Number of channels in a color frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;
