use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlignError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("At least {required} images are required for alignment, got {provided}")]
    TooFewImages { required: usize, provided: usize },

    #[error("Reference index {index} is out of range for {count} images")]
    ReferenceOutOfRange { index: usize, count: usize },

    #[error("Cannot read image {index} ({}): {reason}", path.display())]
    UnreadableImage {
        index: usize,
        path: PathBuf,
        reason: String,
    },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Image size {}x{} does not match the reference canvas {}x{}", got.0, got.1, expected.0, expected.1)]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Transform is not invertible (determinant {determinant:e})")]
    NonInvertible { determinant: f64 },

    #[error("Transform estimation failed: {0}")]
    Estimation(String),

    #[error("Common region is empty (left={left}, top={top}, right={right}, bottom={bottom})")]
    EmptyRegion {
        left: i64,
        top: i64,
        right: i64,
        bottom: i64,
    },

    #[error("Resample failed: {0}")]
    Resample(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AlignError>;
