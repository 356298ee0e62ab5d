pub mod config;
mod diagnostics;
mod orchestrator;
mod types;

pub use orchestrator::{align, align_images_reported};
pub use types::{AlignedImageSet, ImageOutcome, NoOpReporter, PipelineStage, ProgressReporter};
