use crate::exposure::DynamicRange;
use crate::frame::ColorFrame;
use crate::region::BoundingBox;
use crate::transform::AlignmentTransform;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Reading,
    ReferenceSelection,
    Estimation,
    CommonRegion,
    Warping,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "Reading images"),
            Self::ReferenceSelection => write!(f, "Selecting reference"),
            Self::Estimation => write!(f, "Estimating transforms"),
            Self::CommonRegion => write!(f, "Computing common region"),
            Self::Warping => write!(f, "Warping and cropping"),
        }
    }
}

/// Result for one slot of the batch.
#[derive(Clone, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum ImageOutcome {
    Aligned(ColorFrame),
    /// The slot is absent; `reason` says why.
    Failed { reason: String },
}

impl ImageOutcome {
    pub fn image(&self) -> Option<&ColorFrame> {
        match self {
            Self::Aligned(frame) => Some(frame),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_aligned(&self) -> bool {
        matches!(self, Self::Aligned(_))
    }
}

/// Aligned batch, index-aligned with the input paths.
#[derive(Clone, Debug)]
pub struct AlignedImageSet {
    pub images: Vec<ImageOutcome>,
    pub reference_index: usize,
    /// Trimmed histogram end points per input image.
    pub ranges: Vec<DynamicRange>,
    /// `None` where estimation failed or the inverse did not exist.
    pub transforms: Vec<Option<AlignmentTransform>>,
    pub bbox: BoundingBox,
}

impl AlignedImageSet {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ColorFrame> {
        self.images.get(index).and_then(ImageOutcome::image)
    }

    pub fn present_count(&self) -> usize {
        self.images.iter().filter(|o| o.is_aligned()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.present_count() == self.len()
    }

    /// `(index, reason)` for every absent slot.
    pub fn failures(&self) -> Vec<(usize, &str)> {
        self.images
            .iter()
            .enumerate()
            .filter_map(|(i, o)| match o {
                ImageOutcome::Failed { reason } => Some((i, reason.as_str())),
                ImageOutcome::Aligned(_) => None,
            })
            .collect()
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items in
    /// this stage, if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// `items_done` work items within the current stage have completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
