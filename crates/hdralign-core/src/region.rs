//! Common valid region across an aligned batch.
//!
//! Each image's canvas is projected into the reference frame through the
//! inverse of its transform; the batch can only be merged inside the
//! intersection of all these footprints.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AlignError, Result};
use crate::transform::AlignmentTransform;

/// Integer rectangle in reference-frame pixels. `right` and `bottom` are
/// exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl BoundingBox {
    /// The full `width` x `height` canvas.
    pub fn canvas(width: usize, height: usize) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width as i64,
            bottom: height as i64,
        }
    }

    pub fn width(&self) -> i64 {
        self.right - self.left
    }

    pub fn height(&self) -> i64 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    /// Shrink to the part of the reference frame covered by an image of
    /// `width` x `height` warped through `transform`.
    ///
    /// Projected corners are truncated toward zero. On a non-invertible
    /// transform the box is left untouched.
    pub fn intersect_footprint(
        &mut self,
        transform: &AlignmentTransform,
        width: usize,
        height: usize,
    ) -> Result<()> {
        let to_reference = transform.inverse()?;
        let (w, h) = (width as f64, height as f64);

        let project = |x: f64, y: f64| {
            let (rx, ry) = to_reference.apply(x, y);
            (rx as i64, ry as i64)
        };
        let top_left = project(0.0, 0.0);
        let top_right = project(w, 0.0);
        let bottom_left = project(0.0, h);
        let bottom_right = project(w, h);

        self.left = self.left.max(top_left.0).max(bottom_left.0);
        self.right = self.right.min(top_right.0).min(bottom_right.0);
        self.top = self.top.max(top_left.1).max(top_right.1);
        self.bottom = self.bottom.min(bottom_left.1).min(bottom_right.1);
        Ok(())
    }

    /// Error out if the box has collapsed.
    pub fn validated(self) -> Result<Self> {
        if self.is_empty() {
            return Err(AlignError::EmptyRegion {
                left: self.left,
                top: self.top,
                right: self.right,
                bottom: self.bottom,
            });
        }
        Ok(self)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width(),
            self.height(),
            self.left,
            self.top
        )
    }
}

/// Intersection of every footprint, plus the images that had to be left out.
#[derive(Debug)]
pub struct CommonRegion {
    pub bbox: BoundingBox,
    /// Images whose transform could not be inverted.
    pub excluded: Vec<(usize, AlignError)>,
}

/// Fold every `(index, transform)` footprint into the full canvas.
///
/// A transform without an inverse is reported in
/// [`CommonRegion::excluded`] instead of aborting. A collapsed intersection
/// is a batch-level error.
pub fn common_region(
    width: usize,
    height: usize,
    transforms: &[(usize, AlignmentTransform)],
) -> Result<CommonRegion> {
    let mut bbox = BoundingBox::canvas(width, height);
    let mut excluded = Vec::new();

    for (index, transform) in transforms {
        match bbox.intersect_footprint(transform, width, height) {
            Ok(()) => debug!(image = index, bbox = %bbox, "Folded footprint"),
            Err(e) => {
                warn!(image = index, error = %e, "Excluding image from common region");
                excluded.push((*index, e));
            }
        }
    }

    Ok(CommonRegion {
        bbox: bbox.validated()?,
        excluded,
    })
}
