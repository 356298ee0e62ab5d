//! Affine alignment transforms.
//!
//! An [`AlignmentTransform`] maps a point in the reference frame to the
//! corresponding point in one image's own frame:
//!
//! ```text
//! x' = m00 * x + m01 * y + tx
//! y' = m10 * x + m11 * y + ty
//! ```
//!
//! Its inverse maps that image's coordinates back into the reference frame.

use serde::{Deserialize, Serialize};

use crate::consts::SINGULAR_EPSILON;
use crate::error::{AlignError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignmentTransform {
    pub m00: f64,
    pub m01: f64,
    pub m10: f64,
    pub m11: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AlignmentTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AlignmentTransform {
    pub const fn identity() -> Self {
        Self {
            m00: 1.0,
            m01: 0.0,
            m10: 0.0,
            m11: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self {
            m00: 1.0,
            m01: 0.0,
            m10: 0.0,
            m11: 1.0,
            tx,
            ty,
        }
    }

    /// Counter-clockwise rotation by `angle` radians about `(cx, cy)`.
    pub fn rotation_about(angle: f64, cx: f64, cy: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            m00: cos,
            m01: -sin,
            m10: sin,
            m11: cos,
            tx: cx - cos * cx + sin * cy,
            ty: cy - sin * cx - cos * cy,
        }
    }

    pub fn determinant(&self) -> f64 {
        self.m00 * self.m11 - self.m01 * self.m10
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Map a reference-frame point into this image's frame.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.m00 * x + self.m01 * y + self.tx,
            self.m10 * x + self.m11 * y + self.ty,
        )
    }

    /// The image-to-reference map.
    pub fn inverse(&self) -> Result<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Err(AlignError::NonInvertible { determinant: det });
        }
        let inv_det = 1.0 / det;
        let m00 = self.m11 * inv_det;
        let m01 = -self.m01 * inv_det;
        let m10 = -self.m10 * inv_det;
        let m11 = self.m00 * inv_det;
        Ok(Self {
            m00,
            m01,
            m10,
            m11,
            tx: -(m00 * self.tx + m01 * self.ty),
            ty: -(m10 * self.tx + m11 * self.ty),
        })
    }
}

impl std::fmt::Display for AlignmentTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[[{:.5}, {:.5}, {:.3}], [{:.5}, {:.5}, {:.3}]]",
            self.m00, self.m01, self.tx, self.m10, self.m11, self.ty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn inverse_round_trips_points() {
        let t = AlignmentTransform {
            m00: 1.02,
            m01: -0.05,
            m10: 0.04,
            m11: 0.98,
            tx: 12.5,
            ty: -7.25,
        };
        let inv = t.inverse().unwrap();
        let (x, y) = t.apply(100.0, 40.0);
        let (bx, by) = inv.apply(x, y);
        assert_relative_eq!(bx, 100.0, epsilon = 1e-9);
        assert_relative_eq!(by, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn singular_transform_has_no_inverse() {
        let t = AlignmentTransform {
            m00: 1.0,
            m01: 2.0,
            m10: 2.0,
            m11: 4.0,
            tx: 0.0,
            ty: 0.0,
        };
        assert!(matches!(
            t.inverse(),
            Err(AlignError::NonInvertible { .. })
        ));
    }
}
