use crate::consts::{MIN_FIT_CORRESPONDENCES, SINGULAR_EPSILON};
use crate::error::{AlignError, Result};
use crate::transform::AlignmentTransform;

/// A matched point pair: `reference` in the reference frame, `target` the
/// same scene point in the target image's frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correspondence {
    pub reference: (f64, f64),
    pub target: (f64, f64),
}

/// Least-squares 6-DOF affine fit mapping reference points onto target points.
///
/// Points are centred before solving so the 2x2 normal system stays well
/// conditioned for large canvases.
pub fn fit_affine(pairs: &[Correspondence]) -> Result<AlignmentTransform> {
    if pairs.len() < MIN_FIT_CORRESPONDENCES {
        return Err(AlignError::Estimation(format!(
            "need at least {MIN_FIT_CORRESPONDENCES} correspondences, got {}",
            pairs.len()
        )));
    }

    let n = pairs.len() as f64;
    let (mut rx, mut ry, mut tx, mut ty) = (0.0, 0.0, 0.0, 0.0);
    for p in pairs {
        rx += p.reference.0;
        ry += p.reference.1;
        tx += p.target.0;
        ty += p.target.1;
    }
    let (rx, ry, tx, ty) = (rx / n, ry / n, tx / n, ty / n);

    // Second moments of the centred reference points and the cross terms
    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    let (mut ux, mut uy, mut vx, mut vy) = (0.0, 0.0, 0.0, 0.0);
    for p in pairs {
        let x = p.reference.0 - rx;
        let y = p.reference.1 - ry;
        let u = p.target.0 - tx;
        let v = p.target.1 - ty;
        sxx += x * x;
        sxy += x * y;
        syy += y * y;
        ux += u * x;
        uy += u * y;
        vx += v * x;
        vy += v * y;
    }

    let det = sxx * syy - sxy * sxy;
    let scale = (sxx * syy).max(SINGULAR_EPSILON);
    if !det.is_finite() || det.abs() / scale < 1e-9 {
        return Err(AlignError::Estimation(
            "correspondences are collinear".into(),
        ));
    }

    let m00 = (ux * syy - uy * sxy) / det;
    let m01 = (uy * sxx - ux * sxy) / det;
    let m10 = (vx * syy - vy * sxy) / det;
    let m11 = (vy * sxx - vx * sxy) / det;

    Ok(AlignmentTransform {
        m00,
        m01,
        m10,
        m11,
        tx: tx - (m00 * rx + m01 * ry),
        ty: ty - (m10 * rx + m11 * ry),
    })
}
