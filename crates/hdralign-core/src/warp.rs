//! Bilinear warp of a full-resolution image into the reference frame,
//! restricted to the common region.

use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{AlignError, Result};
use crate::frame::{ColorFrame, Frame};
use crate::region::BoundingBox;
use crate::transform::AlignmentTransform;

/// Sample `data` at the fractional position `(y, x)`.
///
/// Points less than one pixel outside the top or left edge clamp to that
/// edge, as do the neighbours of points near the bottom or right edge.
/// Anything further out reads as zero.
pub fn bilinear_sample(data: &Array2<f32>, y: f64, x: f64) -> f32 {
    let (h, w) = data.dim();
    if h == 0 || w == 0 || !(x > -1.0 && x < w as f64) || !(y > -1.0 && y < h as f64) {
        return 0.0;
    }
    let x = x.max(0.0);
    let y = y.max(0.0);

    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let v00 = data[[y0, x0]];
    let v10 = data[[y0, x1]];
    let v01 = data[[y1, x0]];
    let v11 = data[[y1, x1]];

    v00 * (1.0 - fx) * (1.0 - fy) + v10 * fx * (1.0 - fy) + v01 * (1.0 - fx) * fy + v11 * fx * fy
}

/// Resample one plane into the reference frame and crop it to `bbox`.
///
/// Output pixel `(col, row)` corresponds to reference point
/// `(bbox.left + col, bbox.top + row)`, read from the source at the point
/// `transform` maps it to.
pub fn warp_plane_cropped(
    data: &Array2<f32>,
    transform: &AlignmentTransform,
    bbox: &BoundingBox,
) -> Result<Array2<f32>> {
    if bbox.is_empty() {
        return Err(AlignError::Resample(format!("empty crop region {bbox}")));
    }
    let out_w = bbox.width() as usize;
    let out_h = bbox.height() as usize;

    let pixel = |i: usize| {
        let row = i / out_w;
        let col = i % out_w;
        let (sx, sy) = transform.apply(
            (bbox.left + col as i64) as f64,
            (bbox.top + row as i64) as f64,
        );
        bilinear_sample(data, sy, sx)
    };

    let total = out_w * out_h;
    let pixels: Vec<f32> = if total >= PARALLEL_PIXEL_THRESHOLD {
        (0..total).into_par_iter().map(pixel).collect()
    } else {
        (0..total).map(pixel).collect()
    };

    Array2::from_shape_vec((out_h, out_w), pixels).map_err(|e| AlignError::Resample(e.to_string()))
}

/// Warp every channel of `color` into the reference frame and crop to `bbox`.
///
/// `bbox` must lie within the source canvas and `transform` must be
/// invertible; either violation fails this image only.
pub fn warp_and_crop(
    color: &ColorFrame,
    transform: &AlignmentTransform,
    bbox: &BoundingBox,
) -> Result<ColorFrame> {
    transform.inverse()?;

    let canvas = BoundingBox::canvas(color.width(), color.height());
    if !canvas.contains(bbox) {
        return Err(AlignError::Resample(format!(
            "crop {bbox} exceeds the {}x{} canvas",
            color.width(),
            color.height()
        )));
    }

    let [red, green, blue] = color
        .channels()
        .map(|plane| warp_plane_cropped(&plane.data, transform, bbox));

    Ok(ColorFrame {
        red: Frame::new(red?),
        green: Frame::new(green?),
        blue: Frame::new(blue?),
    })
}
