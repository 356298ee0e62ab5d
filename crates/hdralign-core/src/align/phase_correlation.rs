use ndarray::Array2;
use num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{AlignError, Result};
use crate::warp::bilinear_sample;

use super::subpixel::refine_peak_paraboloid;

/// Translation that brings a target patch back onto its reference.
///
/// Shifting the target by `(dx, dy)` with [`shift_array`] aligns it with the
/// reference; the target content therefore sits at `reference - (dx, dy)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PatchOffset {
    pub dx: f64,
    pub dy: f64,
}

/// Compute the translation offset between two equally sized arrays using FFT
/// phase correlation.
pub fn compute_offset_array(reference: &Array2<f32>, target: &Array2<f32>) -> Result<PatchOffset> {
    let (h, w) = reference.dim();
    let (th, tw) = target.dim();
    if h != th || w != tw {
        return Err(AlignError::DimensionMismatch {
            expected: (w, h),
            got: (tw, th),
        });
    }
    if h < 2 || w < 2 {
        return Err(AlignError::InvalidDimensions {
            width: w,
            height: h,
        });
    }

    // Hann window against spectral leakage
    let ref_windowed = apply_hann(reference);
    let tgt_windowed = apply_hann(target);

    let ref_fft = fft2d(&ref_windowed);
    let tgt_fft = fft2d(&tgt_windowed);

    let cross_power = normalized_cross_power(&ref_fft, &tgt_fft);
    let correlation = ifft2d(&cross_power);

    let (peak_row, peak_col, peak_val) = find_peak(&correlation);
    if !peak_val.is_finite() {
        return Err(AlignError::Estimation(
            "phase correlation produced no finite peak".into(),
        ));
    }

    // Signed offset (wrap-around)
    let dy = if peak_row > h / 2 {
        peak_row as f64 - h as f64
    } else {
        peak_row as f64
    };
    let dx = if peak_col > w / 2 {
        peak_col as f64 - w as f64
    } else {
        peak_col as f64
    };

    let (sub_dy, sub_dx) = refine_peak_paraboloid(&correlation, peak_row, peak_col);

    Ok(PatchOffset {
        dx: dx + sub_dx,
        dy: dy + sub_dy,
    })
}

/// Shift an array by the given offset using bilinear interpolation.
pub fn shift_array(data: &Array2<f32>, offset: &PatchOffset) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h, w));

    for row in 0..h {
        for col in 0..w {
            let src_y = row as f64 - offset.dy;
            let src_x = col as f64 - offset.dx;
            result[[row, col]] = bilinear_sample(data, src_y, src_x);
        }
    }

    result
}

fn apply_hann(data: &Array2<f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let mut result = Array2::<f32>::zeros((h, w));

    for row in 0..h {
        let wy = 0.5 * (1.0 - (std::f64::consts::TAU * row as f64 / h as f64).cos());
        for col in 0..w {
            let wx = 0.5 * (1.0 - (std::f64::consts::TAU * col as f64 / w as f64).cos());
            result[[row, col]] = data[[row, col]] * (wy * wx) as f32;
        }
    }

    result
}

/// 2D FFT: row-wise FFT, then column-wise FFT.
fn fft2d(data: &Array2<f32>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft_forward(w);
    let fft_col = planner.plan_fft_forward(h);

    let mut result = data.mapv(|v| Complex::new(v as f64, 0.0));

    for row in 0..h {
        let mut row_data: Vec<Complex<f64>> = (0..w).map(|c| result[[row, c]]).collect();
        fft_row.process(&mut row_data);
        for (col, v) in row_data.into_iter().enumerate() {
            result[[row, col]] = v;
        }
    }

    for col in 0..w {
        let mut col_data: Vec<Complex<f64>> = (0..h).map(|r| result[[r, col]]).collect();
        fft_col.process(&mut col_data);
        for (row, v) in col_data.into_iter().enumerate() {
            result[[row, col]] = v;
        }
    }

    result
}

/// Inverse 2D FFT, real part, normalized.
fn ifft2d(data: &Array2<Complex<f64>>) -> Array2<f64> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let ifft_row = planner.plan_fft_inverse(w);
    let ifft_col = planner.plan_fft_inverse(h);

    let mut work = data.clone();

    for col in 0..w {
        let mut col_data: Vec<Complex<f64>> = (0..h).map(|r| work[[r, col]]).collect();
        ifft_col.process(&mut col_data);
        for (row, v) in col_data.into_iter().enumerate() {
            work[[row, col]] = v;
        }
    }

    for row in 0..h {
        let mut row_data: Vec<Complex<f64>> = (0..w).map(|c| work[[row, c]]).collect();
        ifft_row.process(&mut row_data);
        for (col, v) in row_data.into_iter().enumerate() {
            work[[row, col]] = v;
        }
    }

    let scale = 1.0 / (h * w) as f64;
    work.mapv(|c| c.re * scale)
}

fn normalized_cross_power(
    ref_fft: &Array2<Complex<f64>>,
    tgt_fft: &Array2<Complex<f64>>,
) -> Array2<Complex<f64>> {
    let mut result = ref_fft.clone();
    result.zip_mut_with(tgt_fft, |r, t| {
        let cross = *r * t.conj();
        let mag = cross.norm();
        *r = if mag > 1e-12 {
            cross / mag
        } else {
            Complex::new(0.0, 0.0)
        };
    });
    result
}

fn find_peak(data: &Array2<f64>) -> (usize, usize, f64) {
    let mut best_row = 0;
    let mut best_col = 0;
    let mut best_val = f64::NEG_INFINITY;

    for ((row, col), &v) in data.indexed_iter() {
        if v > best_val {
            best_val = v;
            best_row = row;
            best_col = col;
        }
    }

    (best_row, best_col, best_val)
}
