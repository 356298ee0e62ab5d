use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Apply Gaussian blur to a raw array using separable 1D convolution.
/// Borders are clamped to the edge pixel.
pub fn gaussian_blur_array(data: &Array2<f32>, sigma: f32) -> Array2<f32> {
    let kernel = make_gaussian_kernel(sigma);
    let row_pass = convolve(data, &kernel, Direction::Rows);
    convolve(&row_pass, &kernel, Direction::Cols)
}

fn make_gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as usize;
    let size = 2 * radius + 1;
    let mut kernel = vec![0.0f32; size];
    let s2 = 2.0 * sigma * sigma;
    let mut sum = 0.0f32;

    for (i, k) in kernel.iter_mut().enumerate() {
        let x = i as f32 - radius as f32;
        *k = (-x * x / s2).exp();
        sum += *k;
    }

    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

#[derive(Clone, Copy)]
enum Direction {
    Rows,
    Cols,
}

fn convolve(data: &Array2<f32>, kernel: &[f32], direction: Direction) -> Array2<f32> {
    let (h, w) = data.dim();
    let radius = kernel.len() / 2;

    let tap = |row: usize, col: usize| -> f32 {
        let mut sum = 0.0f32;
        for (ki, &kv) in kernel.iter().enumerate() {
            let delta = ki as isize - radius as isize;
            let v = match direction {
                Direction::Rows => {
                    let c = (col as isize + delta).clamp(0, w as isize - 1) as usize;
                    data[[row, c]]
                }
                Direction::Cols => {
                    let r = (row as isize + delta).clamp(0, h as isize - 1) as usize;
                    data[[r, col]]
                }
            };
            sum += v * kv;
        }
        sum
    };

    let mut result = Array2::<f32>::zeros((h, w));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| (0..w).map(|col| tap(row, col)).collect())
            .collect();
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
    } else {
        for row in 0..h {
            for col in 0..w {
                result[[row, col]] = tap(row, col);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_image_is_unchanged() {
        let data = Array2::<f32>::from_elem((9, 7), 0.4);
        let blurred = gaussian_blur_array(&data, 1.0);
        assert!(blurred.iter().all(|v| (v - 0.4).abs() < 1e-6));
    }
}
