use ndarray::Array2;

/// Refine peak location using paraboloid fitting on the 3x3 neighborhood.
///
/// The correlation surface is periodic, so neighbours wrap around the edges.
/// Returns (delta_row, delta_col) as fractional pixel offsets from the integer peak.
pub fn refine_peak_paraboloid(
    correlation: &Array2<f64>,
    peak_row: usize,
    peak_col: usize,
) -> (f64, f64) {
    let (h, w) = correlation.dim();

    if h < 3 || w < 3 || peak_row >= h || peak_col >= w {
        return (0.0, 0.0);
    }
    let up = (peak_row + h - 1) % h;
    let down = (peak_row + 1) % h;
    let left = (peak_col + w - 1) % w;
    let right = (peak_col + 1) % w;

    let delta_row = parabola_vertex(
        correlation[[up, peak_col]],
        correlation[[peak_row, peak_col]],
        correlation[[down, peak_col]],
    );
    let delta_col = parabola_vertex(
        correlation[[peak_row, left]],
        correlation[[peak_row, peak_col]],
        correlation[[peak_row, right]],
    );

    (delta_row.clamp(-0.5, 0.5), delta_col.clamp(-0.5, 0.5))
}

fn parabola_vertex(prev: f64, curr: f64, next: f64) -> f64 {
    let denom = prev - 2.0 * curr + next;
    if denom.abs() > 1e-12 {
        (prev - next) / (2.0 * denom)
    } else {
        0.0
    }
}
