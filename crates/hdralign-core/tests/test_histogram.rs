mod common;

use ndarray::Array2;

use hdralign_core::exposure::{downsampled_histogram, sampled_positions};
use hdralign_core::frame::GrayscaleProxy;

use common::{flat_proxy, ramp_proxy};

#[test]
fn test_bin_sum_matches_sampled_positions() {
    for &(w, h, stride) in &[(800, 600, 8), (64, 48, 8), (63, 47, 8), (17, 5, 4), (10, 10, 1)] {
        let proxy = ramp_proxy(w, h, 0, 255, 0);
        let hist = downsampled_histogram(&proxy, stride).unwrap();
        let total: usize = hist.bins().iter().map(|&b| b as usize).sum();
        assert_eq!(total, sampled_positions(w, h, stride), "{w}x{h} stride {stride}");
        assert_eq!(total, hist.sample_count());
    }
}

#[test]
fn test_800x600_stride_8_samples_7500_positions() {
    let hist = downsampled_histogram(&flat_proxy(800, 600, 128), 8).unwrap();
    assert_eq!(hist.sample_count(), 7500);
    assert_eq!(hist.bins()[128], 7500);
}

#[test]
fn test_point_sampling_ignores_off_grid_pixels() {
    let mut data = Array2::<u8>::from_elem((16, 16), 40);
    // Off the stride grid: never sampled
    data[[3, 5]] = 250;
    data[[9, 1]] = 250;
    // On the grid
    data[[8, 8]] = 7;
    let hist = downsampled_histogram(&GrayscaleProxy::new(data), 8).unwrap();

    assert_eq!(hist.bins()[250], 0);
    assert_eq!(hist.bins()[7], 1);
    assert_eq!(hist.bins()[40], 3);
}

#[test]
fn test_full_byte_range_is_unsigned() {
    let mut data = Array2::<u8>::zeros((2, 2));
    data[[0, 0]] = 255;
    data[[0, 1]] = 128;
    data[[1, 0]] = 127;
    let hist = downsampled_histogram(&GrayscaleProxy::new(data), 1).unwrap();
    assert_eq!(hist.bins()[255], 1);
    assert_eq!(hist.bins()[128], 1);
    assert_eq!(hist.bins()[127], 1);
    assert_eq!(hist.bins()[0], 1);
}

#[test]
fn test_image_smaller_than_stride_has_no_samples() {
    let hist = downsampled_histogram(&flat_proxy(5, 5, 10), 8).unwrap();
    assert_eq!(hist.sample_count(), 0);
    assert!(hist.bins().iter().all(|&b| b == 0));
}
