mod common;

use approx::assert_abs_diff_eq;
use ndarray::Array2;
use std::f64::consts::FRAC_PI_2;

use hdralign_core::error::AlignError;
use hdralign_core::frame::{ColorFrame, Frame};
use hdralign_core::region::{common_region, BoundingBox};
use hdralign_core::transform::AlignmentTransform;
use hdralign_core::warp::{bilinear_sample, warp_and_crop, warp_plane_cropped};

use common::coordinate_color;

#[test]
fn test_bilinear_sample_interpolates_between_pixels() {
    let data = Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 2.0, 3.0]).unwrap();
    assert_abs_diff_eq!(bilinear_sample(&data, 0.0, 0.5), 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(bilinear_sample(&data, 0.5, 0.0), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(bilinear_sample(&data, 0.5, 0.5), 1.5, epsilon = 1e-6);
}

#[test]
fn test_bilinear_sample_outside_reads_zero() {
    let data = Array2::from_elem((4, 4), 1.0f32);
    assert_eq!(bilinear_sample(&data, -1.0, 1.0), 0.0);
    assert_eq!(bilinear_sample(&data, 1.0, -1.5), 0.0);
    assert_eq!(bilinear_sample(&data, 1.0, 4.0), 0.0);
    // Last column is inside; its right neighbour clamps to itself.
    assert_eq!(bilinear_sample(&data, 1.0, 3.5), 1.0);
}

#[test]
fn test_bilinear_sample_clamps_within_one_pixel_of_edge() {
    let data = Array2::from_shape_vec((2, 2), vec![0.25, 1.0, 2.0, 3.0]).unwrap();
    assert_eq!(bilinear_sample(&data, -0.5, 0.0), 0.25);
    assert_eq!(bilinear_sample(&data, 0.0, -0.75), 0.25);
    assert_abs_diff_eq!(bilinear_sample(&data, -0.3, 0.5), 0.625, epsilon = 1e-6);
}

#[test]
fn test_fractional_footprint_edge_is_fully_covered() {
    let (w, h) = (40usize, 30usize);
    let ones = ColorFrame {
        red: Frame::new(Array2::from_elem((h, w), 1.0)),
        green: Frame::new(Array2::from_elem((h, w), 1.0)),
        blue: Frame::new(Array2::from_elem((h, w), 1.0)),
    };
    let t = AlignmentTransform::translation(-0.5, -1.5);
    let region = common_region(w, h, &[(1, t)]).unwrap();
    assert_eq!(
        region.bbox,
        BoundingBox {
            left: 0,
            top: 1,
            right: 40,
            bottom: 30
        }
    );

    let out = warp_and_crop(&ones, &t, &region.bbox).unwrap();
    for plane in out.channels() {
        let first_row_min = plane.data.row(0).iter().copied().fold(f32::INFINITY, f32::min);
        let first_col_min = plane
            .data
            .column(0)
            .iter()
            .copied()
            .fold(f32::INFINITY, f32::min);
        assert!(first_row_min > 0.0, "row 0 reads outside the image");
        assert!(first_col_min > 0.0, "column 0 reads outside the image");
        assert!(plane.data.iter().all(|&v| (v - 1.0).abs() < 1e-6));
    }
}

#[test]
fn test_identity_warp_reproduces_image() {
    let color = coordinate_color(40, 30);
    let bbox = BoundingBox::canvas(40, 30);
    let out = warp_and_crop(&color, &AlignmentTransform::identity(), &bbox).unwrap();
    assert_eq!(out.dimensions(), (40, 30));
    assert_eq!(out.red.data, color.red.data);
    assert_eq!(out.green.data, color.green.data);
    assert_eq!(out.blue.data, color.blue.data);
}

#[test]
fn test_translation_reads_shifted_source() {
    let (w, h) = (40usize, 30usize);
    let color = coordinate_color(w, h);
    // Content sits 3 px right and 2 px down in this image.
    let t = AlignmentTransform::translation(3.0, 2.0);
    let bbox = BoundingBox {
        left: 0,
        top: 0,
        right: 37,
        bottom: 28,
    };
    let out = warp_and_crop(&color, &t, &bbox).unwrap();
    assert_eq!(out.dimensions(), (37, 28));

    for (row, col) in [(0usize, 0usize), (5, 10), (27, 36)] {
        assert_abs_diff_eq!(
            out.red.data[[row, col]],
            (col + 3) as f32 / w as f32,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            out.green.data[[row, col]],
            (row + 2) as f32 / h as f32,
            epsilon = 1e-6
        );
    }
}

#[test]
fn test_crop_offset_is_applied() {
    let color = coordinate_color(40, 30);
    let bbox = BoundingBox {
        left: 4,
        top: 2,
        right: 40,
        bottom: 30,
    };
    let t = AlignmentTransform::translation(-4.0, -2.0);
    let out = warp_and_crop(&color, &t, &bbox).unwrap();
    assert_eq!(out.dimensions(), (36, 28));
    // Reference point (4, 2) reads source (0, 0).
    assert_abs_diff_eq!(out.red.data[[0, 0]], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(out.green.data[[0, 0]], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(out.blue.data[[10, 10]], 0.5, epsilon = 1e-6);
}

#[test]
fn test_half_pixel_translation_interpolates() {
    let color = coordinate_color(20, 10);
    let t = AlignmentTransform::translation(0.5, 0.0);
    let bbox = BoundingBox {
        left: 0,
        top: 0,
        right: 19,
        bottom: 10,
    };
    let out = warp_and_crop(&color, &t, &bbox).unwrap();
    assert_abs_diff_eq!(out.red.data[[3, 4]], 4.5 / 20.0, epsilon = 1e-6);
}

#[test]
fn test_quarter_turn_about_centre() {
    let size = 21;
    let color = coordinate_color(size, size);
    let t = AlignmentTransform::rotation_about(FRAC_PI_2, 10.0, 10.0);
    let bbox = BoundingBox::canvas(size, size);
    let out = warp_plane_cropped(&color.red.data, &t, &bbox).unwrap();

    // Reference (11, 10) maps to source (10, 11): red = 10 / 21.
    assert_abs_diff_eq!(out[[10, 11]], 10.0 / 21.0, epsilon = 1e-5);
    // Reference (10, 11) maps to source (9, 10).
    assert_abs_diff_eq!(out[[11, 10]], 9.0 / 21.0, epsilon = 1e-5);
}

#[test]
fn test_crop_outside_canvas_fails() {
    let color = coordinate_color(20, 10);
    let bbox = BoundingBox {
        left: 0,
        top: 0,
        right: 25,
        bottom: 10,
    };
    let err = warp_and_crop(&color, &AlignmentTransform::identity(), &bbox).unwrap_err();
    assert!(matches!(err, AlignError::Resample(_)));
}

#[test]
fn test_singular_transform_fails() {
    let color = coordinate_color(20, 10);
    let t = AlignmentTransform {
        m00: 0.0,
        m01: 0.0,
        m10: 0.0,
        m11: 0.0,
        tx: 0.0,
        ty: 0.0,
    };
    let err = warp_and_crop(&color, &t, &BoundingBox::canvas(20, 10)).unwrap_err();
    assert!(matches!(err, AlignError::NonInvertible { .. }));
}

#[test]
fn test_empty_crop_fails() {
    let data = Array2::zeros((10, 10));
    let bbox = BoundingBox {
        left: 5,
        top: 0,
        right: 5,
        bottom: 10,
    };
    assert!(warp_plane_cropped(&data, &AlignmentTransform::identity(), &bbox).is_err());
}
