#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use ndarray::{s, Array2};

use hdralign_core::align::{EstimateParams, TransformEstimator};
use hdralign_core::error::{AlignError, Result};
use hdralign_core::filters::gaussian_blur::gaussian_blur_array;
use hdralign_core::frame::{ColorFrame, Frame, GrayscaleProxy};
use hdralign_core::io::ImageSource;
use hdralign_core::pipeline::{PipelineStage, ProgressReporter};
use hdralign_core::transform::AlignmentTransform;

/// Horizontal ramp from `lo` to `hi`, with `tag` written at (0, 0) so stub
/// collaborators can tell images apart.
pub fn ramp_proxy(width: usize, height: usize, lo: u8, hi: u8, tag: u8) -> GrayscaleProxy {
    let span = hi as f64 - lo as f64;
    let mut data = Array2::from_shape_fn((height, width), |(_, c)| {
        let t = if width > 1 {
            c as f64 / (width - 1) as f64
        } else {
            0.0
        };
        (lo as f64 + span * t).round() as u8
    });
    data[[0, 0]] = tag;
    GrayscaleProxy::new(data)
}

pub fn flat_proxy(width: usize, height: usize, value: u8) -> GrayscaleProxy {
    GrayscaleProxy::new(Array2::from_elem((height, width), value))
}

/// Color frame whose red channel encodes x / width and green encodes
/// y / height, so resampled values reveal where they were read from.
pub fn coordinate_color(width: usize, height: usize) -> ColorFrame {
    ColorFrame {
        red: Frame::new(Array2::from_shape_fn((height, width), |(_, c)| {
            c as f32 / width as f32
        })),
        green: Frame::new(Array2::from_shape_fn((height, width), |(r, _)| {
            r as f32 / height as f32
        })),
        blue: Frame::new(Array2::from_elem((height, width), 0.5)),
    }
}

/// Deterministic smooth random texture normalised to [0, 1].
pub fn textured(width: usize, height: usize, seed: u64) -> Array2<f32> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let noise = Array2::from_shape_fn((height, width), |_| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as f32) / ((1u64 << 31) as f32)
    });
    let blurred = gaussian_blur_array(&noise, 1.5);
    let min = blurred.iter().copied().fold(f32::INFINITY, f32::min);
    let max = blurred.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    blurred.mapv(|v| (v - min) / (max - min))
}

/// A `width` x `height` window of `big` whose content is moved by
/// `(dx, dy)` relative to the window at `(margin, margin)`.
///
/// The reference point `p` of the unshifted window shows up at `p + (dx, dy)`
/// in the returned one.
pub fn shifted_window(
    big: &Array2<f32>,
    width: usize,
    height: usize,
    margin: usize,
    dx: isize,
    dy: isize,
) -> Array2<f32> {
    let x0 = (margin as isize - dx) as usize;
    let y0 = (margin as isize - dy) as usize;
    big.slice(s![y0..y0 + height, x0..x0 + width]).to_owned()
}

pub fn to_proxy(data: &Array2<f32>, gain: f32) -> GrayscaleProxy {
    GrayscaleProxy::new(data.mapv(|v| ((v * gain).clamp(0.0, 1.0) * 255.0).round() as u8))
}

pub fn gray_to_color(data: &Array2<f32>, gain: f32) -> ColorFrame {
    let plane = data.mapv(|v| (v * gain).clamp(0.0, 1.0));
    ColorFrame {
        red: Frame::new(plane.clone()),
        green: Frame::new(plane.clone()),
        blue: Frame::new(plane),
    }
}

#[derive(Default)]
pub struct MemoryImageSource {
    gray: HashMap<PathBuf, GrayscaleProxy>,
    color: HashMap<PathBuf, ColorFrame>,
}

impl MemoryImageSource {
    pub fn insert(&mut self, path: &str, gray: Option<GrayscaleProxy>, color: Option<ColorFrame>) {
        if let Some(g) = gray {
            self.gray.insert(PathBuf::from(path), g);
        }
        if let Some(c) = color {
            self.color.insert(PathBuf::from(path), c);
        }
    }
}

impl ImageSource for MemoryImageSource {
    fn load_gray(&self, path: &Path) -> Result<GrayscaleProxy> {
        self.gray
            .get(path)
            .cloned()
            .ok_or_else(|| AlignError::Io(std::io::Error::from(std::io::ErrorKind::NotFound)))
    }

    fn load_color(&self, path: &Path) -> Result<ColorFrame> {
        self.color
            .get(path)
            .cloned()
            .ok_or_else(|| AlignError::Io(std::io::Error::from(std::io::ErrorKind::NotFound)))
    }
}

/// Returns a fixed transform per target, keyed on the target's (0, 0) tag.
/// A `None` entry makes the estimate fail.
#[derive(Default)]
pub struct StubEstimator {
    pub by_tag: HashMap<u8, Option<AlignmentTransform>>,
    pub calls: AtomicUsize,
}

impl StubEstimator {
    pub fn with(mut self, tag: u8, result: Option<AlignmentTransform>) -> Self {
        self.by_tag.insert(tag, result);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TransformEstimator for StubEstimator {
    fn name(&self) -> &str {
        "stub"
    }

    fn estimate(
        &self,
        _reference: &GrayscaleProxy,
        target: &GrayscaleProxy,
        _params: &EstimateParams,
    ) -> Result<AlignmentTransform> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let tag = target.data[[0, 0]];
        match self.by_tag.get(&tag) {
            Some(Some(t)) => Ok(*t),
            _ => Err(AlignError::Estimation(format!("no convergence for tag {tag}"))),
        }
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub stages: Mutex<Vec<PipelineStage>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: PipelineStage, _total_items: Option<usize>) {
        self.stages.lock().unwrap().push(stage);
    }
}
