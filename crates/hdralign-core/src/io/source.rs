use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::warn;

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{AlignError, Result};
use crate::frame::{ColorFrame, GrayscaleProxy};

use super::image_io::{load_color_frame, load_gray_proxy};

/// Image decode collaborator.
///
/// `load_gray` feeds reference selection and transform estimation;
/// `load_color` is a separate full-precision decode used for the final warp.
pub trait ImageSource: Send + Sync {
    fn load_gray(&self, path: &Path) -> Result<GrayscaleProxy>;

    fn load_color(&self, path: &Path) -> Result<ColorFrame>;
}

/// Decodes files from disk with the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileImageSource;

impl ImageSource for FileImageSource {
    fn load_gray(&self, path: &Path) -> Result<GrayscaleProxy> {
        load_gray_proxy(path)
    }

    fn load_color(&self, path: &Path) -> Result<ColorFrame> {
        load_color_frame(path)
    }
}

/// Decode a grayscale proxy for every path, in order.
///
/// Any unreadable image fails the whole batch: reference selection needs
/// every histogram.
pub fn load_proxies(source: &dyn ImageSource, paths: &[PathBuf]) -> Result<Vec<GrayscaleProxy>> {
    let load = |(index, path): (usize, &PathBuf)| {
        source.load_gray(path).map_err(|e| {
            warn!(image = index, path = %path.display(), error = %e, "Cannot read image");
            AlignError::UnreadableImage {
                index,
                path: path.clone(),
                reason: e.to_string(),
            }
        })
    };

    if paths.len() >= PARALLEL_FRAME_THRESHOLD {
        paths.par_iter().enumerate().map(load).collect()
    } else {
        paths.iter().enumerate().map(load).collect()
    }
}
