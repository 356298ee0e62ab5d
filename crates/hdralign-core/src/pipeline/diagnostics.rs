use std::path::Path;

use ndarray::s;
use tracing::{debug, warn};

use crate::align::PatchRect;
use crate::frame::GrayscaleProxy;
use crate::io::image_io::save_gray_png;

/// Write each proxy's segmentation patches to `dir` as
/// `patch_{image}_{segment}.png`.
///
/// Failures are logged and otherwise ignored.
pub(super) fn dump_patches(dir: &Path, proxies: &[GrayscaleProxy], grid: &[PatchRect]) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "Cannot create patch dump directory");
        return;
    }

    for (image, proxy) in proxies.iter().enumerate() {
        for (segment, rect) in grid.iter().enumerate() {
            if rect.x + rect.width > proxy.width() || rect.y + rect.height > proxy.height() {
                continue;
            }
            let patch = proxy
                .data
                .slice(s![rect.y..rect.y + rect.height, rect.x..rect.x + rect.width])
                .to_owned();
            let path = dir.join(format!("patch_{image}_{segment}.png"));
            if let Err(e) = save_gray_png(&patch, &path) {
                warn!(path = %path.display(), error = %e, "Cannot write patch");
            }
        }
    }
    debug!(dir = %dir.display(), images = proxies.len(), segments = grid.len(), "Dumped patches");
}
