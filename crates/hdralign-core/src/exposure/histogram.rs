use crate::consts::HISTOGRAM_BINS;
use crate::error::{AlignError, Result};
use crate::frame::GrayscaleProxy;

/// 256-bin luminance histogram built from a point-sampled subset of a proxy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    bins: [u32; HISTOGRAM_BINS],
    samples: usize,
}

impl Histogram {
    pub fn from_bins(bins: [u32; HISTOGRAM_BINS]) -> Self {
        let samples = bins.iter().map(|&b| b as usize).sum();
        Self { bins, samples }
    }

    pub fn bins(&self) -> &[u32; HISTOGRAM_BINS] {
        &self.bins
    }

    /// Number of pixel positions the histogram was sampled from.
    pub fn sample_count(&self) -> usize {
        self.samples
    }
}

/// Number of positions visited when sampling a `width` x `height` image
/// every `stride` pixels in both axes.
pub fn sampled_positions(width: usize, height: usize, stride: usize) -> usize {
    if stride == 0 {
        return 0;
    }
    (width / stride) * (height / stride)
}

/// Build the luminance histogram of `proxy` from every `stride`-th pixel in
/// both axes.
///
/// This is point sampling, not an area-averaged downsample. Only full
/// stride cells are visited, so the bin total always equals
/// [`sampled_positions`].
pub fn downsampled_histogram(proxy: &GrayscaleProxy, stride: usize) -> Result<Histogram> {
    if stride == 0 {
        return Err(AlignError::InvalidConfig(
            "histogram stride must be at least 1".into(),
        ));
    }

    let rows = proxy.height() / stride;
    let cols = proxy.width() / stride;
    let mut bins = [0u32; HISTOGRAM_BINS];

    for r in 0..rows {
        for c in 0..cols {
            let v = proxy.data[[r * stride, c * stride]];
            bins[v as usize] += 1;
        }
    }

    Ok(Histogram {
        bins,
        samples: rows * cols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn samples_only_stride_positions() {
        let mut data = Array2::<u8>::zeros((4, 4));
        data[[0, 0]] = 200;
        data[[1, 1]] = 100;
        data[[2, 2]] = 50;
        let hist = downsampled_histogram(&GrayscaleProxy::new(data), 2).unwrap();

        assert_eq!(hist.sample_count(), 4);
        assert_eq!(hist.bins()[200], 1);
        assert_eq!(hist.bins()[50], 1);
        assert_eq!(hist.bins()[100], 0);
        assert_eq!(hist.bins()[0], 2);
    }

    #[test]
    fn zero_stride_is_rejected() {
        let proxy = GrayscaleProxy::new(Array2::<u8>::zeros((2, 2)));
        assert!(downsampled_histogram(&proxy, 0).is_err());
    }
}
