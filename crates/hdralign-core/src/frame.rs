use ndarray::Array2;

/// Single-channel 8-bit luminance proxy of one input image.
///
/// Used only for reference selection and transform estimation; final output
/// is always resampled from the full-precision [`ColorFrame`].
#[derive(Clone, Debug)]
pub struct GrayscaleProxy {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<u8>,
}

impl GrayscaleProxy {
    pub fn new(data: Array2<u8>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Luminance as f32 in [0.0, 1.0].
    pub fn to_f32(&self) -> Array2<f32> {
        self.data.mapv(|v| v as f32 / 255.0)
    }
}

/// A single-channel full-precision plane.
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
}

impl Frame {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

/// Color image composed of separate channel frames.
#[derive(Clone, Debug)]
pub struct ColorFrame {
    pub red: Frame,
    pub green: Frame,
    pub blue: Frame,
}

impl ColorFrame {
    pub fn width(&self) -> usize {
        self.red.width()
    }

    pub fn height(&self) -> usize {
        self.red.height()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn channels(&self) -> [&Frame; 3] {
        [&self.red, &self.green, &self.blue]
    }
}
