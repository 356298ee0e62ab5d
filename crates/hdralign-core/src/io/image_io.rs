use std::path::Path;

use image::{GrayImage, ImageFormat, Rgb};
use ndarray::Array2;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{AlignError, Result};
use crate::frame::{ColorFrame, Frame, GrayscaleProxy};

/// Decode an image file into an 8-bit luminance proxy.
pub fn load_gray_proxy(path: &Path) -> Result<GrayscaleProxy> {
    let img = image::open(path)?;
    let gray = img.to_luma8();
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return Err(AlignError::InvalidDimensions {
            width: w as usize,
            height: h as usize,
        });
    }
    let data = Array2::from_shape_vec((h as usize, w as usize), gray.into_raw()).map_err(|_| {
        AlignError::InvalidDimensions {
            width: w as usize,
            height: h as usize,
        }
    })?;
    Ok(GrayscaleProxy::new(data))
}

/// Decode an image file at full precision into f32 RGB planes in [0.0, 1.0].
pub fn load_color_frame(path: &Path) -> Result<ColorFrame> {
    let img = image::open(path)?;
    let rgb = img.to_rgb16();
    let (w, h) = rgb.dimensions();
    if w == 0 || h == 0 {
        return Err(AlignError::InvalidDimensions {
            width: w as usize,
            height: h as usize,
        });
    }

    let (h, w) = (h as usize, w as usize);
    let mut red = Array2::<f32>::zeros((h, w));
    let mut green = Array2::<f32>::zeros((h, w));
    let mut blue = Array2::<f32>::zeros((h, w));

    for (col, row, pixel) in rgb.enumerate_pixels() {
        let idx = [row as usize, col as usize];
        red[idx] = pixel.0[0] as f32 / 65535.0;
        green[idx] = pixel.0[1] as f32 / 65535.0;
        blue[idx] = pixel.0[2] as f32 / 65535.0;
    }

    Ok(ColorFrame {
        red: Frame::new(red),
        green: Frame::new(green),
        blue: Frame::new(blue),
    })
}

/// Save a ColorFrame as 16-bit RGB TIFF.
pub fn save_color_tiff(color: &ColorFrame, path: &Path) -> Result<()> {
    let (w, h) = color.dimensions();

    let mut pixels: Vec<u16> = Vec::with_capacity(h * w * COLOR_CHANNEL_COUNT);
    for row in 0..h {
        for col in 0..w {
            for plane in color.channels() {
                pixels.push((plane.data[[row, col]].clamp(0.0, 1.0) * 65535.0) as u16);
            }
        }
    }

    let img = image::ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .ok_or(AlignError::InvalidDimensions {
            width: w,
            height: h,
        })?;
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save a ColorFrame as 8-bit RGB PNG.
pub fn save_color_png(color: &ColorFrame, path: &Path) -> Result<()> {
    let (w, h) = color.dimensions();

    let mut img = image::RgbImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let r = (color.red.data[[row, col]].clamp(0.0, 1.0) * 255.0).round() as u8;
            let g = (color.green.data[[row, col]].clamp(0.0, 1.0) * 255.0).round() as u8;
            let b = (color.blue.data[[row, col]].clamp(0.0, 1.0) * 255.0).round() as u8;
            img.put_pixel(col as u32, row as u32, Rgb([r, g, b]));
        }
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a ColorFrame, choosing format from file extension.
pub fn save_color_image(color: &ColorFrame, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => save_color_tiff(color, path),
        Some("png") => save_color_png(color, path),
        _ => save_color_tiff(color, path),
    }
}

/// Save an 8-bit luminance array as PNG.
pub fn save_gray_png(data: &Array2<u8>, path: &Path) -> Result<()> {
    let (h, w) = data.dim();
    let raw: Vec<u8> = data.iter().copied().collect();
    let img = GrayImage::from_raw(w as u32, h as u32, raw).ok_or(AlignError::InvalidDimensions {
        width: w,
        height: h,
    })?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
