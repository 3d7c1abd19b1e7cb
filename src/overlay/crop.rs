/// Grayscale loading and crop window extraction

use image::{DynamicImage, GrayImage, Luma};
use std::path::Path;

use crate::error::{Error, Result};
use crate::state::data::{Coordinate, CropSize};

/// Load an image from disk as 8-bit grayscale
///
/// Color images are reduced with ITU-R 601 weights (L = 0.299 R + 0.587 G + 0.114 B),
/// matching what most imaging tools produce for "convert to L".
pub fn load_grayscale(path: &Path) -> Result<GrayImage> {
    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(to_luma_601(img))
}

fn to_luma_601(img: DynamicImage) -> GrayImage {
    match img {
        DynamicImage::ImageLuma8(gray) => gray,
        other => {
            let rgb = other.to_rgb8();
            let mut gray = GrayImage::new(rgb.width(), rgb.height());
            for (dst, src) in gray.pixels_mut().zip(rgb.pixels()) {
                let [r, g, b] = src.0.map(i32::from);
                // Fixed point with rounding, exact for gray inputs
                let luma = (r * 19595 + g * 38470 + b * 7471 + 0x8000) >> 16;
                *dst = Luma([luma.clamp(0, 255) as u8]);
            }
            gray
        }
    }
}

/// Pixel bounds of a crop window: `[x_start, x_end) x [y_start, y_end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropWindow {
    pub x_start: u32,
    pub x_end: u32,
    pub y_start: u32,
    pub y_end: u32,
}

impl CropWindow {
    /// Window of `size` centered at `center`, clamped to a `width` x `height` image
    ///
    /// Half sizes truncate, so an unclamped window is `2 * (size / 2)` wide.
    /// The end never precedes the start; a window off the image is empty.
    pub fn clamped(center: Coordinate, size: CropSize, width: u32, height: u32) -> Self {
        let (x_start, x_end) = clamp_axis(center.x, size.width, width);
        let (y_start, y_end) = clamp_axis(center.y, size.height, height);
        CropWindow { x_start, x_end, y_start, y_end }
    }

    pub fn width(&self) -> u32 {
        self.x_end - self.x_start
    }

    pub fn height(&self) -> u32 {
        self.y_end - self.y_start
    }
}

fn clamp_axis(center: i32, size: u32, limit: u32) -> (u32, u32) {
    let center = i64::from(center);
    let half = i64::from(size / 2);
    let limit = i64::from(limit);

    let start = (center - half).clamp(0, limit);
    let end = (center + half).min(limit).max(start);

    (start as u32, end as u32)
}

/// Cut the window around `center` out of an already loaded grayscale image
pub fn crop_gray(gray: &GrayImage, center: Coordinate, size: CropSize) -> GrayImage {
    let window = CropWindow::clamped(center, size, gray.width(), gray.height());
    image::imageops::crop_imm(gray, window.x_start, window.y_start, window.width(), window.height())
        .to_image()
}

/// Load `path` as grayscale and crop the window around `center`
pub fn load_cropped(path: &Path, center: Coordinate, size: CropSize) -> Result<GrayImage> {
    let gray = load_grayscale(path)?;
    Ok(crop_gray(&gray, center, size))
}
