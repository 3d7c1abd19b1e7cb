/// Signed difference between a crop and the mirrored crop of its 180° partner

use image::GrayImage;

use crate::error::{Error, Result};

/// Row-major field of signed per-pixel differences in [-255, 255]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffField {
    width: u32,
    height: u32,
    data: Vec<i16>,
}

impl DiffField {
    #[cfg(test)]
    pub fn from_vec(width: u32, height: u32, data: Vec<i16>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(DiffField { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[i16] {
        &self.data
    }

    #[cfg(test)]
    pub fn get(&self, x: u32, y: u32) -> i16 {
        self.data[y as usize * self.width as usize + x as usize]
    }
}

/// Polarity flip applied before differencing
pub fn invert_sample(value: u8) -> i16 {
    255 - i16::from(value)
}

fn sample(value: u8, invert: bool) -> i16 {
    if invert {
        invert_sample(value)
    } else {
        i16::from(value)
    }
}

/// Compute `a - mirror(b)`, optionally inverting both first
///
/// `b` is mirrored horizontally (column order reversed). Both crops must
/// have identical dimensions.
pub fn diff(a: &GrayImage, b: &GrayImage, invert: bool) -> Result<DiffField> {
    if a.dimensions() != b.dimensions() {
        return Err(Error::IncompatibleShapes {
            left_width: a.width(),
            left_height: a.height(),
            right_width: b.width(),
            right_height: b.height(),
        });
    }

    let (width, height) = a.dimensions();
    let mut data = Vec::with_capacity(width as usize * height as usize);

    for y in 0..height {
        for x in 0..width {
            let left = sample(a.get_pixel(x, y).0[0], invert);
            let right = sample(b.get_pixel(width - 1 - x, y).0[0], invert);
            data.push(left - right);
        }
    }

    Ok(DiffField { width, height, data })
}
