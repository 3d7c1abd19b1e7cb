/// False-color rendering of difference fields
///
/// A difference field is split into its positive and negative parts. The
/// positive part drives one RGB channel, the negative part drives the other
/// two, so the two signs show up as complementary hues:
/// - yellow-blue: positive -> B, negative -> R and G
/// - red-cyan: positive -> R, negative -> G and B
/// - magenta-green: positive -> G, negative -> B and R

use image::{GrayImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::overlay::diff::DiffField;

/// Two-hue color map for difference images
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Palette {
    #[default]
    #[serde(rename = "yellow-blue")]
    YellowBlue,
    #[serde(rename = "magenta-green")]
    MagentaGreen,
    #[serde(rename = "red-cyan")]
    RedCyan,
}

impl Palette {
    /// All palettes, in the order offered to the user
    pub const ALL: [Palette; 3] = [Palette::YellowBlue, Palette::MagentaGreen, Palette::RedCyan];

    /// Stable external name
    pub fn name(self) -> &'static str {
        match self {
            Palette::YellowBlue => "yellow-blue",
            Palette::MagentaGreen => "magenta-green",
            Palette::RedCyan => "red-cyan",
        }
    }

    /// Channel indices (positive, negative, negative), 0 = R, 1 = G, 2 = B
    pub fn channels(self) -> (usize, usize, usize) {
        match self {
            Palette::YellowBlue => (2, 0, 1),
            Palette::RedCyan => (0, 1, 2),
            Palette::MagentaGreen => (1, 2, 0),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Palette::ALL
            .into_iter()
            .find(|palette| palette.name() == s)
            .ok_or_else(|| Error::UnknownPalette(s.to_string()))
    }
}

/// Map a difference field to an RGB image with the given palette
pub fn colorize(field: &DiffField, palette: Palette) -> RgbImage {
    let (c1, c2, c3) = palette.channels();
    let width = field.width();
    let mut out = RgbImage::new(width, field.height());

    for (i, &value) in field.values().iter().enumerate() {
        let positive = value.clamp(0, 255) as u8;
        let negative = (-value).clamp(0, 255) as u8;

        let mut rgb = [0u8; 3];
        rgb[c1] = positive;
        rgb[c2] = negative;
        rgb[c3] = negative;

        let x = i as u32 % width;
        let y = i as u32 / width;
        out.put_pixel(x, y, Rgb(rgb));
    }

    out
}

/// Replicate a grayscale image into all three channels
pub fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    })
}
