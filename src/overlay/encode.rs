use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::{Error, Result};

/// JPEG quality used for the on-screen overlay
pub const DEFAULT_QUALITY: u8 = 90;

/// Encode a composite image as JPEG bytes
///
/// Quality is clamped to 1..=100. Zero-area images are rejected.
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    if img.width() == 0 || img.height() == 0 {
        return Err(Error::EmptyImage);
    }

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode_image(img)
        .map_err(Error::Encode)?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};

    #[test]
    fn test_flat_color_survives_round_trip() {
        let img = RgbImage::from_pixel(32, 24, Rgb([200, 120, 40]));
        let bytes = encode_jpeg(&img, 100).unwrap();

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)
            .unwrap()
            .to_rgb8();

        assert_eq!(decoded.dimensions(), (32, 24));
        for px in decoded.pixels() {
            for (got, want) in px.0.iter().zip([200u8, 120, 40]) {
                assert!((i16::from(*got) - i16::from(want)).abs() <= 6, "{:?}", px);
            }
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let img = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 0]));
        assert_eq!(encode_jpeg(&img, 90).unwrap(), encode_jpeg(&img, 90).unwrap());
    }

    #[test]
    fn test_starts_with_jpeg_marker() {
        let img = RgbImage::from_pixel(4, 4, Rgb([0, 0, 0]));
        let bytes = encode_jpeg(&img, DEFAULT_QUALITY).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        assert!(matches!(encode_jpeg(&RgbImage::new(0, 5), 90), Err(Error::EmptyImage)));
        assert!(matches!(encode_jpeg(&RgbImage::new(5, 0), 90), Err(Error::EmptyImage)));
    }

    #[test]
    fn test_out_of_range_quality_is_clamped() {
        let img = RgbImage::from_pixel(8, 8, Rgb([120, 60, 200]));

        let lowest = encode_jpeg(&img, 0).unwrap();
        assert_eq!(lowest, encode_jpeg(&img, 1).unwrap());
        assert_eq!(&lowest[..2], &[0xFF, 0xD8]);

        assert_eq!(encode_jpeg(&img, u8::MAX).unwrap(), encode_jpeg(&img, 100).unwrap());
    }
}
