/// Overlay rendering pipeline
///
/// This module turns a pair of projection images into the composite shown
/// to the operator:
/// - Cropping a window around the candidate axis (crop.rs)
/// - Differencing against the mirrored partner image (diff.rs)
/// - False-color mapping (crate::color)
/// - JPEG encoding for display (encode.rs)
///
/// Every stage is a pure function of its inputs, so requests with different
/// parameters can run side by side without interfering.

pub mod crop;
pub mod diff;
pub mod encode;

use image::{GrayImage, Luma, RgbImage};
use std::path::PathBuf;
use tokio::task;

use crate::color::{self, Palette};
use crate::error::Result;
use crate::state::data::{Coordinate, CropSize};

/// Everything needed to render one overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub first_image: PathBuf,
    /// Image taken about 180° after the first one; mirrored before differencing
    pub second_image: PathBuf,
    pub center: Coordinate,
    pub crop_size: CropSize,
    /// Show the colorized difference instead of the first image alone
    pub show_diff: bool,
    pub invert_colors: bool,
    pub palette: Palette,
}

/// Build the composite image for a request
///
/// With `show_diff` off, only the first image is read and shown as gray.
pub fn compose(request: &RenderRequest) -> Result<RgbImage> {
    let first = crop::load_cropped(&request.first_image, request.center, request.crop_size)?;

    if !request.show_diff {
        let first = if request.invert_colors { invert(&first) } else { first };
        return Ok(color::gray_to_rgb(&first));
    }

    let second = crop::load_cropped(&request.second_image, request.center, request.crop_size)?;
    let field = diff::diff(&first, &second, request.invert_colors)?;

    Ok(color::colorize(&field, request.palette))
}

/// Compose and encode a request as JPEG bytes
pub fn render(request: &RenderRequest) -> Result<Vec<u8>> {
    let start = std::time::Instant::now();

    let composite = compose(request)?;
    let bytes = encode::encode_jpeg(&composite, encode::DEFAULT_QUALITY)?;

    log::debug!(
        "Rendered {}x{} overlay ({} bytes) in {:.1} ms",
        composite.width(),
        composite.height(),
        bytes.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(bytes)
}

/// Render on a blocking worker thread
///
/// Image decoding is CPU-bound, so it must not run on the UI executor.
pub async fn render_async(request: RenderRequest) -> Result<Vec<u8>> {
    task::spawn_blocking(move || render(&request)).await?
}

/// Bookkeeping for renders that may finish out of order
///
/// Every request takes a generation from `next`. A finished result is kept
/// only if no newer request has been issued since, so the newest request
/// always decides what is shown. A failure replaces the previous image.
#[derive(Debug)]
pub struct LatestWins<T> {
    issued: u64,
    current: Option<std::result::Result<T, String>>,
}

impl<T> Default for LatestWins<T> {
    fn default() -> Self {
        LatestWins { issued: 0, current: None }
    }
}

impl<T> LatestWins<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation for a new request; supersedes all earlier ones
    pub fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn is_latest(&self, generation: u64) -> bool {
        generation == self.issued
    }

    /// Store a finished result if it belongs to the latest request
    pub fn accept(&mut self, generation: u64, result: std::result::Result<T, String>) -> bool {
        if !self.is_latest(generation) {
            return false;
        }
        self.current = Some(result);
        true
    }

    /// Result of the latest finished request, if any
    pub fn current(&self) -> Option<&std::result::Result<T, String>> {
        self.current.as_ref()
    }
}

fn invert(gray: &GrayImage) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([diff::invert_sample(gray.get_pixel(x, y).0[0]) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::path::Path;

    /// Mirror-symmetric about x = width / 2 (width even)
    fn symmetric(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let d = x.min(width - 1 - x);
            Luma([(d * 11 + y * 3) as u8])
        })
    }

    fn textured(width: u32, height: u32, seed: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            Luma([((x * 37 + y * 101 + seed * 13) % 256) as u8])
        })
    }

    fn save_png(dir: &Path, name: &str, img: &GrayImage) -> PathBuf {
        let path = dir.join(name);
        img.save(&path).unwrap();
        path
    }

    fn request(first: PathBuf, second: PathBuf) -> RenderRequest {
        RenderRequest {
            first_image: first,
            second_image: second,
            center: Coordinate::new(20, 10),
            crop_size: CropSize::new(40, 20),
            show_diff: true,
            invert_colors: false,
            palette: Palette::YellowBlue,
        }
    }

    #[test]
    fn test_self_pair_symmetric_image_is_black() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_png(dir.path(), "sym.png", &symmetric(40, 20));

        for palette in Palette::ALL {
            // Full frame and a narrower window centered on the axis
            for crop_size in [CropSize::new(40, 20), CropSize::new(16, 8)] {
                let mut req = request(path.clone(), path.clone());
                req.palette = palette;
                req.crop_size = crop_size;

                let composite = compose(&req).unwrap();
                assert_eq!(composite.dimensions(), (crop_size.width, crop_size.height));
                assert!(composite.pixels().all(|p| p.0 == [0, 0, 0]));
            }
        }
    }

    #[test]
    fn test_invert_matches_inverted_sources() {
        let dir = tempfile::tempdir().unwrap();
        let a = textured(40, 20, 1);
        let b = textured(40, 20, 7);

        let a_path = save_png(dir.path(), "a.png", &a);
        let b_path = save_png(dir.path(), "b.png", &b);
        let a_inv_path = save_png(dir.path(), "a_inv.png", &invert(&a));
        let b_inv_path = save_png(dir.path(), "b_inv.png", &invert(&b));

        for palette in Palette::ALL {
            let mut inverted = request(a_path.clone(), b_path.clone());
            inverted.invert_colors = true;
            inverted.palette = palette;

            let mut pre_inverted = request(a_inv_path.clone(), b_inv_path.clone());
            pre_inverted.palette = palette;

            assert_eq!(compose(&inverted).unwrap(), compose(&pre_inverted).unwrap());
        }
    }

    #[test]
    fn test_single_view_is_gray() {
        let dir = tempfile::tempdir().unwrap();
        let a = textured(40, 20, 3);
        let a_path = save_png(dir.path(), "a.png", &a);

        let mut req = request(a_path, dir.path().join("missing.png"));
        req.show_diff = false;

        // The second image is never read in single view
        let composite = compose(&req).unwrap();
        assert_eq!(composite.dimensions(), (40, 20));
        assert_eq!(composite.get_pixel(5, 5).0, [a.get_pixel(5, 5).0[0]; 3]);

        req.invert_colors = true;
        let composite = compose(&req).unwrap();
        assert_eq!(composite.get_pixel(5, 5).0, [255 - a.get_pixel(5, 5).0[0]; 3]);
    }

    #[test]
    fn test_edge_crop_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_png(dir.path(), "a.png", &textured(40, 20, 0));

        let mut req = request(path.clone(), path);
        req.center = Coordinate::new(2, 10);
        req.crop_size = CropSize::new(10, 10);

        assert_eq!(compose(&req).unwrap().dimensions(), (7, 10));
    }

    #[test]
    fn test_render_produces_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let a = save_png(dir.path(), "a.png", &textured(40, 20, 1));
        let b = save_png(dir.path(), "b.png", &textured(40, 20, 2));

        let bytes = render(&request(a, b)).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 20));
    }

    #[test]
    fn test_render_window_off_image_is_empty_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_png(dir.path(), "a.png", &textured(40, 20, 1));

        let mut req = request(path.clone(), path);
        req.center = Coordinate::new(500, 10);

        assert!(matches!(render(&req), Err(Error::EmptyImage)));
    }

    #[test]
    fn test_missing_second_image() {
        let dir = tempfile::tempdir().unwrap();
        let a = save_png(dir.path(), "a.png", &textured(40, 20, 1));
        let missing = dir.path().join("missing.png");

        match compose(&request(a, missing.clone())) {
            Err(Error::ImageLoad { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected ImageLoad, got {:?}", other.map(|i| i.dimensions())),
        }
    }

    #[test]
    fn test_latest_wins_drops_older_generation() {
        let mut latest: LatestWins<&str> = LatestWins::new();
        let first = latest.next();
        let second = latest.next();

        // The newer request finishes first, the older one arrives late
        assert!(latest.accept(second, Ok("second")));
        assert!(!latest.accept(first, Ok("first")));

        assert_eq!(latest.current(), Some(&Ok("second")));
    }

    #[test]
    fn test_latest_wins_nothing_before_first_result() {
        let mut latest: LatestWins<u8> = LatestWins::new();
        let generation = latest.next();
        assert!(latest.is_latest(generation));
        assert_eq!(latest.current(), None);
    }

    #[test]
    fn test_latest_wins_success_replaces_failure() {
        let mut latest: LatestWins<&str> = LatestWins::new();

        let failed = latest.next();
        assert!(latest.accept(failed, Err("cannot encode an empty image".to_string())));
        assert!(matches!(latest.current(), Some(Err(_))));

        let recovered = latest.next();
        assert!(latest.accept(recovered, Ok("overlay")));
        assert_eq!(latest.current(), Some(&Ok("overlay")));
    }

    #[test]
    fn test_latest_wins_failure_clears_previous_image() {
        let mut latest: LatestWins<&str> = LatestWins::new();

        let good = latest.next();
        latest.accept(good, Ok("overlay"));

        let bad = latest.next();
        latest.accept(bad, Err("cannot encode an empty image".to_string()));
        assert_eq!(latest.current(), Some(&Err("cannot encode an empty image".to_string())));
    }

    #[test]
    fn test_render_async_matches_sync() {
        let dir = tempfile::tempdir().unwrap();
        let a = save_png(dir.path(), "a.png", &textured(40, 20, 4));
        let b = save_png(dir.path(), "b.png", &textured(40, 20, 5));
        let req = request(a, b);

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let bytes = runtime.block_on(render_async(req.clone())).unwrap();

        assert_eq!(bytes, render(&req).unwrap());
    }
}
