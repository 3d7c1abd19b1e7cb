/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog, the overlay pipeline and the UI layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Represents a single image in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Full path to the image file
    pub path: PathBuf,
    /// Width in pixels (identical for every cataloged image)
    pub width: u32,
    /// Height in pixels (identical for every cataloged image)
    pub height: u32,
}

impl ImageMetadata {
    /// File name used for catalog ordering
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// Pixel-space position, origin top-left
///
/// May lie outside the image; the cropper clamps instead of rejecting.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Requested crop window size in pixels
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSize {
    pub width: u32,
    pub height: u32,
}

impl CropSize {
    /// Sizes below one pixel are raised to one
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}
