/// Error types shared by the catalog, the overlay pipeline and the shell

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while cataloging or rendering an overlay
#[derive(Debug, Error)]
pub enum Error {
    /// An image file could not be opened or decoded
    #[error("failed to load image {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The image directory could not be listed
    #[error("failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Palette name outside the three supported values
    #[error("unknown color map: {0}")]
    UnknownPalette(String),

    /// The two crops entering the differencer do not have the same shape
    #[error("incompatible shapes: {left_width}x{left_height} vs {right_width}x{right_height}")]
    IncompatibleShapes {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },

    /// The crop window collapsed to zero pixels
    #[error("cannot encode an empty image")]
    EmptyImage,

    /// JPEG encoding failed
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// The background render task panicked or was cancelled
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Writing the exported summary failed
    #[error("failed to export summary to {}: {source}", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the exported summary failed
    #[error("failed to serialize summary: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
