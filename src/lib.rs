//! Rotation axis finder for tomographic image series.
//!
//! A projection and its mirrored partner from about 180° later are cropped
//! around a candidate axis and differenced. When the candidate matches the
//! true rotation axis the difference vanishes; any residual shows up as a
//! two-hue false-color pattern.

pub mod color;
pub mod error;
pub mod overlay;
pub mod state;

pub use color::Palette;
pub use error::{Error, Result};
pub use overlay::{compose, render, LatestWins, RenderRequest};
pub use state::catalog::Catalog;
pub use state::data::{Coordinate, CropSize, ImageMetadata};
pub use state::view::{Summary, ViewParams};
