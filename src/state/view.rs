/// Interactive view parameters
///
/// This struct stores everything the operator can adjust in the window.
/// Every change goes through one of the setters below, which keep the
/// parameters consistent with the catalog, and is followed by a re-render.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::catalog::Catalog;
use super::data::{Coordinate, CropSize};
use crate::color::Palette;
use crate::error::{Error, Result};
use crate::overlay::RenderRequest;

/// All adjustable parameters of the overlay view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewParams {
    // ========== Image range ==========

    /// First image of the 180° range (1-based, inclusive)
    pub range_start: usize,

    /// Last image of the 180° range (1-based, inclusive)
    pub range_end: usize,

    /// Selected image inside the range (1-based)
    pub selected: usize,

    // ========== Crop ==========

    pub center_x: i32,
    pub center_y: i32,
    pub crop_width: u32,
    pub crop_height: u32,

    // ========== Visualization ==========

    pub show_diff: bool,
    pub invert_colors: bool,
    pub palette: Palette,
}

impl ViewParams {
    /// Defaults for a catalog of `count` images of `width` x `height`
    ///
    /// The range initially covers the first half of the series, the crop
    /// covers the full frame centered on the image center.
    pub fn new(count: usize, width: u32, height: u32) -> Self {
        Self {
            range_start: 1,
            range_end: (count / 2).max(1),
            selected: 1,
            center_x: (width / 2) as i32,
            center_y: (height / 2) as i32,
            crop_width: width.max(1),
            crop_height: height.max(1),
            show_diff: true,
            invert_colors: false,
            palette: Palette::default(),
        }
    }

    /// Number of images in the range
    pub fn span(&self) -> usize {
        self.range_end + 1 - self.range_start
    }

    /// Set the range, clamped to the catalog, then clamp the selection
    pub fn set_range(&mut self, start: usize, end: usize, count: usize) {
        let count = count.max(1);
        let start = start.clamp(1, count);
        let end = end.clamp(1, count);

        self.range_start = start.min(end);
        self.range_end = start.max(end);
        self.selected = self.selected.clamp(1, self.span());
    }

    pub fn set_selected(&mut self, selected: usize) {
        self.selected = selected.clamp(1, self.span());
    }

    /// Step to the next image in the range; no-op at the end
    pub fn next(&mut self) {
        if self.selected < self.span() {
            self.selected += 1;
        }
    }

    /// Step to the previous image in the range; no-op at the start
    pub fn previous(&mut self) {
        if self.selected > 1 {
            self.selected -= 1;
        }
    }

    pub fn set_center(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.center_x = x.clamp(0, width as i32);
        self.center_y = y.clamp(0, height as i32);
    }

    pub fn set_crop_size(&mut self, crop_width: u32, crop_height: u32, width: u32, height: u32) {
        self.crop_width = crop_width.clamp(1, width.max(1));
        self.crop_height = crop_height.clamp(1, height.max(1));
    }

    /// Catalog indices (0-based) of the displayed image and its partner
    ///
    /// The partner lies one range span further on and wraps around the end
    /// of the catalog.
    pub fn pair_indices(&self, count: usize) -> (usize, usize) {
        let count = count.max(1);
        let first = (self.range_start - 1 + self.selected - 1) % count;
        let second = (first + self.span()) % count;
        (first, second)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.center_x, self.center_y)
    }

    pub fn crop_size(&self) -> CropSize {
        CropSize::new(self.crop_width, self.crop_height)
    }

    /// Render request for the currently selected pair
    pub fn request(&self, catalog: &Catalog) -> Option<RenderRequest> {
        let (first, second) = self.pair_indices(catalog.len());

        Some(RenderRequest {
            first_image: catalog.get(first)?.path.clone(),
            second_image: catalog.get(second)?.path.clone(),
            center: self.center(),
            crop_size: self.crop_size(),
            show_diff: self.show_diff,
            invert_colors: self.invert_colors,
            palette: self.palette,
        })
    }

    /// Summary of the parameters needed by downstream reconstruction
    pub fn summary(&self, catalog: &Catalog) -> Summary {
        let first_image_index = self.range_start - 1;

        Summary {
            first_image_index,
            first_image_path: catalog
                .get(first_image_index)
                .map(|image| image.path.clone())
                .unwrap_or_default(),
            image_count: self.span(),
            center: self.center(),
            crop_size: self.crop_size(),
            palette: self.palette,
            exported_at: None,
        }
    }
}

/// Axis-finding result to hand over to reconstruction
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Summary {
    /// 0-based catalog index of the first image of the 180° range
    pub first_image_index: usize,
    pub first_image_path: PathBuf,
    /// Number of images spanning 180°
    pub image_count: usize,
    pub center: Coordinate,
    pub crop_size: CropSize,
    pub palette: Palette,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub exported_at: Option<DateTime<Utc>>,
}

impl Summary {
    /// Human readable summary shown beside the controls
    pub fn to_text(&self) -> String {
        format!(
            "first_image_index = {}\n\
             first_image_path = '{}'\n\
             image_count = {}\n\n\
             cx, cy, w, h = {}, {}, {}, {}",
            self.first_image_index,
            self.first_image_path.display(),
            self.image_count,
            self.center.x,
            self.center.y,
            self.crop_size.width,
            self.crop_size.height,
        )
    }

    /// Convert to pretty JSON, stamped with the current time
    pub fn to_json(&self) -> Result<String> {
        let stamped = Summary {
            exported_at: Some(Utc::now()),
            ..self.clone()
        };
        Ok(serde_json::to_string_pretty(&stamped)?)
    }

    /// Write the JSON summary to `path`
    pub fn export(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| Error::Export {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Exported summary to {}", path.display());
        Ok(())
    }
}
