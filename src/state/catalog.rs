use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::data::ImageMetadata;
use crate::error::{Error, Result};

/// Supported image file extensions (compared lowercase)
const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// The Catalog holds the same-sized images found in one directory.
///
/// It is built once at startup and never mutated afterwards.
pub struct Catalog {
    dir: PathBuf,
    images: Vec<ImageMetadata>,
}

impl Catalog {
    /// Scan `dir` (non-recursive) for images.
    ///
    /// The first image found in directory order defines the reference size;
    /// images with other dimensions are skipped with a warning. The result
    /// is sorted by file name.
    pub fn scan(dir: &Path) -> Result<Self> {
        let mut candidates: Vec<ImageMetadata> = Vec::new();

        log::debug!("Scanning folder: {}", dir.display());

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                // The directory itself is unreadable
                Err(err) if err.depth() == 0 => {
                    return Err(Error::ReadDir { path: dir.to_path_buf(), source: err });
                }
                Err(err) => {
                    log::warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            let path = entry.path();

            // Only process files (not directories)
            if !path.is_file() || !has_image_extension(path) {
                continue;
            }

            // Header-only read, no pixel decoding
            match image::image_dimensions(path) {
                Ok((width, height)) => candidates.push(ImageMetadata {
                    path: path.to_path_buf(),
                    width,
                    height,
                }),
                Err(err) => log::warn!("Skipping image {}: {}", path.display(), err),
            }
        }

        let images = keep_consistent(candidates);

        log::info!("Cataloged {} images in {}", images.len(), dir.display());

        Ok(Catalog {
            dir: dir.to_path_buf(),
            images,
        })
    }

    /// Directory the catalog was built from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn images(&self) -> &[ImageMetadata] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Image at a catalog index (sorted order)
    pub fn get(&self, index: usize) -> Option<&ImageMetadata> {
        self.images.get(index)
    }

    /// Shared (width, height) of all cataloged images
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.images.first().map(|image| (image.width, image.height))
    }
}

/// Implements the size check and ordering of `Catalog::scan`.
///
/// `candidates` must be in discovery order: the first one sets the reference size.
fn keep_consistent<I>(candidates: I) -> Vec<ImageMetadata>
where
    I: IntoIterator<Item = ImageMetadata>,
{
    let mut images: Vec<ImageMetadata> = Vec::new();

    for candidate in candidates {
        if let Some(reference) = images.first() {
            if candidate.width != reference.width || candidate.height != reference.height {
                log::warn!("Skipping image {} due to size mismatch.", candidate.path.display());
                continue;
            }
        }
        images.push(candidate);
    }

    images.sort_by_cached_key(|image| image.file_name());
    images
}

fn has_image_extension(path: &Path) -> bool {
    match path.extension() {
        Some(extension) => {
            let ext = extension.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("dir", &self.dir)
            .field("images", &self.images.len())
            .finish()
    }
}
