use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{Bounds, ThumbnailConfig};

/// Directory of the originals, relative to the gallery root.
pub const FULL_DIR: &str = "full";
/// Directory of the display-size images.
pub const IMAGE_DIR: &str = "i";
/// Directory of the thumbnails.
pub const THUMB_DIR: &str = "thumbs";

/// Dimensions of the generated display image and thumbnail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generated {
    pub display: (u32, u32),
    pub thumb: (u32, u32),
}

/// Creates the resized copies of `full/<name>` under `i/` and `thumbs/`.
pub struct ThumbnailMaker {
    root: PathBuf,
    image: Bounds,
    thumb: Bounds,
}

impl ThumbnailMaker {
    pub fn new(root: &Path, config: &ThumbnailConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            image: config.image,
            thumb: config.thumb,
        }
    }

    pub fn source_path(&self, name: &str) -> PathBuf {
        self.root.join(FULL_DIR).join(name)
    }

    fn targets(&self, name: &str) -> [(PathBuf, Bounds); 2] {
        [
            (self.root.join(IMAGE_DIR).join(name), self.image),
            (self.root.join(THUMB_DIR).join(name), self.thumb),
        ]
    }

    /// Whether any of the resized copies is missing.
    pub fn is_missing(&self, name: &str) -> bool {
        self.targets(name).iter().any(|(path, _)| !path.exists())
    }

    /// Create the resized copies, oriented upright. Existing copies are kept
    /// unless `force` is set.
    pub fn generate(&self, name: &str, orientation: u32, force: bool) -> Result<Generated> {
        if force || self.is_missing(name) {
            let source = self.source_path(name);
            let img = image::open(&source)
                .with_context(|| format!("Could not read {}", source.display()))?;
            let img = apply_orientation(img, orientation);

            for (path, bounds) in self.targets(name) {
                debug!("Creating {}x{} copy {}", bounds.width, bounds.height, path.display());
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                img.resize(bounds.width, bounds.height, FilterType::Lanczos3)
                    .save(&path)
                    .with_context(|| format!("Could not write {}", path.display()))?;
            }
        }
        self.dimensions(name)
    }

    /// Dimensions of the existing resized copies.
    pub fn dimensions(&self, name: &str) -> Result<Generated> {
        let [(display, _), (thumb, _)] = self.targets(name);
        Ok(Generated {
            display: image::image_dimensions(&display)
                .with_context(|| format!("Could not read {}", display.display()))?,
            thumb: image::image_dimensions(&thumb)
                .with_context(|| format!("Could not read {}", thumb.display()))?,
        })
    }
}

/// Rotate/flip an image so EXIF orientation 1 applies.
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}
