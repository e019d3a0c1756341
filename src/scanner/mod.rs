pub mod discovery;
pub mod metadata;
pub mod thumbnails;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::Config;

pub use discovery::discover_images;
pub use metadata::{extract_metadata, ImageMetadata};
pub use thumbnails::{Generated, ThumbnailMaker, FULL_DIR};

#[derive(Debug, Clone)]
pub struct ScannedPhoto {
    pub name: String,
    pub metadata: ImageMetadata,
    pub generated: Generated,
}

/// Reads originals from `full/` and keeps their resized copies current.
pub struct Scanner {
    full_dir: PathBuf,
    image_extensions: Vec<String>,
    thumbnails: ThumbnailMaker,
}

impl Scanner {
    pub fn new(config: &Config) -> Self {
        Self::with_root(&config.root, config)
    }

    pub fn with_root(root: &Path, config: &Config) -> Self {
        Self {
            full_dir: root.join(FULL_DIR),
            image_extensions: config.image_extensions.clone(),
            thumbnails: ThumbnailMaker::new(root, &config.thumbnails),
        }
    }

    /// File names of the originals, sorted.
    pub fn discover(&self) -> Result<Vec<String>> {
        let names = discover_images(&self.full_dir, &self.image_extensions)?
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect();
        Ok(names)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.full_dir.join(name).is_file()
    }

    /// Read the metadata of one original and bring its resized copies up to
    /// date. With `simulate` nothing is written and the dimensions of any
    /// existing copies are reported instead.
    pub fn scan(&self, name: &str, force_thumbs: bool, simulate: bool) -> Result<ScannedPhoto> {
        let metadata = extract_metadata(&self.full_dir.join(name))?;
        debug!("Metadata for {}: {:?}", name, metadata);

        let generated = if simulate {
            self.thumbnails.dimensions(name).unwrap_or_default()
        } else {
            self.thumbnails.generate(name, metadata.orientation, force_thumbs)?
        };

        Ok(ScannedPhoto {
            name: name.to_string(),
            metadata,
            generated,
        })
    }
}
