use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::labels::{default_cameras, default_countries, Labels};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Directory holding `full/`, `i/` and `thumbs/`.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    #[serde(default)]
    pub thumbnails: ThumbnailConfig,

    /// Country code → display name.
    #[serde(default = "default_countries")]
    pub countries: BTreeMap<String, String>,

    /// Camera model as reported by EXIF → canonical name.
    #[serde(default = "default_cameras")]
    pub cameras: BTreeMap<String, String>,

    /// Instance (e.g. hostname) → gallery name.
    #[serde(default)]
    pub instances: HashMap<String, String>,
}

/// A bounding box images are resized to fit in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Display-size images under `i/`.
    #[serde(default = "default_image_bounds")]
    pub image: Bounds,

    /// Thumbnails under `thumbs/`.
    #[serde(default = "default_thumb_bounds")]
    pub thumb: Bounds,
}

fn default_image_bounds() -> Bounds {
    Bounds { width: 1500, height: 1500 }
}

fn default_thumb_bounds() -> Bounds {
    Bounds { width: 600, height: 200 }
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            image: default_image_bounds(),
            thumb: default_thumb_bounds(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("gallery.sqlite3")
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_image_extensions() -> Vec<String> {
    vec!["jpg".to_string(), "jpeg".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            root: default_root(),
            image_extensions: default_image_extensions(),
            thumbnails: ThumbnailConfig::default(),
            countries: default_countries(),
            cameras: default_cameras(),
            instances: HashMap::new(),
        }
    }
}

impl Config {
    /// Load from `GALLERIA_CONFIG` or the default location, writing the
    /// defaults there on first use.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var_os("GALLERIA_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(Self::config_path);
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read config {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn labels(&self) -> Labels {
        Labels::new(self.countries.clone(), self.cameras.clone())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("galleria")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}
