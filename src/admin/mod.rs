//! Catalog maintenance commands.
//!
//! Every command writes its progress to the given output and leaves the
//! database untouched when [`Options::simulate`] is set. The caller decides
//! the transaction boundary (see [`crate::db::Database::with_transaction`]).

mod galleries;
mod photos;
pub mod report;

use anyhow::{bail, Result};
use std::path::Path;

use crate::db::Database;
use crate::gallery::photo::parse_timestamp;
use crate::labels::Labels;
use crate::scanner::Scanner;

pub use galleries::GalleryFields;
pub use photos::PhotoFields;

/// Flags shared by all commands.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Report what would be done without writing anything.
    pub simulate: bool,
    /// Allow operations on every photo, and gallery deletion.
    pub force: bool,
    /// Galleries named with `--gallery`.
    pub galleries: Vec<String>,
}

/// Photos a command acts on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub photos: Vec<String>,
    /// No photo was named, so every original was selected.
    pub all: bool,
}

pub struct Admin<'a> {
    db: &'a Database,
    scanner: &'a Scanner,
    labels: &'a Labels,
    options: Options,
}

impl<'a> Admin<'a> {
    pub fn new(db: &'a Database, scanner: &'a Scanner, labels: &'a Labels, options: Options) -> Self {
        Self {
            db,
            scanner,
            labels,
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The named photos by file name, or every original in `full/` when
    /// none is named.
    pub fn select(&self, args: &[String]) -> Result<Selection> {
        if args.is_empty() {
            return Ok(Selection {
                photos: self.scanner.discover()?,
                all: true,
            });
        }
        let photos = args
            .iter()
            .map(|arg| {
                Path::new(arg)
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| arg.clone())
            })
            .collect();
        Ok(Selection { photos, all: false })
    }

    /// Selected photos that are catalogued, in selection order.
    fn catalogued(&self, selection: &Selection) -> Result<Vec<String>> {
        let known = self.db.get_photos()?;
        Ok(selection
            .photos
            .iter()
            .filter(|name| known.contains_key(*name))
            .cloned()
            .collect())
    }

    /// Fail unless every `--gallery` exists.
    fn require_galleries(&self) -> Result<()> {
        for name in &self.options.galleries {
            if self.db.get_gallery(name)?.is_none() {
                bail!("Gallery {} does not exist.", name);
            }
        }
        Ok(())
    }
}

/// Accept a user-given capture time in the stored format.
pub fn validate_taken(value: &str) -> Result<String> {
    match parse_timestamp(value, false) {
        Some(ts) if value.len() == 19 => Ok(ts.format("%Y-%m-%d %H:%M:%S").to_string()),
        _ => bail!("Invalid capture time {:?}, expected YYYY-MM-DD HH:MM:SS", value),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{Bounds, Config};
    use crate::db::GalleryRow;
    use crate::scanner::FULL_DIR;
    use image::{Rgb, RgbImage};

    pub(crate) struct Fixture {
        pub dir: tempfile::TempDir,
        pub db: Database,
        pub scanner: Scanner,
        pub labels: Labels,
    }

    impl Fixture {
        pub fn new(photos: &[&str]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let full = dir.path().join(FULL_DIR);
            std::fs::create_dir(&full).unwrap();
            for name in photos {
                RgbImage::from_pixel(90, 60, Rgb([30, 60, 90])).save(full.join(name)).unwrap();
            }

            let mut config = Config::default();
            config.thumbnails.image = Bounds { width: 120, height: 120 };
            let db = Database::open_in_memory().unwrap();
            db.initialize().unwrap();
            let scanner = Scanner::with_root(dir.path(), &config);
            Self {
                dir,
                db,
                scanner,
                labels: config.labels(),
            }
        }

        pub fn admin(&self, options: Options) -> Admin<'_> {
            Admin::new(&self.db, &self.scanner, &self.labels, options)
        }

        pub fn gallery(&self, name: &str) {
            self.db
                .insert_gallery(&GalleryRow {
                    name: name.to_string(),
                    ..Default::default()
                })
                .unwrap();
        }
    }

    pub(crate) fn galleries(names: &[&str]) -> Options {
        Options {
            galleries: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_select_defaults_to_all_originals() {
        let fx = Fixture::new(&["b.jpg", "a.jpg"]);
        let admin = fx.admin(Options::default());

        let all = admin.select(&[]).unwrap();
        assert!(all.all);
        assert_eq!(all.photos, vec!["a.jpg", "b.jpg"]);

        let named = admin.select(&["full/b.jpg".to_string(), "c.jpg".to_string()]).unwrap();
        assert!(!named.all);
        assert_eq!(named.photos, vec!["b.jpg", "c.jpg"]);
    }

    #[test]
    fn test_require_galleries() {
        let fx = Fixture::new(&[]);
        fx.gallery("trip");
        assert!(fx.admin(galleries(&["trip"])).require_galleries().is_ok());
        assert!(fx.admin(galleries(&["trip", "nope"])).require_galleries().is_err());
    }

    #[test]
    fn test_validate_taken() {
        assert_eq!(validate_taken("2014-01-05 10:20:30").unwrap(), "2014-01-05 10:20:30");
        assert!(validate_taken("2014-01-05").is_err());
        assert!(validate_taken("2014-02-30 10:20:30").is_err());
        assert!(validate_taken("2014-01-05 10:20:30+02:00").is_err());
    }
}
