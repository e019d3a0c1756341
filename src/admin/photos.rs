//! Photo commands: add, update, thumbs, rm, show, to-g, from-g.

use anyhow::{bail, Result};
use std::collections::BTreeSet;
use std::io::Write;
use tracing::{info, warn};

use super::{validate_taken, Admin, Selection};
use crate::db::PhotoRow;
use crate::labels::Labels;
use crate::scanner::{ImageMetadata, ScannedPhoto};

/// User-entered photo properties. Unset fields fall back to a default row.
#[derive(Debug, Clone, Default)]
pub struct PhotoFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub place: Option<String>,
    pub author: Option<String>,
    /// Capture time for photos without one in their EXIF data.
    pub taken: Option<String>,
}

impl PhotoFields {
    fn apply(&self, row: &mut PhotoRow, defaults: &PhotoRow) {
        let pick = |value: &Option<String>, default: &str| {
            value.clone().unwrap_or_else(|| default.to_string())
        };
        row.title = pick(&self.title, &defaults.title);
        row.description = pick(&self.description, &defaults.description);
        row.country = pick(&self.country, &defaults.country);
        row.place = pick(&self.place, &defaults.place);
        row.author = pick(&self.author, &defaults.author);
    }
}

/// Camera model alias if one is configured, else `make model`.
fn camera_label(metadata: &ImageMetadata, labels: &Labels) -> String {
    if let Some(model) = metadata.camera_model.as_deref() {
        let alias = labels.camera_name(model);
        if alias != model {
            return alias.to_string();
        }
    }
    labels.camera_name(&metadata.camera()).to_string()
}

/// Copy the scanned properties into `row`. The EXIF capture time wins over
/// `fallback_taken`, which only fills in for photos without one.
fn apply_scan(
    row: &mut PhotoRow,
    scanned: &ScannedPhoto,
    labels: &Labels,
    fallback_taken: Option<&str>,
) {
    let metadata = &scanned.metadata;
    if let Some(taken) = metadata.taken.as_deref().or(fallback_taken) {
        row.taken = taken.to_string();
    }
    row.camera = camera_label(metadata, labels);
    row.focal = metadata.focal;
    row.fstop = metadata.fstop.clone();
    row.shutter = metadata.shutter.clone();
    row.iso = metadata.iso;
    (row.f_width, row.f_height) = metadata.oriented_dimensions();
    (row.width, row.height) = scanned.generated.display;
    (row.t_width, row.t_height) = scanned.generated.thumb;
}

impl Admin<'_> {
    /// Catalogue new originals. Returns the number of photos added.
    pub fn add(&self, selection: &Selection, fields: &PhotoFields, out: &mut dyn Write) -> Result<usize> {
        let taken = fields.taken.as_deref().map(validate_taken).transpose()?;
        self.require_galleries()?;

        let known = self.db.get_photos()?;
        let mut defaults = self
            .db
            .last_photo(self.options.galleries.first().map(String::as_str))?
            .unwrap_or_default();

        let mut added = 0;
        for name in &selection.photos {
            if known.contains_key(name) {
                continue;
            }
            if !self.scanner.exists(name) {
                warn!("Photo {} not found on disk", name);
                writeln!(out, "Photo {} not found on disk.", name)?;
                continue;
            }

            let scanned = self.scanner.scan(name, false, self.options.simulate)?;
            let mut row = PhotoRow {
                name: name.clone(),
                ..Default::default()
            };
            apply_scan(&mut row, &scanned, self.labels, taken.as_deref());
            if row.taken.is_empty() {
                warn!("Photo {} has no capture time", name);
                writeln!(out, "Skipping {}: no capture time, give one with --taken.", name)?;
                continue;
            }
            fields.apply(&mut row, &defaults);

            info!("Inserting photo {}", name);
            if !self.options.simulate {
                self.db.insert_photo(&row)?;
                for gallery in &self.options.galleries {
                    self.db.add_to_gallery(name, gallery)?;
                }
            }
            writeln!(out, "Photo {} added.", name)?;

            defaults = row;
            added += 1;
        }
        Ok(added)
    }

    /// Re-read EXIF data and image dimensions of catalogued photos. User
    /// fields are kept unless given.
    pub fn update(&self, selection: &Selection, fields: &PhotoFields, out: &mut dyn Write) -> Result<usize> {
        let taken = fields.taken.as_deref().map(validate_taken).transpose()?;
        let known = self.db.get_photos()?;

        let mut updated = 0;
        for name in &selection.photos {
            let Some(old) = known.get(name) else {
                continue;
            };
            if !self.scanner.exists(name) {
                warn!("Catalogued photo {} not found on disk", name);
                writeln!(out, "Photo {} is in the database but not on disk.", name)?;
                continue;
            }

            let scanned = self.scanner.scan(name, false, self.options.simulate)?;
            let mut row = old.clone();
            apply_scan(&mut row, &scanned, self.labels, taken.as_deref());
            fields.apply(&mut row, old);

            info!("Updating photo {}", name);
            if !self.options.simulate {
                self.db.update_photo(&row)?;
            }
            writeln!(out, "Photo {} updated.", name)?;
            updated += 1;
        }
        Ok(updated)
    }

    /// Regenerate the resized copies of catalogued photos and store their
    /// dimensions.
    pub fn thumbs(&self, selection: &Selection, out: &mut dyn Write) -> Result<usize> {
        let mut count = 0;
        for name in self.catalogued(selection)? {
            if !self.scanner.exists(&name) {
                writeln!(out, "Photo {} is in the database but not on disk.", name)?;
                continue;
            }
            info!("Regenerating thumbnails for {}", name);
            if !self.options.simulate {
                let scanned = self.scanner.scan(&name, true, false)?;
                self.db
                    .update_photo_dimensions(&name, scanned.generated.display, scanned.generated.thumb)?;
            }
            writeln!(out, "Thumbnails for {} created.", name)?;
            count += 1;
        }
        Ok(count)
    }

    pub fn rm(&self, selection: &Selection, out: &mut dyn Write) -> Result<usize> {
        if selection.all && !self.options.force {
            bail!("Deleting all photos requires --force.");
        }

        let mut count = 0;
        for name in self.catalogued(selection)? {
            info!("Deleting photo {}", name);
            if !self.options.simulate {
                self.db.delete_photo(&name)?;
            }
            writeln!(out, "Photo {} deleted.", name)?;
            count += 1;
        }
        Ok(count)
    }

    /// Print the properties of catalogued photos, only those in the
    /// `--gallery` galleries if any are given.
    pub fn show(&self, selection: &Selection, out: &mut dyn Write) -> Result<()> {
        let known = self.db.get_photos()?;

        let mut members = BTreeSet::new();
        for gallery in &self.options.galleries {
            members.extend(self.db.gallery_photos(gallery)?);
        }

        let mut names: Vec<&String> = selection
            .photos
            .iter()
            .filter(|name| known.contains_key(*name))
            .filter(|name| self.options.galleries.is_empty() || members.contains(*name))
            .collect();
        names.sort_by_key(|name| name.to_lowercase());

        for name in names {
            let Some(photo) = known.get(name) else {
                continue;
            };
            writeln!(out, "{}", photo.name)?;
            writeln!(out, "  Title:       {}", photo.title)?;
            writeln!(out, "  Description: {}", photo.description)?;
            writeln!(out, "  Taken:       {}", photo.taken)?;
            writeln!(out, "  Place:       {}", photo.place)?;
            writeln!(out, "  Country:     {}", photo.country)?;
            writeln!(out, "  Author:      {}", photo.author)?;
            writeln!(out, "  Camera:      {}", photo.camera)?;
            writeln!(
                out,
                "               F/{}, {}s, ISO {}, {}x{}",
                photo.fstop.as_deref().unwrap_or("-"),
                photo.shutter.as_deref().unwrap_or("-"),
                photo.iso.map(|iso| iso.to_string()).unwrap_or_else(|| "-".to_string()),
                photo.f_width,
                photo.f_height
            )?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// Add catalogued photos to the `--gallery` galleries.
    pub fn to_galleries(&self, selection: &Selection, out: &mut dyn Write) -> Result<usize> {
        if self.options.galleries.is_empty() {
            bail!("No gallery given, use --gallery.");
        }
        self.require_galleries()?;

        let photos = self.catalogued(selection)?;
        let mut added = 0;
        for gallery in &self.options.galleries {
            let members: BTreeSet<String> = self.db.gallery_photos(gallery)?.into_iter().collect();
            for photo in &photos {
                if members.contains(photo) {
                    writeln!(out, "Photo {} already exists in gallery {}.", photo, gallery)?;
                    continue;
                }
                info!("Adding photo {} to gallery {}", photo, gallery);
                if !self.options.simulate {
                    self.db.add_to_gallery(photo, gallery)?;
                }
                writeln!(out, "Photo {} added to gallery {}.", photo, gallery)?;
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove catalogued photos from the `--gallery` galleries.
    pub fn from_galleries(&self, selection: &Selection, out: &mut dyn Write) -> Result<usize> {
        if selection.all && !self.options.force {
            bail!("Removing all photos from galleries requires --force.");
        }
        if self.options.galleries.is_empty() {
            bail!("No gallery given, use --gallery.");
        }

        let photos = self.catalogued(selection)?;
        let mut removed = 0;
        for gallery in &self.options.galleries {
            for photo in &photos {
                info!("Removing photo {} from gallery {}", photo, gallery);
                let was_member = if self.options.simulate {
                    self.db.gallery_photos(gallery)?.contains(photo)
                } else {
                    self.db.remove_from_gallery(photo, gallery)?
                };
                if was_member {
                    writeln!(out, "Photo {} removed from gallery {}.", photo, gallery)?;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}
