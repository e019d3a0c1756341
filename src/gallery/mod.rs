//! Read-only view of the photo catalog for the static gallery browser.
//!
//! A [`Gallery`] is built in one pass over a filtered set of photos: each
//! row is bucketed by the day it was taken and counted, after which the
//! per-period averages and maxima are derived. The result is immutable;
//! build another `Gallery` to look at a different filter.

pub mod index;
pub mod photo;
mod query;
pub mod stats;

use chrono::NaiveDateTime;
use rusqlite::{Connection, OpenFlags, Row};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::labels::Labels;

pub use index::PhotoIndex;
pub use photo::{Photo, RawPhoto};
pub use stats::{days_in_month, Statistics};

/// Gallery name standing for "photos outside every gallery".
pub const NO_GALLERY: &str = ":none";

/// Restricts which photos a [`Gallery`] loads. Text filters are matched with
/// SQL `LIKE`, so `%` and `_` act as wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GalleryFilter {
    /// Host or site name, mapped to a gallery by an [`InstanceResolver`].
    pub instance: Option<String>,
    /// Gallery name, or [`NO_GALLERY`].
    pub gallery: Option<String>,
    pub country: Option<String>,
    pub camera: Option<String>,
    pub author: Option<String>,
}

impl GalleryFilter {
    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn gallery(mut self, gallery: impl Into<String>) -> Self {
        self.gallery = Some(gallery.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn camera(mut self, camera: impl Into<String>) -> Self {
        self.camera = Some(camera.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Maps an instance name (e.g. the serving hostname) to a gallery.
pub trait InstanceResolver {
    fn gallery_for(&self, instance: &str) -> Option<String>;
}

/// Resolver that never maps an instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInstanceMapping;

impl InstanceResolver for NoInstanceMapping {
    fn gallery_for(&self, _instance: &str) -> Option<String> {
        None
    }
}

impl InstanceResolver for HashMap<String, String> {
    fn gallery_for(&self, instance: &str) -> Option<String> {
        self.get(instance).cloned()
    }
}

/// Photos of the catalog bucketed by day, with statistics.
#[derive(Debug, Default)]
pub struct Gallery {
    name: String,
    title: String,
    description: String,
    epoch: Option<NaiveDateTime>,

    index: PhotoIndex,
    stats: Statistics,

    /// Gallery name → display title, including [`NO_GALLERY`].
    galleries: BTreeMap<String, String>,
    /// Country code → display name for the loaded photos.
    countries: BTreeMap<String, String>,
}

impl Gallery {
    /// Open the catalog read-only and load the photos matching `filter`.
    pub fn open(
        db_path: &Path,
        filter: &GalleryFilter,
        labels: &Labels,
        resolver: &dyn InstanceResolver,
    ) -> Result<Self> {
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::load(&conn, filter, labels, resolver)
    }

    /// Load the photos matching `filter` from an open catalog, inside a
    /// single read transaction.
    pub fn load(
        conn: &Connection,
        filter: &GalleryFilter,
        labels: &Labels,
        resolver: &dyn InstanceResolver,
    ) -> Result<Self> {
        let filter = resolve_instance(filter, resolver);
        debug!(?filter, "Loading gallery");

        let mut gallery = Gallery::default();

        let tx = conn.unchecked_transaction()?;
        gallery.load_galleries(&tx, filter.gallery.as_deref())?;
        gallery.load_photos(&tx, &filter)?;
        tx.commit()?;

        gallery.stats.finish(&gallery.index);
        gallery.countries = gallery
            .stats
            .country_counts
            .keys()
            .map(|code| (code.clone(), labels.country_name(code).to_string()))
            .collect();

        info!(
            "Loaded {} photos in {} years ({} galleries)",
            gallery.stats.total_count,
            gallery.index.years().len(),
            gallery.galleries.len()
        );
        Ok(gallery)
    }

    fn load_galleries(&mut self, conn: &Connection, selected: Option<&str>) -> Result<()> {
        let mut stmt = conn.prepare(query::GALLERY_LIST_SQL)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let name = text(row, 0)?;
            let title = text(row, 1)?;
            let count: u32 = row.get(4)?;

            let display = if title.is_empty() { name.clone() } else { title.clone() };
            self.galleries.insert(name.clone(), display);
            self.stats.set_gallery_count(&name, count);

            if selected == Some(name.as_str()) {
                self.description = text(row, 2)?;
                self.epoch = photo::parse_timestamp(&text(row, 3)?, true);
                self.title = title;
                self.name = name;
            }
        }

        let ungrouped: u32 = conn.query_row(query::UNGROUPED_COUNT_SQL, [], |row| row.get(0))?;
        self.galleries.insert(NO_GALLERY.to_string(), "(None)".to_string());
        self.stats.set_gallery_count(NO_GALLERY, ungrouped);
        Ok(())
    }

    fn load_photos(&mut self, conn: &Connection, filter: &GalleryFilter) -> Result<()> {
        let (sql, values) = query::photo_select(filter);
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(values.iter()))?;

        let mut id = 0;
        while let Some(row) = rows.next()? {
            id += 1;
            let raw = RawPhoto {
                file: text(row, 0)?,
                title: text(row, 1)?,
                taken: text(row, 2)?,
                author: text(row, 3)?,
                country: text(row, 4)?,
                camera: text(row, 5)?,
                width: dimension(row, 6)?,
                height: dimension(row, 7)?,
                t_width: dimension(row, 8)?,
                t_height: dimension(row, 9)?,
            };
            let photo = Photo::from_raw(id, raw)?;
            self.stats.record(&photo);
            let file = photo.file.clone();
            if !self.index.insert(photo) {
                debug!("Skipping duplicate {} in its day bucket", file);
            }
        }
        Ok(())
    }

    /// Name of the selected gallery, empty when none was selected.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored title of the selected gallery.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title of the selected gallery, falling back to its name.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.name
        } else {
            &self.title
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn epoch(&self) -> Option<NaiveDateTime> {
        self.epoch
    }

    pub fn total_count(&self) -> u32 {
        self.stats.total_count
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn index(&self) -> &PhotoIndex {
        &self.index
    }

    pub fn years(&self) -> Vec<i32> {
        self.index.years()
    }

    pub fn months(&self, year: i32) -> Vec<u32> {
        self.index.months(year)
    }

    pub fn days(&self, year: i32, month: u32) -> Vec<u32> {
        self.index.days(year, month)
    }

    pub fn photos(&self, year: i32, month: u32, day: u32) -> &[Photo] {
        self.index.photos(year, month, day)
    }

    /// Every gallery in the catalog (name → title), regardless of the filter.
    pub fn galleries(&self) -> &BTreeMap<String, String> {
        &self.galleries
    }

    pub fn countries(&self) -> &BTreeMap<String, String> {
        &self.countries
    }

    pub fn cameras(&self) -> Vec<&str> {
        self.stats.camera_counts.keys().map(String::as_str).collect()
    }

    pub fn authors(&self) -> Vec<&str> {
        self.stats.author_counts.keys().map(String::as_str).collect()
    }
}

fn resolve_instance(filter: &GalleryFilter, resolver: &dyn InstanceResolver) -> GalleryFilter {
    let mut filter = filter.clone();
    if let Some(instance) = filter.instance.as_deref() {
        if let Some(gallery) = resolver.gallery_for(instance) {
            debug!("Instance {} maps to gallery {}", instance, gallery);
            filter.gallery = Some(gallery);
        }
    }
    filter
}

fn text(row: &Row, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn dimension(row: &Row, idx: usize) -> rusqlite::Result<u32> {
    let value = row.get::<_, Option<i64>>(idx)?.unwrap_or(0);
    Ok(u32::try_from(value).unwrap_or(0))
}
