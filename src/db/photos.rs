//! Photo rows.

use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use std::collections::BTreeMap;

use super::Database;

const PHOTO_COLUMNS: &str = "name, taken, title, description, country, place, author, \
     camera, focal, fstop, shutter, iso, \
     width, height, t_width, t_height, f_width, f_height";

/// A full photo row as the admin commands read and write it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoRow {
    pub name: String,
    pub taken: String,

    pub title: String,
    pub description: String,
    pub country: String,
    pub place: String,
    pub author: String,

    pub camera: String,
    pub focal: Option<i64>,
    pub fstop: Option<String>,
    pub shutter: Option<String>,
    pub iso: Option<i64>,

    pub width: u32,
    pub height: u32,
    pub t_width: u32,
    pub t_height: u32,
    pub f_width: u32,
    pub f_height: u32,
}

fn photo_from_row(row: &Row) -> rusqlite::Result<PhotoRow> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    let dim = |idx: usize| -> rusqlite::Result<u32> {
        Ok(row.get::<_, Option<u32>>(idx)?.unwrap_or(0))
    };
    Ok(PhotoRow {
        name: row.get(0)?,
        taken: text(1)?,
        title: text(2)?,
        description: text(3)?,
        country: text(4)?,
        place: text(5)?,
        author: text(6)?,
        camera: text(7)?,
        focal: row.get(8)?,
        fstop: row.get(9)?,
        shutter: row.get(10)?,
        iso: row.get(11)?,
        width: dim(12)?,
        height: dim(13)?,
        t_width: dim(14)?,
        t_height: dim(15)?,
        f_width: dim(16)?,
        f_height: dim(17)?,
    })
}

impl Database {
    /// All photos keyed by file name.
    pub fn get_photos(&self) -> Result<BTreeMap<String, PhotoRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PHOTO_COLUMNS} FROM photos ORDER BY name"))?;
        let photos = stmt
            .query_map([], photo_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .map(|photo| (photo.name.clone(), photo))
            .collect();
        Ok(photos)
    }

    pub fn get_photo(&self, name: &str) -> Result<Option<PhotoRow>> {
        let photo = self
            .conn
            .query_row(
                &format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE name = ?"),
                [name],
                photo_from_row,
            )
            .optional()?;
        Ok(photo)
    }

    /// The most recently taken photo, optionally only among the members of
    /// `gallery`. Ties on `taken` go to the greater name.
    pub fn last_photo(&self, gallery: Option<&str>) -> Result<Option<PhotoRow>> {
        let photo = match gallery {
            Some(gallery) => self
                .conn
                .query_row(
                    &format!(
                        "SELECT {PHOTO_COLUMNS} FROM photos \
                         JOIN photo_galleries ON photo_galleries.photo_name = photos.name \
                         WHERE photo_galleries.gallery_name = ? \
                         ORDER BY taken DESC, name DESC LIMIT 1"
                    ),
                    [gallery],
                    photo_from_row,
                )
                .optional()?,
            None => self
                .conn
                .query_row(
                    &format!("SELECT {PHOTO_COLUMNS} FROM photos ORDER BY taken DESC, name DESC LIMIT 1"),
                    [],
                    photo_from_row,
                )
                .optional()?,
        };
        Ok(photo)
    }

    pub fn insert_photo(&self, photo: &PhotoRow) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO photos ({PHOTO_COLUMNS}) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ),
            params![
                photo.name,
                photo.taken,
                photo.title,
                photo.description,
                photo.country,
                photo.place,
                photo.author,
                photo.camera,
                photo.focal,
                photo.fstop,
                photo.shutter,
                photo.iso,
                photo.width,
                photo.height,
                photo.t_width,
                photo.t_height,
                photo.f_width,
                photo.f_height,
            ],
        )?;
        Ok(())
    }

    /// Overwrite every column of the photo with the same name.
    pub fn update_photo(&self, photo: &PhotoRow) -> Result<()> {
        self.conn.execute(
            r#"
            UPDATE photos
            SET taken = ?, title = ?, description = ?, country = ?, place = ?, author = ?,
                camera = ?, focal = ?, fstop = ?, shutter = ?, iso = ?,
                width = ?, height = ?, t_width = ?, t_height = ?, f_width = ?, f_height = ?
            WHERE name = ?
            "#,
            params![
                photo.taken,
                photo.title,
                photo.description,
                photo.country,
                photo.place,
                photo.author,
                photo.camera,
                photo.focal,
                photo.fstop,
                photo.shutter,
                photo.iso,
                photo.width,
                photo.height,
                photo.t_width,
                photo.t_height,
                photo.f_width,
                photo.f_height,
                photo.name,
            ],
        )?;
        Ok(())
    }

    pub fn update_photo_dimensions(&self, name: &str, display: (u32, u32), thumb: (u32, u32)) -> Result<()> {
        self.conn.execute(
            "UPDATE photos SET width = ?, height = ?, t_width = ?, t_height = ? WHERE name = ?",
            params![display.0, display.1, thumb.0, thumb.1, name],
        )?;
        Ok(())
    }

    /// Delete a photo and its gallery memberships. Returns whether it existed.
    pub fn delete_photo(&self, name: &str) -> Result<bool> {
        self.conn
            .execute("DELETE FROM photo_galleries WHERE photo_name = ?", [name])?;
        let deleted = self.conn.execute("DELETE FROM photos WHERE name = ?", [name])?;
        Ok(deleted > 0)
    }
}
