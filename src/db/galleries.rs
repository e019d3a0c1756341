//! Galleries and gallery membership.

use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};

use super::Database;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryRow {
    pub name: String,
    pub title: String,
    pub description: String,
    pub epoch: String,
}

fn gallery_from_row(row: &Row) -> rusqlite::Result<GalleryRow> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };
    Ok(GalleryRow {
        name: row.get(0)?,
        title: text(1)?,
        description: text(2)?,
        epoch: text(3)?,
    })
}

impl Database {
    /// Galleries by name, all of them when `names` is empty, ordered
    /// case-insensitively.
    pub fn get_galleries(&self, names: &[String]) -> Result<Vec<GalleryRow>> {
        let mut sql = "SELECT name, title, description, epoch FROM galleries".to_string();
        if !names.is_empty() {
            let placeholders = vec!["?"; names.len()].join(",");
            sql.push_str(&format!(" WHERE name IN ({placeholders})"));
        }
        sql.push_str(" ORDER BY LOWER(name)");

        let mut stmt = self.conn.prepare(&sql)?;
        let galleries = stmt
            .query_map(rusqlite::params_from_iter(names.iter()), gallery_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(galleries)
    }

    pub fn get_gallery(&self, name: &str) -> Result<Option<GalleryRow>> {
        let gallery = self
            .conn
            .query_row(
                "SELECT name, title, description, epoch FROM galleries WHERE name = ?",
                [name],
                gallery_from_row,
            )
            .optional()?;
        Ok(gallery)
    }

    pub fn insert_gallery(&self, gallery: &GalleryRow) -> Result<()> {
        self.conn.execute(
            "INSERT INTO galleries (name, title, description, epoch) VALUES (?, ?, ?, ?)",
            params![gallery.name, gallery.title, gallery.description, gallery.epoch],
        )?;
        Ok(())
    }

    /// Update the gallery currently named `name`. A rename cascades to the
    /// memberships through the foreign key.
    pub fn update_gallery(&self, name: &str, gallery: &GalleryRow) -> Result<()> {
        self.conn.execute(
            "UPDATE galleries SET name = ?, title = ?, description = ?, epoch = ? WHERE name = ?",
            params![gallery.name, gallery.title, gallery.description, gallery.epoch, name],
        )?;
        Ok(())
    }

    /// Delete a gallery and its memberships. The photos stay.
    pub fn delete_gallery(&self, name: &str) -> Result<bool> {
        self.conn
            .execute("DELETE FROM photo_galleries WHERE gallery_name = ?", [name])?;
        let deleted = self.conn.execute("DELETE FROM galleries WHERE name = ?", [name])?;
        Ok(deleted > 0)
    }

    /// Add a photo to a gallery. Returns false if it was already a member.
    pub fn add_to_gallery(&self, photo: &str, gallery: &str) -> Result<bool> {
        let added = self.conn.execute(
            "INSERT OR IGNORE INTO photo_galleries (photo_name, gallery_name) VALUES (?, ?)",
            params![photo, gallery],
        )?;
        Ok(added > 0)
    }

    /// Remove a photo from a gallery. Returns false if it was not a member.
    pub fn remove_from_gallery(&self, photo: &str, gallery: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM photo_galleries WHERE photo_name = ? AND gallery_name = ?",
            params![photo, gallery],
        )?;
        Ok(removed > 0)
    }

    /// Member photo names of one gallery, sorted.
    pub fn gallery_photos(&self, gallery: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT photo_name FROM photo_galleries WHERE gallery_name = ? ORDER BY photo_name",
        )?;
        let names = stmt
            .query_map([gallery], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Photos that belong to no gallery, sorted.
    pub fn photos_without_gallery(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM photos WHERE name NOT IN (SELECT photo_name FROM photo_galleries) ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}
