//! SQL for the filtered photo load.

use super::{GalleryFilter, NO_GALLERY};

const PHOTO_COLUMNS: &str = "photos.name, photos.title, photos.taken, photos.author, photos.country, \
     photos.camera, photos.width, photos.height, photos.t_width, photos.t_height";

pub(crate) const GALLERY_LIST_SQL: &str = r#"
    SELECT galleries.name, galleries.title, galleries.description, galleries.epoch,
           COUNT(photo_galleries.photo_name)
    FROM galleries
    LEFT OUTER JOIN photo_galleries ON galleries.name = photo_galleries.gallery_name
    GROUP BY galleries.name, galleries.title, galleries.description, galleries.epoch
    ORDER BY galleries.name
"#;

pub(crate) const UNGROUPED_COUNT_SQL: &str = r#"
    SELECT COUNT(*)
    FROM photos
    WHERE name NOT IN (SELECT photo_name FROM photo_galleries)
"#;

/// Build the photo SELECT for a filter, returning the statement and its
/// bound values in placeholder order.
pub(crate) fn photo_select(filter: &GalleryFilter) -> (String, Vec<String>) {
    let mut predicates = Vec::new();
    let mut values = Vec::new();
    let mut join = false;

    match filter.gallery.as_deref() {
        Some(NO_GALLERY) => {
            predicates.push("photos.name NOT IN (SELECT photo_name FROM photo_galleries)");
        }
        Some(gallery) => {
            join = true;
            predicates.push("photo_galleries.gallery_name = ?");
            values.push(gallery.to_string());
        }
        None => {}
    }

    for (column, value) in [
        ("photos.country LIKE ?", &filter.country),
        ("photos.camera LIKE ?", &filter.camera),
        ("photos.author LIKE ?", &filter.author),
    ] {
        if let Some(value) = value {
            predicates.push(column);
            values.push(value.clone());
        }
    }

    let mut sql = format!("SELECT {PHOTO_COLUMNS} FROM photos");
    if join {
        sql.push_str(" JOIN photo_galleries ON photo_galleries.photo_name = photos.name");
    }
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }
    sql.push_str(" ORDER BY photos.name");

    (sql, values)
}
