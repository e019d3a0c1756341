pub const SCHEMA_VERSION: i64 = 1;

pub const SCHEMA: &str = r#"
-- Schema version, one row
CREATE TABLE IF NOT EXISTS schema_info (
    version INTEGER NOT NULL
);

-- Photos table: one row per file in full/
CREATE TABLE IF NOT EXISTS photos (
    name TEXT PRIMARY KEY NOT NULL,
    taken TEXT NOT NULL DEFAULT '',       -- 'YYYY-MM-DD HH:MM:SS', local time

    -- User metadata
    title TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    country TEXT NOT NULL DEFAULT '',     -- Country code, e.g. 'fi'
    place TEXT NOT NULL DEFAULT '',
    author TEXT NOT NULL DEFAULT '',

    -- EXIF data
    camera TEXT NOT NULL DEFAULT '',
    focal INTEGER,
    fstop TEXT,
    shutter TEXT,
    iso INTEGER,

    -- Dimensions of the display image (i/), the thumbnail (thumbs/) and the original (full/)
    width INTEGER NOT NULL DEFAULT 0,
    height INTEGER NOT NULL DEFAULT 0,
    t_width INTEGER NOT NULL DEFAULT 0,
    t_height INTEGER NOT NULL DEFAULT 0,
    f_width INTEGER NOT NULL DEFAULT 0,
    f_height INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_photos_taken ON photos(taken);
CREATE INDEX IF NOT EXISTS idx_photos_country ON photos(country);

-- Galleries: named groupings of photos
CREATE TABLE IF NOT EXISTS galleries (
    name TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    epoch TEXT NOT NULL DEFAULT ''        -- Reference time for "age since" display
);

-- Photo to gallery membership
CREATE TABLE IF NOT EXISTS photo_galleries (
    photo_name TEXT NOT NULL,
    gallery_name TEXT NOT NULL,
    PRIMARY KEY (photo_name, gallery_name),
    FOREIGN KEY (photo_name) REFERENCES photos(name) ON DELETE CASCADE ON UPDATE CASCADE,
    FOREIGN KEY (gallery_name) REFERENCES galleries(name) ON DELETE CASCADE ON UPDATE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_photo_galleries_gallery ON photo_galleries(gallery_name);
"#;
