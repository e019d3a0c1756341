//! Plain-text and JSON summaries of a loaded [`Gallery`].

use anyhow::Result;
use std::io::Write;

use crate::gallery::Gallery;

pub fn write_text(gallery: &Gallery, out: &mut dyn Write) -> Result<()> {
    if !gallery.name().is_empty() {
        writeln!(out, "Gallery: {} ({})", gallery.name(), gallery.display_title())?;
        if let Some(epoch) = gallery.epoch() {
            writeln!(out, "Epoch: {}", epoch)?;
        }
        writeln!(out)?;
    }

    let mut count = 0;
    for year in gallery.years() {
        writeln!(out, "{}", year)?;
        for month in gallery.months(year) {
            writeln!(out, " - {}", month)?;
            for day in gallery.days(year, month) {
                let photos = gallery.photos(year, month, day);
                count += photos.len();
                let names: Vec<String> = photos.iter().map(|p| p.to_string()).collect();
                writeln!(out, "   - {}: {}; {}", day, photos.len(), names.join(", "))?;
            }
        }
    }

    writeln!(out, "Total count: {}", count)?;
    if count != gallery.total_count() as usize {
        writeln!(out, "Rows loaded: {}", gallery.total_count())?;
    }

    writeln!(out)?;
    writeln!(out, "Countries:")?;
    for (code, name) in gallery.countries() {
        writeln!(out, " - {} = {}", code, name)?;
    }
    writeln!(out)?;
    writeln!(out, "Cameras:")?;
    for camera in gallery.cameras() {
        writeln!(out, " - {}", camera)?;
    }
    writeln!(out)?;
    writeln!(out, "Authors:")?;
    for author in gallery.authors() {
        writeln!(out, " - {}", author)?;
    }
    Ok(())
}

pub fn write_json(gallery: &Gallery, out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, gallery.stats())?;
    writeln!(out)?;
    Ok(())
}
