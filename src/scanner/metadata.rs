use anyhow::Result;
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::gallery::photo::{parse_timestamp, zero_padded};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageMetadata {
    // Pixel dimensions as stored in the file
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// EXIF orientation (1-8), 0 when absent.
    pub orientation: u32,

    // Camera info
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,

    // Exposure settings
    pub focal: Option<i64>,
    pub fstop: Option<String>,
    pub shutter: Option<String>,
    pub iso: Option<i64>,

    /// Capture time as `YYYY-MM-DD HH:MM:SS`.
    pub taken: Option<String>,
}

impl ImageMetadata {
    /// Camera name from make and model, without repeating the make.
    pub fn camera(&self) -> String {
        camera_name(
            self.camera_make.as_deref().unwrap_or(""),
            self.camera_model.as_deref().unwrap_or(""),
        )
    }

    /// Dimensions of the image as displayed, after applying the orientation.
    pub fn oriented_dimensions(&self) -> (u32, u32) {
        let (w, h) = (self.width.unwrap_or(0), self.height.unwrap_or(0));
        if is_transposed(self.orientation) {
            (h, w)
        } else {
            (w, h)
        }
    }
}

pub fn extract_metadata(path: &Path) -> Result<ImageMetadata> {
    let mut metadata = ImageMetadata::default();

    if let Ok(reader) = image::ImageReader::open(path) {
        if let Ok(reader) = reader.with_guessed_format() {
            if let Ok(dims) = reader.into_dimensions() {
                metadata.width = Some(dims.0);
                metadata.height = Some(dims.1);
            }
        }
    }

    let file = File::open(path)?;
    let mut bufreader = BufReader::new(file);
    let exif = match exif::Reader::new().read_from_container(&mut bufreader) {
        Ok(exif) => exif,
        Err(_) => return Ok(metadata),
    };

    let ascii = |tag: exif::Tag| -> Option<String> {
        let field = exif.get_field(tag, exif::In::PRIMARY)?;
        match field.value {
            exif::Value::Ascii(ref v) => v
                .first()
                .map(|s| String::from_utf8_lossy(s).trim_matches(char::from(0)).trim().to_string())
                .filter(|s| !s.is_empty()),
            _ => None,
        }
    };
    let rational = |tag: exif::Tag| -> Option<f64> {
        let field = exif.get_field(tag, exif::In::PRIMARY)?;
        match field.value {
            exif::Value::Rational(ref v) => v.first().filter(|r| r.denom != 0).map(|r| r.to_f64()),
            _ => None,
        }
    };
    let uint = |tag: exif::Tag| -> Option<u32> {
        exif.get_field(tag, exif::In::PRIMARY)?.value.get_uint(0)
    };

    metadata.camera_make = ascii(exif::Tag::Make);
    metadata.camera_model = ascii(exif::Tag::Model);
    metadata.focal = rational(exif::Tag::FocalLength).map(|f| f.round() as i64);
    metadata.fstop = rational(exif::Tag::FNumber).map(|f| format!("{:.1}", f));
    metadata.shutter = exif
        .get_field(exif::Tag::ExposureTime, exif::In::PRIMARY)
        .map(|field| field.display_value().to_string());
    metadata.iso = uint(exif::Tag::PhotographicSensitivity).map(i64::from);
    metadata.orientation = uint(exif::Tag::Orientation).unwrap_or(0);
    metadata.taken = ascii(exif::Tag::DateTimeOriginal)
        .or_else(|| ascii(exif::Tag::DateTime))
        .and_then(|s| normalize_exif_datetime(&s));

    Ok(metadata)
}

/// `make model`, or just `model` when the model already starts with the make.
pub fn camera_name(make: &str, model: &str) -> String {
    if model.starts_with(make) {
        model.to_string()
    } else if model.is_empty() {
        make.to_string()
    } else {
        format!("{} {}", make, model)
    }
}

/// Turn an EXIF `YYYY:MM:DD HH:MM:SS` into `YYYY-MM-DD HH:MM:SS`. Values
/// that are already dash-separated pass through; anything else is rejected.
pub fn normalize_exif_datetime(value: &str) -> Option<String> {
    let head = zero_padded(value.trim())?;
    NaiveDateTime::parse_from_str(head, "%Y:%m:%d %H:%M:%S")
        .ok()
        .or_else(|| parse_timestamp(head, false))
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Orientations 5-8 swap width and height.
pub fn is_transposed(orientation: u32) -> bool {
    (5..=8).contains(&orientation)
}
