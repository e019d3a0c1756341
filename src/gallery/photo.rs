use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::Serialize;

use crate::error::{GalleryError, Result};

/// A photo row as stored in the catalog, before its timestamp is parsed.
#[derive(Debug, Clone, Default)]
pub struct RawPhoto {
    pub file: String,
    pub title: String,
    pub taken: String,
    pub author: String,
    pub country: String,
    pub camera: String,
    pub width: u32,
    pub height: u32,
    pub t_width: u32,
    pub t_height: u32,
}

/// One catalogued photo with its parsed capture time.
///
/// Photos compare equal when their file names match, regardless of the
/// other fields.
#[derive(Debug, Clone, Serialize)]
pub struct Photo {
    pub id: u32,
    pub file: String,
    pub title: String,
    pub taken: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub country: String,
    pub camera: String,
    pub width: u32,
    pub height: u32,
    pub t_width: u32,
    pub t_height: u32,
}

impl Photo {
    /// Build a photo from a stored row. Capture times are local wall-clock
    /// values and are read as if they were UTC, so no offset is applied.
    pub fn from_raw(id: u32, raw: RawPhoto) -> Result<Self> {
        let naive = parse_timestamp(&raw.taken, false).ok_or_else(|| GalleryError::Parse {
            photo: raw.file.clone(),
            value: raw.taken.clone(),
        })?;

        Ok(Self {
            id,
            file: raw.file,
            title: raw.title,
            taken: raw.taken,
            timestamp: Utc.from_utc_datetime(&naive),
            author: raw.author,
            country: raw.country,
            camera: raw.camera,
            width: raw.width,
            height: raw.height,
            t_width: raw.t_width,
            t_height: raw.t_height,
        })
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }

    pub fn day(&self) -> u32 {
        self.timestamp.day()
    }

    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Day of week with Sunday as 0.
    pub fn weekday(&self) -> u32 {
        self.timestamp.weekday().num_days_from_sunday()
    }
}

impl PartialEq for Photo {
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file
    }
}

impl Eq for Photo {}

impl std::fmt::Display for Photo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.file)
    }
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIMESTAMP_FORMAT_T: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse the leading `YYYY-MM-DD HH:MM:SS` of `value`. Anything after the
/// seconds (an offset, fractional part) is ignored. With `allow_t` the date
/// and time may also be separated by `T`.
pub fn parse_timestamp(value: &str, allow_t: bool) -> Option<NaiveDateTime> {
    let head = zero_padded(value)?;
    let format = match head.as_bytes()[10] {
        b' ' => TIMESTAMP_FORMAT,
        b'T' if allow_t => TIMESTAMP_FORMAT_T,
        _ => return None,
    };
    NaiveDateTime::parse_and_remainder(value, format)
        .ok()
        .map(|(ts, _)| ts)
}

/// The first 19 bytes of `value` if every field in them is two (or, for the
/// year, four) digits wide. chrono alone would also take `2020-1-5`.
pub(crate) fn zero_padded(value: &str) -> Option<&str> {
    const DIGITS: [usize; 14] = [0, 1, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18];
    let head = value.get(..19)?;
    let bytes = head.as_bytes();
    DIGITS
        .iter()
        .all(|&i| bytes[i].is_ascii_digit())
        .then_some(head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(file: &str, taken: &str) -> RawPhoto {
        RawPhoto {
            file: file.to_string(),
            taken: taken.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_raw_splits_timestamp() {
        let photo = Photo::from_raw(1, raw("a.jpg", "2020-02-29 13:45:10")).unwrap();
        assert_eq!(photo.year(), 2020);
        assert_eq!(photo.month(), 2);
        assert_eq!(photo.day(), 29);
        assert_eq!(photo.hour(), 13);
        // 2020-02-29 was a Saturday
        assert_eq!(photo.weekday(), 6);
    }

    #[test]
    fn test_trailing_offset_is_ignored() {
        let photo = Photo::from_raw(1, raw("a.jpg", "2014-06-01 23:30:00 +0300")).unwrap();
        assert_eq!(photo.day(), 1);
        assert_eq!(photo.hour(), 23);
    }

    #[test]
    fn test_sunday_is_zero() {
        let photo = Photo::from_raw(1, raw("a.jpg", "2024-03-10 08:00:00")).unwrap();
        assert_eq!(photo.weekday(), 0);
    }

    #[test]
    fn test_malformed_timestamp_is_parse_error() {
        for bad in ["", "2020-1-05 10:00:00", "2020:01:05 10:00:00", "2020-02-30 10:00:00", "2020-01-05T10:00:00"] {
            let err = Photo::from_raw(1, raw("bad.jpg", bad)).unwrap_err();
            assert!(matches!(err, GalleryError::Parse { .. }), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_t_separator_only_when_allowed() {
        assert!(parse_timestamp("2012-01-06T02:52:00", false).is_none());
        let ts = parse_timestamp("2012-01-06T02:52:00", true).unwrap();
        assert_eq!(ts.to_string(), "2012-01-06 02:52:00");
    }

    #[test]
    fn test_fields_must_be_zero_padded() {
        for bad in [
            "2020-01-5 10:00:00x",
            "2020-01-05 1:00:00 ",
            "+2020-01-05 10:00:00",
            "2020-01-05 10:00",
            "2020-01-05\t10:00:00",
        ] {
            assert!(parse_timestamp(bad, true).is_none(), "{bad:?} should not parse");
        }
        let ts = parse_timestamp("2020-01-05 10:00:00.250", false).unwrap();
        assert_eq!(ts.to_string(), "2020-01-05 10:00:00");
        assert!(parse_timestamp("2020-01-05 24:00:00", false).is_none());
    }

    #[test]
    fn test_equality_is_by_file_name() {
        let a = Photo::from_raw(1, raw("same.jpg", "2020-01-01 00:00:00")).unwrap();
        let mut other = raw("same.jpg", "2021-05-05 12:00:00");
        other.title = "different".to_string();
        let b = Photo::from_raw(2, other).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "same.jpg");
    }
}
