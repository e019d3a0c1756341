//! Year → month → day buckets of photos.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::photo::Photo;

type Days = BTreeMap<u32, Vec<Photo>>;
type Months = BTreeMap<u32, Days>;

/// Photos grouped by the calendar day they were taken.
///
/// A year, month or day key exists only while at least one photo lives
/// under it. Lookups of absent keys return empty results.
#[derive(Debug, Default)]
pub struct PhotoIndex {
    years: BTreeMap<i32, Months>,
}

impl PhotoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a photo to its day bucket, creating the intermediate levels as
    /// needed. Returns false when the bucket already holds a photo with the
    /// same file name; the bucket is left untouched in that case.
    pub fn insert(&mut self, photo: Photo) -> bool {
        let bucket = self
            .years
            .entry(photo.year())
            .or_default()
            .entry(photo.month())
            .or_default()
            .entry(photo.day())
            .or_default();

        if bucket.contains(&photo) {
            return false;
        }
        bucket.push(photo);
        true
    }

    pub fn years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }

    pub fn months(&self, year: i32) -> Vec<u32> {
        self.years
            .get(&year)
            .map(|months| months.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn days(&self, year: i32, month: u32) -> Vec<u32> {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .map(|days| days.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Photos of one day in insertion order.
    pub fn photos(&self, year: i32, month: u32, day: u32) -> &[Photo] {
        self.years
            .get(&year)
            .and_then(|months| months.get(&month))
            .and_then(|days| days.get(&day))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Number of photos held across all buckets.
    pub fn len(&self) -> usize {
        self.years
            .values()
            .flat_map(|months| months.values())
            .flat_map(|days| days.values())
            .map(Vec::len)
            .sum()
    }

    /// Earliest day with at least one photo.
    pub fn first_day(&self) -> Option<NaiveDate> {
        let (&year, months) = self.years.first_key_value()?;
        let (&month, days) = months.first_key_value()?;
        let (&day, _) = days.first_key_value()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Latest day with at least one photo.
    pub fn last_day(&self) -> Option<NaiveDate> {
        let (&year, months) = self.years.last_key_value()?;
        let (&month, days) = months.last_key_value()?;
        let (&day, _) = days.last_key_value()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}
