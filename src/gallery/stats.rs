//! Counters collected while loading photos, and the averages and maxima
//! derived from them once loading is done.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use super::index::PhotoIndex;
use super::photo::Photo;

#[derive(Debug, Default, Clone, Serialize)]
pub struct Statistics {
    pub total_count: u32,

    pub year_counts: BTreeMap<i32, u32>,
    pub max_year_count: Option<u32>,
    /// Photos per elapsed day of each year.
    pub year_avgs: BTreeMap<i32, f64>,
    pub max_year_avg: Option<f64>,

    pub month_counts: BTreeMap<i32, BTreeMap<u32, u32>>,
    pub max_month_count: Option<u32>,
    /// Photos per elapsed day of each month.
    pub month_avgs: BTreeMap<i32, BTreeMap<u32, f64>>,
    pub max_month_avg: Option<f64>,

    /// Month of year, January at index 0.
    pub moy_counts: [u32; 12],
    pub max_moy_count: Option<u32>,
    /// Day of week, Sunday at index 0.
    pub dow_counts: [u32; 7],
    pub max_dow_count: Option<u32>,
    /// Hour of day.
    pub hod_counts: [u32; 24],
    pub max_hod_count: Option<u32>,

    pub gallery_counts: BTreeMap<String, u32>,
    pub max_gallery_count: Option<u32>,
    pub country_counts: BTreeMap<String, u32>,
    pub max_country_count: Option<u32>,
    pub camera_counts: BTreeMap<String, u32>,
    pub max_camera_count: Option<u32>,
    pub author_counts: BTreeMap<String, u32>,
    pub max_author_count: Option<u32>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one loaded photo row.
    pub fn record(&mut self, photo: &Photo) {
        let (year, month) = (photo.year(), photo.month());

        self.total_count += 1;
        *self.year_counts.entry(year).or_default() += 1;
        *self
            .month_counts
            .entry(year)
            .or_default()
            .entry(month)
            .or_default() += 1;

        self.moy_counts[month as usize - 1] += 1;
        self.dow_counts[photo.weekday() as usize] += 1;
        self.hod_counts[photo.hour() as usize] += 1;

        *self.country_counts.entry(photo.country.clone()).or_default() += 1;
        *self.camera_counts.entry(photo.camera.clone()).or_default() += 1;
        *self.author_counts.entry(photo.author.clone()).or_default() += 1;
    }

    pub fn set_gallery_count(&mut self, gallery: &str, count: u32) {
        self.gallery_counts.insert(gallery.to_string(), count);
    }

    /// Compute averages and maxima. The first and last periods in the data
    /// are only counted from the first photo's day and up to the last
    /// photo's day. Does nothing when no photos were recorded.
    pub fn finish(&mut self, index: &PhotoIndex) {
        if self.total_count == 0 {
            return;
        }
        let (Some(first), Some(last)) = (index.first_day(), index.last_day()) else {
            return;
        };

        for (&year, &count) in &self.year_counts {
            let end = if year == last.year() {
                last.ordinal()
            } else {
                days_in_year(year)
            };
            let days = if year == first.year() {
                end - first.ordinal() + 1
            } else {
                end
            };
            self.year_avgs.insert(year, f64::from(count) / f64::from(days));
        }

        for (&year, months) in &self.month_counts {
            let avgs = self.month_avgs.entry(year).or_default();
            for (&month, &count) in months {
                let end = if year == last.year() && month == last.month() {
                    last.day()
                } else {
                    days_in_month(year, month)
                };
                let days = if year == first.year() && month == first.month() {
                    end - first.day() + 1
                } else {
                    end
                };
                avgs.insert(month, f64::from(count) / f64::from(days));
            }
        }

        self.max_year_count = self.year_counts.values().copied().max();
        self.max_year_avg = max_f64(self.year_avgs.values().copied());
        self.max_month_count = self
            .month_counts
            .values()
            .flat_map(|months| months.values().copied())
            .max();
        self.max_month_avg = max_f64(self.month_avgs.values().flat_map(|m| m.values().copied()));

        self.max_moy_count = self.moy_counts.iter().copied().max();
        self.max_dow_count = self.dow_counts.iter().copied().max();
        self.max_hod_count = self.hod_counts.iter().copied().max();

        self.max_gallery_count = self.gallery_counts.values().copied().max();
        self.max_country_count = self.country_counts.values().copied().max();
        self.max_camera_count = self.camera_counts.values().copied().max();
        self.max_author_count = self.author_counts.values().copied().max();
    }
}

/// Number of days in a calendar month, 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(start), Some(end)) => (end - start).num_days() as u32,
        _ => 0,
    }
}

fn days_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 31).map_or(365, |d| d.ordinal())
}

fn max_f64(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::photo::RawPhoto;

    fn photo(id: u32, file: &str, taken: &str, country: &str) -> Photo {
        Photo::from_raw(
            id,
            RawPhoto {
                file: file.to_string(),
                taken: taken.to_string(),
                country: country.to_string(),
                camera: "Fuji X100".to_string(),
                author: "Ville".to_string(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn build(photos: &[(&str, &str, &str)]) -> Statistics {
        let mut index = PhotoIndex::new();
        let mut stats = Statistics::new();
        for (i, (file, taken, country)) in photos.iter().enumerate() {
            let p = photo(i as u32 + 1, file, taken, country);
            stats.record(&p);
            index.insert(p);
        }
        stats.finish(&index);
        stats
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2020, 2), 29);
        assert_eq!(days_in_month(2019, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2021, 12), 31);
        assert_eq!(days_in_month(2021, 4), 30);
        assert_eq!(days_in_month(2021, 13), 0);
    }

    #[test]
    fn test_partial_single_month() {
        let stats = build(&[("a.jpg", "2020-01-15 10:00:00", "fi"), ("b.jpg", "2020-01-31 10:00:00", "fi")]);
        assert!(approx(stats.month_avgs[&2020][&1], 2.0 / 17.0));
        assert!(approx(stats.year_avgs[&2020], 2.0 / 17.0));
    }

    #[test]
    fn test_averages_across_years() {
        let stats = build(&[
            ("a.jpg", "2019-12-31 22:00:00", "fi"),
            ("b.jpg", "2020-02-10 12:00:00", "fi"),
            ("c.jpg", "2021-03-02 09:00:00", "nl"),
            ("d.jpg", "2021-03-02 10:00:00", "nl"),
        ]);

        // First year starts on its last day.
        assert!(approx(stats.year_avgs[&2019], 1.0));
        // Full leap year.
        assert!(approx(stats.year_avgs[&2020], 1.0 / 366.0));
        // Last year ends on March 2nd.
        assert!(approx(stats.year_avgs[&2021], 2.0 / 61.0));

        assert!(approx(stats.month_avgs[&2019][&12], 1.0));
        assert!(approx(stats.month_avgs[&2020][&2], 1.0 / 29.0));
        assert!(approx(stats.month_avgs[&2021][&3], 1.0));

        assert_eq!(stats.max_year_count, Some(2));
        assert_eq!(stats.max_month_count, Some(2));
        assert!(approx(stats.max_year_avg.unwrap(), 1.0));
        assert!(approx(stats.max_month_avg.unwrap(), 1.0));
    }

    #[test]
    fn test_fixed_size_counters() {
        let stats = build(&[
            ("a.jpg", "2024-03-10 08:15:00", "fi"),
            ("b.jpg", "2024-03-10 08:45:00", "fi"),
            ("c.jpg", "2024-07-04 23:00:00", "fi"),
        ]);
        assert_eq!(stats.moy_counts[2], 2);
        assert_eq!(stats.moy_counts[6], 1);
        assert_eq!(stats.dow_counts[0], 2);
        assert_eq!(stats.dow_counts[4], 1);
        assert_eq!(stats.hod_counts[8], 2);
        assert_eq!(stats.hod_counts[23], 1);
        assert_eq!(stats.max_moy_count, Some(2));
        assert_eq!(stats.max_dow_count, Some(2));
        assert_eq!(stats.max_hod_count, Some(2));
    }

    #[test]
    fn test_category_counts() {
        let stats = build(&[
            ("a.jpg", "2020-01-01 10:00:00", "fi"),
            ("b.jpg", "2020-01-02 10:00:00", "fi"),
            ("c.jpg", "2020-01-03 10:00:00", "nl"),
        ]);
        assert_eq!(stats.country_counts.len(), 2);
        assert_eq!(stats.country_counts["fi"], 2);
        assert_eq!(stats.country_counts["nl"], 1);
        assert_eq!(stats.max_country_count, Some(2));
        assert_eq!(stats.camera_counts["Fuji X100"], 3);
        assert_eq!(stats.max_author_count, Some(3));
    }

    #[test]
    fn test_empty_leaves_everything_unset() {
        let mut stats = Statistics::new();
        stats.set_gallery_count(":none", 0);
        stats.finish(&PhotoIndex::new());
        assert_eq!(stats.total_count, 0);
        assert!(stats.year_avgs.is_empty());
        assert!(stats.month_avgs.is_empty());
        assert_eq!(stats.max_year_count, None);
        assert_eq!(stats.max_year_avg, None);
        assert_eq!(stats.max_month_avg, None);
        assert_eq!(stats.max_hod_count, None);
        assert_eq!(stats.max_gallery_count, None);
        assert_eq!(stats.hod_counts, [0; 24]);
    }

    #[test]
    fn test_counters_include_bucket_duplicates() {
        let stats = build(&[("x.jpg", "2020-05-05 10:00:00", "fi"), ("x.jpg", "2020-05-05 11:00:00", "fi")]);
        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.year_counts[&2020], 2);
    }
}
