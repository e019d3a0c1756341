use std::collections::HashMap;
use std::path::Path;

use galleria::admin::{Admin, GalleryFields, Options, PhotoFields};
use galleria::config::{Bounds, Config};
use galleria::db::{Database, PhotoRow};
use galleria::gallery::days_in_month;
use galleria::scanner::{Scanner, FULL_DIR};
use galleria::{Gallery, GalleryError, GalleryFilter, NoInstanceMapping, NO_GALLERY};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn photo(name: &str, taken: &str, author: &str) -> PhotoRow {
    PhotoRow {
        name: name.to_string(),
        taken: taken.to_string(),
        author: author.to_string(),
        country: "fi".to_string(),
        camera: "Fuji X100".to_string(),
        width: 1500,
        height: 1000,
        t_width: 300,
        t_height: 200,
        ..Default::default()
    }
}

fn catalog(path: &Path) {
    let db = Database::open(path).unwrap();
    db.initialize().unwrap();
    db.with_transaction(|db| {
        db.insert_photo(&photo("20140105_1.jpg", "2014-01-05 10:00:00", "Ville"))?;
        db.insert_photo(&photo("20140105_2.jpg", "2014-01-05 11:30:00", "Mei"))?;
        db.insert_photo(&photo("20140310_1.jpg", "2014-03-10 08:15:00", "Mei"))?;
        db.insert_photo(&photo("20150201_1.jpg", "2015-02-01 23:59:00", "Ville"))?;
        Ok(())
    })
    .unwrap();
}

fn open(path: &Path, filter: &GalleryFilter) -> galleria::Result<Gallery> {
    Gallery::open(path, filter, &Config::default().labels(), &NoInstanceMapping)
}

#[test]
fn test_statistics_over_catalog_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gallery.sqlite3");
    catalog(&path);

    let gallery = open(&path, &GalleryFilter::default()).unwrap();
    let stats = gallery.stats();

    assert_eq!(stats.total_count, 4);
    assert_eq!(stats.year_counts[&2014], 3);
    assert_eq!(stats.max_year_count, Some(3));

    // The first year counts from Jan 5, the last one up to Feb 1.
    assert!(approx(stats.year_avgs[&2014], 3.0 / 361.0));
    assert!(approx(stats.year_avgs[&2015], 1.0 / 32.0));
    assert!(approx(stats.month_avgs[&2014][&1], 2.0 / 27.0));
    assert!(approx(stats.month_avgs[&2014][&3], 1.0 / 31.0));
    assert!(approx(stats.month_avgs[&2015][&2], 1.0));
    assert_eq!(stats.max_month_avg, Some(1.0));

    // 2014-01-05 and 2015-02-01 were Sundays.
    assert_eq!(stats.dow_counts[0], 3);
    assert_eq!(stats.dow_counts[1], 1);
    assert_eq!(stats.hod_counts[23], 1);
    assert_eq!(stats.moy_counts.iter().sum::<u32>(), 4);

    assert_eq!(gallery.authors(), vec!["Mei", "Ville"]);
    assert_eq!(gallery.countries()["fi"], "Finland");
    assert_eq!(stats.gallery_counts[NO_GALLERY], 4);
    assert_eq!(days_in_month(2015, 2), 28);
}

#[test]
fn test_day_buckets_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gallery.sqlite3");
    catalog(&path);

    let gallery = open(&path, &GalleryFilter::default().author("Mei")).unwrap();
    assert_eq!(gallery.years(), vec![2014]);
    assert_eq!(gallery.months(2014), vec![1, 3]);
    assert_eq!(gallery.days(2014, 3), vec![10]);
    assert!(gallery.months(2015).is_empty());
    assert!(gallery.photos(2014, 2, 1).is_empty());

    let files: Vec<&str> = gallery.photos(2014, 1, 5).iter().map(|p| p.file.as_str()).collect();
    assert_eq!(files, vec!["20140105_2.jpg"]);
}

#[test]
fn test_instance_selects_gallery() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gallery.sqlite3");
    catalog(&path);
    {
        let db = Database::open(&path).unwrap();
        db.insert_gallery(&galleria::db::GalleryRow {
            name: "lenkun".to_string(),
            title: "Lenkun".to_string(),
            ..Default::default()
        })
        .unwrap();
        db.add_to_gallery("20150201_1.jpg", "lenkun").unwrap();
    }

    let mut instances = HashMap::new();
    instances.insert("lenkun.example.org".to_string(), "lenkun".to_string());
    let filter = GalleryFilter::default().instance("lenkun.example.org");
    let gallery = Gallery::open(&path, &filter, &Config::default().labels(), &instances).unwrap();

    assert_eq!(gallery.name(), "lenkun");
    assert_eq!(gallery.display_title(), "Lenkun");
    assert_eq!(gallery.total_count(), 1);
    assert_eq!(gallery.galleries()[NO_GALLERY], "(None)");
    assert_eq!(gallery.stats().gallery_counts["lenkun"], 1);
    assert_eq!(gallery.stats().gallery_counts[NO_GALLERY], 3);

    let unmapped = GalleryFilter::default().instance("elsewhere");
    let gallery = Gallery::open(&path, &unmapped, &Config::default().labels(), &instances).unwrap();
    assert_eq!(gallery.total_count(), 4);
}

#[test]
fn test_missing_catalog_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = open(&dir.path().join("missing.sqlite3"), &GalleryFilter::default()).unwrap_err();
    assert!(matches!(err, GalleryError::Storage(_)));
    assert!(!dir.path().join("missing.sqlite3").exists());
}

#[test]
fn test_malformed_timestamp_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gallery.sqlite3");
    catalog(&path);
    {
        let db = Database::open(&path).unwrap();
        db.insert_photo(&photo("broken.jpg", "last summer", "Mei")).unwrap();
    }

    let err = open(&path, &GalleryFilter::default()).unwrap_err();
    match err {
        GalleryError::Parse { photo, value } => {
            assert_eq!(photo, "broken.jpg");
            assert_eq!(value, "last summer");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_admin_commands_feed_gallery() {
    let dir = tempfile::tempdir().unwrap();
    let full = dir.path().join(FULL_DIR);
    std::fs::create_dir(&full).unwrap();
    for name in ["a.jpg", "b.jpg"] {
        image::RgbImage::from_pixel(40, 30, image::Rgb([10, 20, 30]))
            .save(full.join(name))
            .unwrap();
    }
    let path = dir.path().join("gallery.sqlite3");

    let mut config = Config {
        db_path: path.clone(),
        root: dir.path().to_path_buf(),
        ..Default::default()
    };
    config.thumbnails.image = Bounds { width: 160, height: 160 };
    let scanner = Scanner::new(&config);
    let labels = config.labels();

    let db = Database::open(&config.db_path).unwrap();
    db.initialize().unwrap();
    db.with_transaction(|db| {
        let admin = Admin::new(db, &scanner, &labels, Options::default());
        let fields = GalleryFields {
            title: Some("Trip".to_string()),
            ..Default::default()
        };
        admin.gallery_add("trip", &fields, &mut Vec::new())?;

        let admin = Admin::new(
            db,
            &scanner,
            &labels,
            Options {
                galleries: vec!["trip".to_string()],
                ..Default::default()
            },
        );
        let photos = PhotoFields {
            author: Some("Mei".to_string()),
            country: Some("nl".to_string()),
            taken: Some("2016-02-29 12:00:00".to_string()),
            ..Default::default()
        };
        admin.add(&admin.select(&[])?, &photos, &mut Vec::new())?;
        Ok(())
    })
    .unwrap();
    drop(db);

    let gallery = open(&path, &GalleryFilter::default().gallery("trip")).unwrap();
    assert_eq!(gallery.total_count(), 2);
    assert_eq!(gallery.display_title(), "Trip");
    assert_eq!(gallery.days(2016, 2), vec![29]);
    assert_eq!(gallery.countries()["nl"], "Netherlands");

    let bucket = gallery.photos(2016, 2, 29);
    assert_eq!(bucket[0].t_height, 200);
    assert!(dir.path().join("i").join("b.jpg").exists());
}
