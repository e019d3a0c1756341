//! Gallery commands: g-add, g-update, g-rm, g-show, g-ls.

use anyhow::{bail, Result};
use std::io::Write;
use tracing::info;

use super::Admin;
use crate::db::GalleryRow;
use crate::gallery::photo::parse_timestamp;
use crate::gallery::NO_GALLERY;

/// Gallery properties given on the command line.
#[derive(Debug, Clone, Default)]
pub struct GalleryFields {
    /// New name, for renames.
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub epoch: Option<String>,
}

impl GalleryFields {
    fn apply(&self, row: &mut GalleryRow) -> Result<()> {
        if let Some(name) = &self.name {
            row.name = name.clone();
        }
        if let Some(title) = &self.title {
            row.title = title.clone();
        }
        if let Some(description) = &self.description {
            row.description = description.clone();
        }
        if let Some(epoch) = &self.epoch {
            if !epoch.is_empty() && parse_timestamp(epoch, true).is_none() {
                bail!("Invalid epoch {:?}, expected YYYY-MM-DD HH:MM:SS", epoch);
            }
            row.epoch = epoch.clone();
        }
        Ok(())
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name == NO_GALLERY {
        bail!("{:?} cannot be used as a gallery name.", name);
    }
    Ok(())
}

impl Admin<'_> {
    pub fn gallery_add(&self, name: &str, fields: &GalleryFields, out: &mut dyn Write) -> Result<()> {
        check_name(name)?;
        if self.db.get_gallery(name)?.is_some() {
            bail!("Gallery {} already exists.", name);
        }

        let mut row = GalleryRow {
            name: name.to_string(),
            ..Default::default()
        };
        fields.apply(&mut row)?;
        row.name = name.to_string();

        info!("Creating gallery {}", name);
        if !self.options.simulate {
            self.db.insert_gallery(&row)?;
        }
        writeln!(out, "Gallery {} created.", name)?;
        Ok(())
    }

    pub fn gallery_update(&self, name: &str, fields: &GalleryFields, out: &mut dyn Write) -> Result<()> {
        let Some(mut row) = self.db.get_gallery(name)? else {
            bail!("Gallery {} does not exist.", name);
        };
        fields.apply(&mut row)?;
        if row.name != name {
            check_name(&row.name)?;
            if self.db.get_gallery(&row.name)?.is_some() {
                bail!("Gallery {} already exists.", row.name);
            }
        }

        info!("Updating gallery {}", name);
        if !self.options.simulate {
            self.db.update_gallery(name, &row)?;
        }
        if row.name == name {
            writeln!(out, "Gallery {} updated.", name)?;
        } else {
            writeln!(out, "Gallery {} => {} updated.", name, row.name)?;
        }
        Ok(())
    }

    /// Delete galleries and their memberships. Needs `--force`.
    pub fn gallery_rm(&self, names: &[String], out: &mut dyn Write) -> Result<usize> {
        if !self.options.force {
            bail!("Deleting galleries requires --force.");
        }

        let mut count = 0;
        for name in names {
            info!("Deleting gallery {}", name);
            let existed = if self.options.simulate {
                self.db.get_gallery(name)?.is_some()
            } else {
                self.db.delete_gallery(name)?
            };
            if existed {
                writeln!(out, "Gallery {} deleted.", name)?;
                count += 1;
            } else {
                writeln!(out, "Gallery {} does not exist.", name)?;
            }
        }
        Ok(count)
    }

    /// Print gallery properties, all galleries when none is named.
    pub fn gallery_show(&self, names: &[String], out: &mut dyn Write) -> Result<()> {
        for gallery in self.db.get_galleries(names)? {
            writeln!(out, "{}", gallery.name)?;
            writeln!(out, "  Title:       {}", gallery.title)?;
            writeln!(out, "  Description: {}", gallery.description)?;
            writeln!(out, "  Epoch:       {}", gallery.epoch)?;
            writeln!(out)?;
        }
        Ok(())
    }

    /// List the member photos of each gallery, all galleries when none is
    /// named. `:none` lists the photos outside every gallery.
    pub fn gallery_ls(&self, names: &[String], out: &mut dyn Write) -> Result<()> {
        let mut names = if names.is_empty() {
            self.db
                .get_galleries(&[])?
                .into_iter()
                .map(|gallery| gallery.name)
                .collect()
        } else {
            names.to_vec()
        };
        names.sort_by_key(|name| name.to_lowercase());

        for name in names {
            let photos = if name == NO_GALLERY {
                self.db.photos_without_gallery()?
            } else {
                self.db.gallery_photos(&name)?
            };
            writeln!(out, "{}", name)?;
            for photo in photos {
                writeln!(out, "  {}", photo)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::tests::Fixture;
    use crate::admin::Options;
    use crate::db::PhotoRow;

    fn forced() -> Options {
        Options {
            force: true,
            ..Default::default()
        }
    }

    fn fields(title: &str, epoch: &str) -> GalleryFields {
        GalleryFields {
            title: Some(title.to_string()),
            epoch: Some(epoch.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_and_show() {
        let fx = Fixture::new(&[]);
        let admin = fx.admin(Options::default());

        admin
            .gallery_add("lenkun", &fields("Lenkun", "2012-01-06T02:52:00"), &mut Vec::new())
            .unwrap();
        assert!(admin.gallery_add("lenkun", &GalleryFields::default(), &mut Vec::new()).is_err());
        assert!(admin.gallery_add(NO_GALLERY, &GalleryFields::default(), &mut Vec::new()).is_err());

        let mut out = Vec::new();
        admin.gallery_show(&[], &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "lenkun\n  Title:       Lenkun\n  Description: \n  Epoch:       2012-01-06T02:52:00\n\n"
        );
    }

    #[test]
    fn test_invalid_epoch_is_rejected() {
        let fx = Fixture::new(&[]);
        let admin = fx.admin(Options::default());
        assert!(admin.gallery_add("trip", &fields("Trip", "soon"), &mut Vec::new()).is_err());
        assert!(admin.gallery_add("trip", &fields("Trip", ""), &mut Vec::new()).is_ok());
    }

    #[test]
    fn test_update_renames_gallery() {
        let fx = Fixture::new(&[]);
        fx.gallery("trip");
        fx.db
            .insert_photo(&PhotoRow {
                name: "a.jpg".to_string(),
                taken: "2014-01-05 10:20:30".to_string(),
                ..Default::default()
            })
            .unwrap();
        fx.db.add_to_gallery("a.jpg", "trip").unwrap();

        let admin = fx.admin(Options::default());
        let rename = GalleryFields {
            name: Some("holiday".to_string()),
            ..Default::default()
        };
        let mut out = Vec::new();
        admin.gallery_update("trip", &rename, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Gallery trip => holiday updated.\n");
        assert!(fx.db.get_gallery("trip").unwrap().is_none());
        assert_eq!(fx.db.gallery_photos("holiday").unwrap(), vec!["a.jpg"]);
        assert!(admin.gallery_update("trip", &rename, &mut Vec::new()).is_err());
    }

    #[test]
    fn test_rm_requires_force() {
        let fx = Fixture::new(&[]);
        fx.gallery("trip");
        let names = vec!["trip".to_string()];

        assert!(fx.admin(Options::default()).gallery_rm(&names, &mut Vec::new()).is_err());
        assert_eq!(fx.admin(forced()).gallery_rm(&names, &mut Vec::new()).unwrap(), 1);
        assert!(fx.db.get_gallery("trip").unwrap().is_none());
    }

    #[test]
    fn test_ls_lists_members_and_ungrouped() {
        let fx = Fixture::new(&[]);
        fx.gallery("b");
        fx.gallery("A");
        for name in ["x.jpg", "y.jpg"] {
            fx.db
                .insert_photo(&PhotoRow {
                    name: name.to_string(),
                    taken: "2014-01-05 10:20:30".to_string(),
                    ..Default::default()
                })
                .unwrap();
        }
        fx.db.add_to_gallery("x.jpg", "b").unwrap();

        let admin = fx.admin(Options::default());
        let mut out = Vec::new();
        admin.gallery_ls(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "A\nb\n  x.jpg\n");

        let mut out = Vec::new();
        admin.gallery_ls(&[NO_GALLERY.to_string()], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ":none\n  y.jpg\n");
    }
}
