//! galleria
//!
//! Command-line tool for the photo gallery catalog:
//! - Add, update and remove photos found under `full/`
//! - Manage galleries and their members
//! - Report the day-bucketed view and statistics of a gallery

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;

use galleria::admin::{report, Admin, GalleryFields, Options, PhotoFields};
use galleria::config::Config;
use galleria::db::Database;
use galleria::gallery::{Gallery, GalleryFilter};
use galleria::logging;
use galleria::scanner::Scanner;

#[derive(Parser)]
#[command(name = "galleria")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage the photo gallery catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (default: $GALLERIA_CONFIG or the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Don't change anything, just show what would be done
    #[arg(long, global = true)]
    simulate: bool,

    /// Allow deleting galleries and acting on all photos at once
    #[arg(long, global = true)]
    force: bool,

    /// Galleries to use (comma-separated or repeated)
    #[arg(short, long, value_delimiter = ',', global = true)]
    gallery: Vec<String>,
}

#[derive(Args)]
struct PhotoArgs {
    /// Photos in full/ (default: all of them)
    photos: Vec<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Country code, e.g. fi
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    place: Option<String>,
    #[arg(long)]
    author: Option<String>,
    /// Capture time (YYYY-MM-DD HH:MM:SS) when the EXIF data has none
    #[arg(long)]
    taken: Option<String>,
}

impl PhotoArgs {
    fn fields(&self) -> PhotoFields {
        PhotoFields {
            title: self.title.clone(),
            description: self.description.clone(),
            country: self.country.clone(),
            place: self.place.clone(),
            author: self.author.clone(),
            taken: self.taken.clone(),
        }
    }
}

#[derive(Args)]
struct GalleryArgs {
    /// Gallery name
    name: String,
    /// Rename the gallery
    #[arg(long)]
    rename: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Start of the gallery's timeline (YYYY-MM-DD HH:MM:SS)
    #[arg(long)]
    epoch: Option<String>,
}

impl GalleryArgs {
    fn fields(&self) -> GalleryFields {
        GalleryFields {
            name: self.rename.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            epoch: self.epoch.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,

    /// Add new photos from full/, creating thumbnails if missing
    Add(PhotoArgs),

    /// Re-read EXIF data and update the properties of photos
    Update(PhotoArgs),

    /// Recreate thumbnails and store their dimensions
    Thumbs {
        photos: Vec<String>,
    },

    /// Remove photos from the database
    Rm {
        photos: Vec<String>,
    },

    /// Show the properties of photos
    Show {
        photos: Vec<String>,
    },

    /// Create a gallery
    #[command(name = "g-add")]
    GalleryAdd(GalleryArgs),

    /// Update the properties of a gallery
    #[command(name = "g-update")]
    GalleryUpdate(GalleryArgs),

    /// Delete galleries (requires --force)
    #[command(name = "g-rm")]
    GalleryRm {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show gallery properties (default: all galleries)
    #[command(name = "g-show")]
    GalleryShow {
        names: Vec<String>,
    },

    /// List the photos of galleries; ":none" lists photos in no gallery
    #[command(name = "g-ls")]
    GalleryLs {
        names: Vec<String>,
    },

    /// Add photos to the --gallery galleries
    #[command(name = "to-g")]
    ToGallery {
        photos: Vec<String>,
    },

    /// Remove photos from the --gallery galleries
    #[command(name = "from-g")]
    FromGallery {
        photos: Vec<String>,
    },

    /// Print photos per day with totals, or the statistics as JSON
    Report {
        /// Country code (SQL LIKE pattern)
        #[arg(long)]
        country: Option<String>,
        /// Camera name (SQL LIKE pattern)
        #[arg(long)]
        camera: Option<String>,
        /// Author (SQL LIKE pattern)
        #[arg(long)]
        author: Option<String>,
        /// Instance name mapped to a gallery by the config
        #[arg(long)]
        instance: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Commands::Report {
        country,
        camera,
        author,
        instance,
        json,
    } = &cli.command
    {
        let filter = GalleryFilter {
            instance: instance.clone(),
            gallery: cli.gallery.first().cloned(),
            country: country.clone(),
            camera: camera.clone(),
            author: author.clone(),
        };
        let resolver: &HashMap<String, String> = &config.instances;
        let gallery = Gallery::open(&config.db_path, &filter, &config.labels(), resolver)?;
        if *json {
            report::write_json(&gallery, &mut out)?;
        } else {
            report::write_text(&gallery, &mut out)?;
        }
        return Ok(());
    }

    let db = Database::open(&config.db_path)?;
    db.initialize()?;

    let scanner = Scanner::new(&config);
    let labels = config.labels();
    let options = Options {
        simulate: cli.simulate,
        force: cli.force,
        galleries: cli.gallery.clone(),
    };

    db.with_transaction(|db| {
        let admin = Admin::new(db, &scanner, &labels, options);
        run(&admin, &cli.command, &mut out)
    })?;

    out.flush()?;
    Ok(())
}

fn run(admin: &Admin, command: &Commands, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Init => {
            writeln!(out, "Database ready.")?;
        }
        Commands::Add(args) => {
            let selection = admin.select(&args.photos)?;
            admin.add(&selection, &args.fields(), out)?;
        }
        Commands::Update(args) => {
            let selection = admin.select(&args.photos)?;
            admin.update(&selection, &args.fields(), out)?;
        }
        Commands::Thumbs { photos } => {
            admin.thumbs(&admin.select(photos)?, out)?;
        }
        Commands::Rm { photos } => {
            admin.rm(&admin.select(photos)?, out)?;
        }
        Commands::Show { photos } => {
            admin.show(&admin.select(photos)?, out)?;
        }
        Commands::GalleryAdd(args) => {
            admin.gallery_add(&args.name, &args.fields(), out)?;
        }
        Commands::GalleryUpdate(args) => {
            admin.gallery_update(&args.name, &args.fields(), out)?;
        }
        Commands::GalleryRm { names } => {
            admin.gallery_rm(names, out)?;
        }
        Commands::GalleryShow { names } => {
            admin.gallery_show(names, out)?;
        }
        Commands::GalleryLs { names } => {
            admin.gallery_ls(names, out)?;
        }
        Commands::ToGallery { photos } => {
            admin.to_galleries(&admin.select(photos)?, out)?;
        }
        Commands::FromGallery { photos } => {
            admin.from_galleries(&admin.select(photos)?, out)?;
        }
        Commands::Report { .. } => {}
    }
    if admin.options().simulate {
        writeln!(out, "(simulated, nothing was changed)")?;
    }
    Ok(())
}
