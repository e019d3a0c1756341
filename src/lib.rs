//! Personal photo gallery: a SQLite photo catalog, the tools that maintain
//! it, and a read-side view that groups photos by day and computes
//! per-period statistics for the gallery browser.

pub mod admin;
pub mod config;
pub mod db;
pub mod error;
pub mod gallery;
pub mod labels;
pub mod logging;
pub mod scanner;

pub use error::{GalleryError, Result};
pub use gallery::{Gallery, GalleryFilter, InstanceResolver, NoInstanceMapping, NO_GALLERY};
