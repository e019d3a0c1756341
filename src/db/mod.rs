mod schema;
pub mod galleries;
pub mod photos;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

pub use galleries::GalleryRow;
pub use photos::PhotoRow;
pub use schema::{SCHEMA, SCHEMA_VERSION};

/// Read-write handle on the gallery catalog, used by the admin commands.
/// The statistics side reads through [`crate::gallery::Gallery`] instead.
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Could not open database {}", path.display()))?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    /// Create missing tables and record the schema version.
    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        if self.schema_version()?.is_none() {
            info!("Initializing database schema version {}", SCHEMA_VERSION);
            self.conn
                .execute("INSERT INTO schema_info (version) VALUES (?)", [SCHEMA_VERSION])?;
        }
        Ok(())
    }

    pub fn schema_version(&self) -> Result<Option<i64>> {
        let version = self
            .conn
            .query_row("SELECT MAX(version) FROM schema_info", [], |row| row.get(0))?;
        Ok(version)
    }

    /// Run `f` inside one transaction, committing only if it succeeds.
    pub fn with_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
