//! Error types for the gallery aggregation engine.

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    /// The catalog could not be opened or queried.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A stored `taken` timestamp did not match `YYYY-MM-DD HH:MM:SS`.
    #[error("malformed timestamp {value:?} for photo {photo}")]
    Parse { photo: String, value: String },
}

pub type Result<T> = std::result::Result<T, GalleryError>;
