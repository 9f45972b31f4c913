/// Local persistence for the video gallery
///
/// Keeps the artifact collection and the last daily-refresh marker as two
/// JSON files under the platform app-data directory. Reads never fail:
/// missing or malformed data is replaced by the built-in sample collection.
use std::path::PathBuf;
use thiserror::Error;

mod artifact;
pub use artifact::*;

mod disk;
pub use disk::*;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Per-user data directory for gallery files
pub fn app_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| std::env::temp_dir());
    base.join("reverie")
}
