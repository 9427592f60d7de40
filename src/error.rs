//! Error types for the gallery API.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while listing images, reading state or serving requests.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The configured images directory does not exist.
    #[error("images directory not found: {}", .0.display())]
    ImagesDirMissing(PathBuf),

    /// Directory traversal failed part-way.
    #[error("failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Reading or writing a specific file failed.
    #[error("I/O error on {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure (socket binding, etc).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// State JSON could not be parsed. `origin` names where it came from.
    #[error("invalid image state JSON in {origin}: {source}")]
    StateParse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A store lock was poisoned by a panicking writer.
    #[error("image state lock poisoned")]
    LockPoisoned,

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl GalleryError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GalleryError::File {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
