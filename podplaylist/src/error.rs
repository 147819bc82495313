//! Types d'erreurs pour podplaylist

use std::path::PathBuf;

/// Erreurs de gestion de la playlist
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot copy {path} into the cache: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Artwork error: {0}")]
    Artwork(#[from] podcovers::Error),

    #[error("Persistence error: {0}")]
    Persistence(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Type Result spécialisé pour podplaylist
pub type Result<T> = std::result::Result<T, Error>;
