//! Types d'erreurs pour podcovers

use std::path::PathBuf;

/// Erreurs de conversion de pochette
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Cannot encode artwork: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Artwork I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type Result spécialisé pour podcovers
pub type Result<T> = std::result::Result<T, Error>;
