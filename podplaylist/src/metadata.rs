//! Métadonnées du podcast, indépendantes de la playlist

use std::path::{Path, PathBuf};

/// Titre et pochette du podcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodcastMetadata {
    pub title: String,
    pub artwork_path: Option<PathBuf>,
}

impl PodcastMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artwork_path: None,
        }
    }

    /// Chemin de la pochette, seulement si le fichier existe encore
    pub fn existing_artwork(&self) -> Option<&Path> {
        self.artwork_path.as_deref().filter(|p| p.is_file())
    }
}
