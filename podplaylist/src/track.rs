//! AudioEntry : un fichier audio suivi par la playlist

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Un épisode de la playlist
///
/// Seule la copie privée (`cached_path`) est servie ou modifiée ; le fichier
/// d'origine n'est jamais touché.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioEntry {
    id: String,
    original_path: PathBuf,
    #[serde(alias = "temp_path")]
    cached_path: PathBuf,
    display_name: String,
}

impl AudioEntry {
    pub(crate) fn new(
        id: String,
        original_path: PathBuf,
        cached_path: PathBuf,
        display_name: String,
    ) -> Self {
        Self {
            id,
            original_path,
            cached_path,
            display_name,
        }
    }

    /// Identifiant unique, attribué à l'ajout
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Chemin du fichier choisi par l'utilisateur (clé de déduplication)
    pub fn original_path(&self) -> &Path {
        &self.original_path
    }

    /// Chemin de la copie dans le répertoire de cache
    pub fn cached_path(&self) -> &Path {
        &self.cached_path
    }

    /// Nom affiché et publié dans le flux
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Indique si la copie en cache existe encore sur le disque
    pub fn is_cached(&self) -> bool {
        self.cached_path.is_file()
    }

    pub(crate) fn set_cached_name(&mut self, cached_path: PathBuf, display_name: String) {
        self.cached_path = cached_path;
        self.display_name = display_name;
    }
}
