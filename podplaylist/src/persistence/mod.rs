//! Persistance JSON de l'état (playlist + métadonnées du podcast)
//!
//! L'état est réécrit en entier après chaque modification. Le fichier est
//! d'abord écrit à côté de la cible puis renommé, pour qu'un arrêt brutal
//! ne laisse jamais un fichier tronqué.

use crate::Result;
use crate::track::AudioEntry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Enregistrement durable de la playlist et des métadonnées
///
/// Un titre ou une pochette vides signifient « non renseigné ».
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub files: Vec<AudioEntry>,
    #[serde(default)]
    pub podcast_name: String,
    #[serde(default)]
    pub artwork_path: String,
}

/// Lecture et écriture de l'état dans un fichier JSON
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Écrit l'état et remonte l'erreur éventuelle
    pub fn try_save(&self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(state)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Écrit l'état ; un échec est journalisé et ignoré
    ///
    /// L'état en mémoire reste la référence pour la session en cours, la
    /// prochaine modification retentera l'écriture.
    pub fn save(&self, state: &PersistedState) {
        if let Err(e) = self.try_save(state) {
            warn!("Failed to save state to {:?}: {}", self.path, e);
        }
    }

    /// Relit l'état depuis le disque
    ///
    /// Retourne `None` si le fichier est absent, illisible ou malformé. Les
    /// épisodes dont la copie en cache a disparu sont écartés.
    pub fn load(&self) -> Option<PersistedState> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No saved state at {:?}", self.path);
                return None;
            }
            Err(e) => {
                warn!("Cannot read state file {:?}: {}", self.path, e);
                return None;
            }
        };

        let mut state: PersistedState = match serde_json::from_slice(&data) {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring malformed state file {:?}: {}", self.path, e);
                return None;
            }
        };

        let before = state.files.len();
        state.files.retain(AudioEntry::is_cached);
        let dropped = before - state.files.len();
        if dropped > 0 {
            debug!("Dropped {} entries whose cached file is missing", dropped);
        }

        Some(state)
    }
}
