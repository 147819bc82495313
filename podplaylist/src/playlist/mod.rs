//! Playlist : séquence ordonnée d'épisodes et copies en cache
//!
//! L'ordre du vecteur est la seule représentation de l'ordre des épisodes.
//! Les opérations hors bornes ne font rien et ne sont pas des erreurs.

use crate::track::AudioEntry;
use crate::{Error, Result};
use podutils::{canonical_audio_name, is_supported_audio};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;
use walkdir::WalkDir;

/// Résultat d'un ajout de fichier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Fichier copié et ajouté, avec son identifiant
    Added(String),
    /// Un épisode avec le même chemin d'origine existe déjà
    Duplicate,
    /// Extension audio non supportée, rien n'a été fait
    Unsupported,
}

/// Bilan de l'import d'un répertoire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderImport {
    pub added: usize,
    pub duplicates: usize,
    pub unsupported: usize,
    /// Entrées illisibles ou copies échouées
    pub failed: usize,
}

/// Séquence ordonnée d'[`AudioEntry`] adossée à un répertoire de cache
#[derive(Debug, Clone)]
pub struct Playlist {
    cache_root: PathBuf,
    entries: Vec<AudioEntry>,
}

impl Playlist {
    /// Crée une playlist vide
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self::with_entries(cache_root, Vec::new())
    }

    pub(crate) fn with_entries(cache_root: impl Into<PathBuf>, entries: Vec<AudioEntry>) -> Self {
        Self {
            cache_root: cache_root.into(),
            entries,
        }
    }

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    pub fn entries(&self) -> &[AudioEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AudioEntry> {
        self.entries.get(index)
    }

    /// Vérifie si un fichier d'origine est déjà dans la playlist
    pub fn contains_original(&self, path: &Path) -> bool {
        self.entries.iter().any(|e| e.original_path() == path)
    }

    /// Copie un fichier audio dans le cache et l'ajoute en fin de playlist
    ///
    /// La copie est rangée dans `{cache_root}/{id}/`. Les conteneurs `.mp4`
    /// et `.m4b` sont renommés en `.m4a`. Si la copie échoue, la playlist
    /// n'est pas modifiée.
    pub fn add(&mut self, path: impl AsRef<Path>) -> Result<AddOutcome> {
        let path = path.as_ref();
        if !is_supported_audio(path) {
            return Ok(AddOutcome::Unsupported);
        }

        // Clé de déduplication : chemin résolu (liens et `..` compris)
        let original = fs::canonicalize(path).map_err(|source| Error::Copy {
            path: path.to_path_buf(),
            source,
        })?;
        if self.contains_original(&original) {
            return Ok(AddOutcome::Duplicate);
        }

        let file_name = original
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidName(original.display().to_string()))?;
        let display_name = collapse_dots(&canonical_audio_name(&file_name));

        let id = Uuid::new_v4().to_string();
        let entry_dir = self.cache_root.join(&id);
        let cached_path = entry_dir.join(&display_name);

        let copied = fs::create_dir_all(&entry_dir).and_then(|_| fs::copy(&original, &cached_path));
        if let Err(source) = copied {
            let _ = fs::remove_dir_all(&entry_dir);
            return Err(Error::Copy {
                path: original,
                source,
            });
        }

        debug!("Cached {:?} as {:?}", original, cached_path);
        self.entries.push(AudioEntry::new(
            id.clone(),
            original,
            cached_path,
            display_name,
        ));
        Ok(AddOutcome::Added(id))
    }

    /// Ajoute récursivement tous les fichiers audio d'un répertoire
    ///
    /// Les fichiers sont parcourus par ordre alphabétique. Une entrée
    /// illisible ou une copie ratée est comptée puis ignorée : l'import
    /// n'est jamais interrompu.
    pub fn add_folder(&mut self, dir: impl AsRef<Path>) -> FolderImport {
        let mut report = FolderImport::default();

        for item in WalkDir::new(dir.as_ref()).sort_by_file_name() {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    report.failed += 1;
                    continue;
                }
            };
            if !item.file_type().is_file() {
                continue;
            }

            match self.add(item.path()) {
                Ok(AddOutcome::Added(_)) => report.added += 1,
                Ok(AddOutcome::Duplicate) => report.duplicates += 1,
                Ok(AddOutcome::Unsupported) => report.unsupported += 1,
                Err(e) => {
                    warn!("Skipping {:?}: {}", item.path(), e);
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Retire un épisode et supprime sa copie en cache
    ///
    /// La suppression sur disque est faite au mieux : un échec est journalisé
    /// mais l'épisode est retiré quand même.
    pub fn remove(&mut self, index: usize) -> Option<AudioEntry> {
        if index >= self.entries.len() {
            return None;
        }
        let entry = self.entries.remove(index);
        discard_cached_file(&entry);
        Some(entry)
    }

    /// Échange l'épisode avec son prédécesseur
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.entries.len() {
            return false;
        }
        self.entries.swap(index, index - 1);
        true
    }

    /// Échange l'épisode avec son successeur
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.entries.len().saturating_sub(1) {
            return false;
        }
        self.entries.swap(index, index + 1);
        true
    }

    /// Trie par nom affiché, sans tenir compte de la casse (tri stable)
    pub fn alphabetize(&mut self) -> bool {
        if self.entries.len() <= 1 {
            return false;
        }
        self.entries
            .sort_by_cached_key(|e| e.display_name().to_lowercase());
        true
    }

    /// Inverse l'ordre de la playlist
    pub fn reverse(&mut self) -> bool {
        if self.entries.len() <= 1 {
            return false;
        }
        self.entries.reverse();
        true
    }

    /// Renomme la copie en cache d'un épisode
    ///
    /// Si le nouveau nom n'a pas d'extension audio, l'extension actuelle est
    /// ajoutée. Retourne `Ok(false)` quand il n'y a rien à faire (index hors
    /// bornes, nom vide ou identique). En cas d'échec du renommage sur disque,
    /// l'épisode reste inchangé.
    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<bool> {
        let Some(entry) = self.entries.get_mut(index) else {
            return Ok(false);
        };

        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Ok(false);
        }
        if new_name.contains(['/', '\\']) {
            return Err(Error::InvalidName(new_name.to_string()));
        }

        let mut new_name = new_name.to_string();
        if !is_supported_audio(&new_name) {
            if let Some(ext) = Path::new(entry.display_name()).extension() {
                new_name = format!("{}.{}", new_name, ext.to_string_lossy());
            }
        }
        // Après l'ajout de l'extension : "Vol." donnerait sinon "Vol..mp3"
        let new_name = collapse_dots(&new_name);
        if new_name == entry.display_name() {
            return Ok(false);
        }

        let from = entry.cached_path().to_path_buf();
        let to = from.with_file_name(&new_name);
        fs::rename(&from, &to).map_err(|source| Error::Rename {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;

        debug!("Renamed {:?} to {:?}", from, to);
        entry.set_cached_name(to, new_name);
        Ok(true)
    }

    /// Vide la playlist et supprime toutes les copies en cache
    pub fn clear_all(&mut self) -> usize {
        let removed = self.entries.len();
        for entry in self.entries.drain(..) {
            discard_cached_file(&entry);
        }
        removed
    }
}

/// Supprime la copie en cache et son répertoire s'il est vide
fn discard_cached_file(entry: &AudioEntry) {
    let path = entry.cached_path();
    if let Err(e) = fs::remove_file(path) {
        warn!("Failed to delete cached file {:?}: {}", path, e);
    }
    if let Some(parent) = path.parent() {
        let _ = fs::remove_dir(parent);
    }
}

/// Réduit les suites de points à un seul point.
///
/// Le serveur refuse tout nom contenant `..` ; un tel nom ne pourrait jamais
/// être téléchargé.
fn collapse_dots(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '.' && out.ends_with('.') {
            continue;
        }
        out.push(c);
    }
    out
}
