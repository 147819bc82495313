//! Library : interface de commandes sur la playlist et les métadonnées
//!
//! Chaque commande qui modifie l'état réécrit le fichier d'état avant de
//! rendre la main.

use crate::metadata::PodcastMetadata;
use crate::persistence::{PersistedState, StateStore};
use crate::playlist::{AddOutcome, FolderImport, Playlist};
use crate::track::AudioEntry;
use crate::Result;
use podcovers::{ARTWORK_FILE_NAME, convert_artwork};
use podutils::{is_image_file, is_supported_audio};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Taille par défaut (en pixels) du côté de la pochette
pub const DEFAULT_ARTWORK_SIZE: u32 = 1400;

/// Bibliothèque partagée entre la boucle de commandes et le serveur HTTP
pub type SharedLibrary = Arc<RwLock<Library>>;

/// Résultat de l'import d'un chemin quelconque (fichier, image ou répertoire)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathImport {
    File(AddOutcome),
    Folder(FolderImport),
    Artwork,
    /// Chemin absent ou format non reconnu
    Ignored,
}

/// Playlist, métadonnées et persistance réunies
#[derive(Debug)]
pub struct Library {
    playlist: Playlist,
    metadata: PodcastMetadata,
    store: StateStore,
    artwork_size: u32,
}

impl Library {
    /// Ouvre la bibliothèque et restaure l'état sauvegardé s'il existe
    ///
    /// Le répertoire de cache est créé si nécessaire. Un état absent ou
    /// malformé laisse la bibliothèque vide avec `default_title`.
    pub fn open(
        cache_root: impl AsRef<Path>,
        state_path: impl Into<PathBuf>,
        default_title: impl Into<String>,
    ) -> Result<Self> {
        fs::create_dir_all(cache_root.as_ref())?;
        let cache_root = std::path::absolute(cache_root.as_ref())?;

        let mut library = Self {
            playlist: Playlist::new(&cache_root),
            metadata: PodcastMetadata::new(default_title),
            store: StateStore::new(state_path),
            artwork_size: DEFAULT_ARTWORK_SIZE,
        };

        if let Some(state) = library.store.load() {
            library.restore(state);
        }
        info!(
            "Library opened with {} episode(s), cache at {:?}",
            library.playlist.len(),
            cache_root
        );
        Ok(library)
    }

    /// Taille maximale du côté de la pochette générée
    pub fn with_artwork_size(mut self, size: u32) -> Self {
        self.artwork_size = size;
        self
    }

    pub fn into_shared(self) -> SharedLibrary {
        Arc::new(RwLock::new(self))
    }

    fn restore(&mut self, state: PersistedState) {
        let cache_root = self.playlist.cache_root().to_path_buf();
        let (files, foreign): (Vec<_>, Vec<_>) = state
            .files
            .into_iter()
            .partition(|e| e.cached_path().starts_with(&cache_root));
        if !foreign.is_empty() {
            warn!(
                "Dropped {} saved entries cached outside {:?}",
                foreign.len(),
                cache_root
            );
        }

        self.playlist = Playlist::with_entries(cache_root, files);
        if !state.podcast_name.is_empty() {
            self.metadata.title = state.podcast_name;
        }
        // Le serveur ne publie que la pochette rangée dans le cache
        let artwork = PathBuf::from(state.artwork_path);
        if artwork == self.artwork_target() && artwork.is_file() {
            self.metadata.artwork_path = Some(artwork);
        } else if !artwork.as_os_str().is_empty() {
            warn!("Saved artwork {:?} is missing or outside the cache", artwork);
        }
    }

    /// Photographie sérialisable de l'état courant
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            files: self.playlist.entries().to_vec(),
            podcast_name: self.metadata.title.clone(),
            artwork_path: self
                .metadata
                .artwork_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    fn persist(&self) {
        self.store.save(&self.snapshot());
    }

    fn persist_if(&self, changed: bool) -> bool {
        if changed {
            self.persist();
        }
        changed
    }

    // ========== Lecture ==========

    pub fn entries(&self) -> &[AudioEntry] {
        self.playlist.entries()
    }

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Pochette courante, si son fichier existe
    pub fn artwork_path(&self) -> Option<&Path> {
        self.metadata.existing_artwork()
    }

    pub fn cache_root(&self) -> &Path {
        self.playlist.cache_root()
    }

    /// Emplacement fixe de la pochette générée
    fn artwork_target(&self) -> PathBuf {
        self.cache_root().join(ARTWORK_FILE_NAME)
    }

    // ========== Commandes ==========

    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<AddOutcome> {
        let outcome = self.playlist.add(path)?;
        self.persist_if(matches!(outcome, AddOutcome::Added(_)));
        Ok(outcome)
    }

    pub fn add_folder(&mut self, dir: impl AsRef<Path>) -> FolderImport {
        let report = self.playlist.add_folder(dir);
        self.persist_if(report.added > 0);
        report
    }

    /// Importe un chemin déposé par l'utilisateur
    ///
    /// Un répertoire est parcouru, une image devient la pochette, un fichier
    /// audio est ajouté ; tout le reste est ignoré.
    pub fn add_path(&mut self, path: impl AsRef<Path>) -> Result<PathImport> {
        let path = path.as_ref();
        let Ok(meta) = fs::metadata(path) else {
            return Ok(PathImport::Ignored);
        };

        if meta.is_dir() {
            Ok(PathImport::Folder(self.add_folder(path)))
        } else if is_image_file(path) {
            self.set_artwork(path)?;
            Ok(PathImport::Artwork)
        } else if is_supported_audio(path) {
            Ok(PathImport::File(self.add_file(path)?))
        } else {
            Ok(PathImport::Ignored)
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<AudioEntry> {
        let removed = self.playlist.remove(index);
        self.persist_if(removed.is_some());
        removed
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        let moved = self.playlist.move_up(index);
        self.persist_if(moved)
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        let moved = self.playlist.move_down(index);
        self.persist_if(moved)
    }

    pub fn alphabetize(&mut self) -> bool {
        let sorted = self.playlist.alphabetize();
        self.persist_if(sorted)
    }

    pub fn reverse(&mut self) -> bool {
        let reversed = self.playlist.reverse();
        self.persist_if(reversed)
    }

    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<bool> {
        let renamed = self.playlist.rename(index, new_name)?;
        Ok(self.persist_if(renamed))
    }

    pub fn clear_all(&mut self) -> usize {
        let removed = self.playlist.clear_all();
        self.persist_if(removed > 0);
        removed
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> bool {
        let title = title.into();
        let changed = title != self.metadata.title;
        if changed {
            self.metadata.title = title;
        }
        self.persist_if(changed)
    }

    /// Convertit une image en pochette JPEG carrée dans le cache
    ///
    /// Une image illisible est signalée à l'appelant ; la playlist n'est pas
    /// affectée et l'ancienne pochette est conservée.
    pub fn set_artwork(&mut self, image: impl AsRef<Path>) -> Result<()> {
        let target = self.artwork_target();
        convert_artwork(image.as_ref(), &target, self.artwork_size)?;

        info!("Artwork set from {:?}", image.as_ref());
        self.metadata.artwork_path = Some(target);
        self.persist();
        Ok(())
    }

    pub fn delete_artwork(&mut self) -> bool {
        let Some(path) = self.metadata.artwork_path.take() else {
            return false;
        };
        if let Err(e) = fs::remove_file(&path) {
            warn!("Failed to delete artwork {:?}: {}", path, e);
        }
        self.persist();
        true
    }
}
