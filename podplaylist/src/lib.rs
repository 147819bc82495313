//! # podplaylist - Playlist ordonnée et état persistant de Podcasterator
//!
//! Cette crate fournit :
//! - La playlist ordonnée d'épisodes, avec copie privée de chaque fichier
//! - Les métadonnées du podcast (titre, pochette)
//! - La persistance JSON, réécrite après chaque modification
//! - [`Library`], l'interface de commandes utilisée par l'application
//!
//! # Architecture
//!
//! - **Playlist** : séquence d'[`AudioEntry`], ajout / retrait / échanges / tris
//! - **StateStore** : sauvegarde et relecture avec réconciliation
//! - **Library** : Playlist + métadonnées + StateStore
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use podplaylist::Library;
//!
//! # fn main() -> podplaylist::Result<()> {
//! let mut library = Library::open("/tmp/pod-cache", "/tmp/pod-config/state.json", "My Podcast")?;
//!
//! library.add_file("/music/episode-01.mp3")?;
//! library.add_file("/music/episode-02.mp3")?;
//! library.reverse();
//!
//! for entry in library.entries() {
//!     println!("{} -> {:?}", entry.display_name(), entry.cached_path());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod library;
mod metadata;
mod persistence;
mod playlist;
mod track;

// Réexports publics
pub use error::{Error, Result};
pub use library::{DEFAULT_ARTWORK_SIZE, Library, PathImport, SharedLibrary};
pub use persistence::{PersistedState, StateStore};
pub use playlist::{AddOutcome, FolderImport, Playlist};
pub use track::AudioEntry;
