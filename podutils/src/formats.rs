//! Formats de fichiers reconnus par Podcasterator.
//!
//! Le format d'un fichier est déduit uniquement de son extension, comparée
//! sans tenir compte de la casse. Le contenu n'est jamais inspecté.

use std::path::Path;

/// Extensions audio acceptées dans la playlist.
pub const SUPPORTED_AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "mp4", "m4b"];

/// Extensions d'images acceptées comme pochette.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff", "tif"];

/// Type MIME servi quand l'extension n'est pas dans la table.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Longueur maximale (en caractères) d'un nom affiché dans la liste.
pub const MAX_DISPLAY_LENGTH: usize = 50;

/// Conteneurs MPEG-4 renommés en `.m4a` lors de la copie en cache.
const M4A_ALIASES: &[&str] = &["mp4", "m4b"];

/// Retourne l'extension en minuscules, sans le point.
pub fn extension_of(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn has_extension_in(path: impl AsRef<Path>, table: &[&str]) -> bool {
    extension_of(path).is_some_and(|ext| table.contains(&ext.as_str()))
}

/// Indique si le fichier est un format audio accepté.
pub fn is_supported_audio(path: impl AsRef<Path>) -> bool {
    has_extension_in(path, SUPPORTED_AUDIO_EXTENSIONS)
}

/// Indique si le fichier est une image utilisable comme pochette.
pub fn is_image_file(path: impl AsRef<Path>) -> bool {
    has_extension_in(path, SUPPORTED_IMAGE_EXTENSIONS)
}

/// Table extension → type MIME utilisée par le flux et par le serveur.
pub fn content_type_for(path: impl AsRef<Path>) -> &'static str {
    match extension_of(path).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("m4a" | "mp4" | "m4b") => "audio/mp4",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Nom sous lequel un fichier est stocké dans le cache.
///
/// Les conteneurs `.mp4` et `.m4b` sont mal reconnus par certains clients de
/// podcast : ils reçoivent l'extension `.m4a`. Les autres noms sont inchangés.
///
/// ```
/// assert_eq!(podutils::canonical_audio_name("Book.M4B"), "Book.m4a");
/// assert_eq!(podutils::canonical_audio_name("song.mp3"), "song.mp3");
/// ```
pub fn canonical_audio_name(file_name: &str) -> String {
    let path = Path::new(file_name);
    match extension_of(path) {
        Some(ext) if M4A_ALIASES.contains(&ext.as_str()) => {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{stem}.m4a")
        }
        _ => file_name.to_string(),
    }
}

/// Tronque un nom trop long pour l'affichage, en terminant par `...`.
pub fn truncate_filename(name: &str) -> String {
    if name.chars().count() > MAX_DISPLAY_LENGTH {
        let head: String = name.chars().take(MAX_DISPLAY_LENGTH - 3).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}
