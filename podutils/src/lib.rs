//! Utilitaires partagés par les crates Podcasterator.
//!
//! - [`formats`] : extensions audio et image supportées, table extension → type MIME,
//!   troncature des noms pour l'affichage
//! - [`guess_local_ip`] : adresse IPv4 locale utilisée pour construire l'URL du flux
//!
//! # Examples
//!
//! ```
//! use podutils::{content_type_for, is_supported_audio};
//!
//! assert!(is_supported_audio("episode.MP3"));
//! assert_eq!(content_type_for("episode.m4b"), "audio/mp4");
//! ```
pub mod formats;
mod ip_utils;

pub use formats::{
    DEFAULT_CONTENT_TYPE, MAX_DISPLAY_LENGTH, SUPPORTED_AUDIO_EXTENSIONS,
    SUPPORTED_IMAGE_EXTENSIONS, canonical_audio_name, content_type_for, extension_of,
    is_image_file, is_supported_audio, truncate_filename,
};
pub use ip_utils::{LOCALHOST_FALLBACK, guess_local_ip};
