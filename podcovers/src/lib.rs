//! # podcovers - Pochettes de podcast
//!
//! Transforme une image quelconque (PNG, JPEG, GIF, BMP, TIFF) en pochette
//! carrée encodée en JPEG, dont le côté ne dépasse pas une taille donnée.
//!
//! ```rust,no_run
//! use podcovers::convert_artwork;
//!
//! # fn main() -> podcovers::Result<()> {
//! convert_artwork("cover.png", "/tmp/cache/artwork.jpg", 1400)?;
//! # Ok(())
//! # }
//! ```

mod artwork;
mod error;

pub use artwork::{ARTWORK_FILE_NAME, JPEG_QUALITY, convert_artwork, ensure_square};
pub use error::{Error, Result};
