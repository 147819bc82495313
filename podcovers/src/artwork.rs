use crate::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage, imageops::FilterType};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

/// Nom du fichier de pochette dans le répertoire de cache.
pub const ARTWORK_FILE_NAME: &str = "artwork.jpg";

/// Qualité JPEG des pochettes générées.
pub const JPEG_QUALITY: u8 = 90;

/// Met l'image au carré, centrée sur un fond noir.
///
/// Le plus grand côté est ramené à `max_size` si nécessaire ; une image plus
/// petite n'est jamais agrandie.
pub fn ensure_square(img: &DynamicImage, max_size: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let longest = width.max(height);
    let side = longest.min(max_size).max(1);

    let resized = if longest > side {
        img.resize(side, side, FilterType::Lanczos3)
    } else {
        img.clone()
    };

    let mut square = RgbImage::new(side, side);
    let x = (side - resized.width().min(side)) / 2;
    let y = (side - resized.height().min(side)) / 2;
    image::imageops::overlay(&mut square, &resized.to_rgb8(), x.into(), y.into());

    DynamicImage::ImageRgb8(square)
}

/// Décode `src`, la met au carré (voir [`ensure_square`]) et l'écrit en JPEG dans `dst`.
///
/// Le fichier est d'abord écrit à côté de `dst` puis renommé : une
/// conversion ratée laisse l'ancienne pochette intacte.
pub fn convert_artwork(src: impl AsRef<Path>, dst: impl AsRef<Path>, max_size: u32) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());

    let img = image::open(src).map_err(|source| Error::Decode {
        path: src.to_path_buf(),
        source,
    })?;
    debug!(
        "Decoded artwork {:?} ({}x{})",
        src,
        img.width(),
        img.height()
    );

    let square = ensure_square(&img, max_size);

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = dst.with_extension("jpg.part");
    match write_jpeg(&square, &tmp) {
        Ok(()) => {
            fs::rename(&tmp, dst)?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn write_jpeg(img: &DynamicImage, path: &Path) -> Result<()> {
    let file = fs::File::create(path)?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
    img.write_with_encoder(encoder).map_err(Error::Encode)
}
