//! I/O helpers for RGBA images and JSON.
//!
//! - `decode_rgba`: decode PNG/JPEG/BMP/GIF bytes into an owned RGBA raster.
//! - `load_rgba_image`: read and decode a file from disk.
//! - `save_rgba_png`: write a raster to a PNG file.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::RasterImage;
use crate::error::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Decoded raster plus what was learned about the encoded bytes.
#[derive(Clone, Debug)]
pub struct Decoded {
    pub image: RasterImage,
    pub info: ImageInfo,
}

/// Facts about a source image, shown next to the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub byte_len: usize,
    pub width: usize,
    pub height: usize,
    /// Upper-case format name such as `PNG`, or `N/A` when unknown.
    pub format: String,
}

impl ImageInfo {
    pub fn size_kb(&self) -> f64 {
        self.byte_len as f64 / 1024.0
    }
}

/// Decode encoded image bytes into RGBA. `source_name` only labels errors.
pub fn decode_rgba(bytes: &[u8], source_name: &str) -> Result<Decoded> {
    let format = image::guess_format(bytes)
        .ok()
        .and_then(|f| f.extensions_str().first().map(|ext| ext.to_uppercase()))
        .unwrap_or_else(|| "N/A".to_string());
    let dynamic = image::load_from_memory(bytes).map_err(|e| Error::Decode {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })?;
    let image = RasterImage::from_image_buffer(dynamic.into_rgba8());
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::Decode {
            source_name: source_name.to_string(),
            reason: "image has no pixels".to_string(),
        });
    }
    let info = ImageInfo {
        byte_len: bytes.len(),
        width: image.width(),
        height: image.height(),
        format,
    };
    Ok(Decoded { image, info })
}

/// Load an image from disk and convert to RGBA.
pub fn load_rgba_image(path: &Path) -> Result<Decoded> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    decode_rgba(&bytes, &path.display().to_string())
}

/// Save a raster as PNG.
pub fn save_rgba_png(image: &RasterImage, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    image
        .to_image_buffer()
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| Error::Encode(format!("failed to save {}: {e}", path.display())))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::Encode(format!("JSON for {}: {e}", path.display())))?;
    fs::write(path, json).map_err(|e| Error::io(path, e))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }
    Ok(())
}
