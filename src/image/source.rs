//! Where a raster comes from: an uploaded file, raw bytes, a URL or the live
//! drawing surface.
use super::io::{decode_rgba, Decoded, ImageInfo};
use crate::canvas::Canvas;
use crate::error::{Error, Result};
use log::debug;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub enum RasterSource {
    File(PathBuf),
    Bytes { name: String, bytes: Vec<u8> },
    Url(String),
}

impl RasterSource {
    /// Interpret a location string: `http(s)://` becomes a URL fetch, anything
    /// else a file path.
    pub fn from_location(location: &str) -> Self {
        if is_remote(location) {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// Fetch and decode the source into an RGBA raster.
    pub async fn load(&self) -> Result<Decoded> {
        match self {
            Self::File(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| Error::io(path, e))?;
                debug!("RasterSource: read {} bytes from {}", bytes.len(), path.display());
                decode_rgba(&bytes, &path.display().to_string())
            }
            Self::Bytes { name, bytes } => decode_rgba(bytes, name),
            Self::Url(url) => {
                let bytes = fetch_bytes(url).await?;
                debug!("RasterSource: fetched {} bytes from {url}", bytes.len());
                decode_rgba(&bytes, url)
            }
        }
    }
}

/// Snapshot the drawing surface as a decoded raster.
pub fn from_canvas(canvas: &Canvas) -> Decoded {
    let image = canvas.image().clone();
    let info = ImageInfo {
        byte_len: image.as_bytes().len(),
        width: image.width(),
        height: image.height(),
        format: "RGBA".to_string(),
    };
    Decoded { image, info }
}

pub(crate) fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

pub(crate) async fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let fetch_err = |e: reqwest::Error| Error::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    };
    let response = reqwest::get(url)
        .await
        .map_err(fetch_err)?
        .error_for_status()
        .map_err(fetch_err)?;
    let bytes = response.bytes().await.map_err(fetch_err)?;
    Ok(bytes.to_vec())
}
