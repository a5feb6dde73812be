//! Canvas export: BMP through the in-crate encoder, PNG and JPEG through the
//! `image` codecs.
use crate::bmp::encode_bmp;
use crate::error::{Error, Result};
use crate::image::io::ensure_parent_dir;
use crate::image::{ImageView, RgbaView};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// JPEG quality used for exports.
pub const JPEG_QUALITY: u8 = 95;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ExportFormat {
    Bmp,
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Bmp => "figure.bmp",
            ExportFormat::Png => "figure.png",
            ExportFormat::Jpeg => "figure.jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Bmp => "image/bmp",
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bmp" => Ok(ExportFormat::Bmp),
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for ExportFormat {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Bmp => "bmp",
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        };
        f.write_str(name)
    }
}

/// Encoded file ready to be written or offered for download.
#[derive(Clone, Debug)]
pub struct ExportedFile {
    pub format: ExportFormat,
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

/// Encode an RGBA view in the requested format.
pub fn export_image(src: RgbaView<'_>, format: ExportFormat) -> Result<ExportedFile> {
    let bytes = match format {
        ExportFormat::Bmp => encode_bmp(src)?,
        ExportFormat::Png => encode_png(src)?,
        ExportFormat::Jpeg => encode_jpeg(src)?,
    };
    Ok(ExportedFile {
        format,
        file_name: format.file_name(),
        bytes,
    })
}

/// Encode and write into `dir` under the fixed file name. Returns the path.
pub fn export_to_dir(src: RgbaView<'_>, format: ExportFormat, dir: &Path) -> Result<PathBuf> {
    let file = export_image(src, format)?;
    let path = dir.join(file.file_name);
    ensure_parent_dir(&path)?;
    std::fs::write(&path, &file.bytes).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

fn packed_rgba(src: RgbaView<'_>) -> Vec<u8> {
    match src.as_slice() {
        Some(slice) => slice.to_vec(),
        None => src.rows().flatten().copied().collect(),
    }
}

fn encode_png(src: RgbaView<'_>) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            &packed_rgba(src),
            src.w as u32,
            src.h as u32,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(out)
}

fn encode_jpeg(src: RgbaView<'_>) -> Result<Vec<u8>> {
    let rgb: Vec<u8> = src
        .rows()
        .flat_map(|row| row.chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]))
        .collect();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode(&rgb, src.w as u32, src.h as u32, ExtendedColorType::Rgb8)
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(out)
}
