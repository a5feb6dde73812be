use crate::canvas::CanvasConfig;
use crate::export::ExportFormat;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct ExportToolConfig {
    /// Image path or `http(s)://` URL placed on the canvas before export.
    pub input: String,
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// Any of `bmp`, `png`, `jpg`/`jpeg`.
    pub formats: Vec<ExportFormat>,
    /// Directory receiving `figure.<ext>` files.
    pub output_dir: PathBuf,
}
