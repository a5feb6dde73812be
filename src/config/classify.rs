use crate::canvas::CanvasConfig;
use crate::preprocess::IMAGE_SIZE;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct ClassifyToolConfig {
    /// Image path or `http(s)://` URL.
    pub input: String,
    /// Model JSON path or URL.
    pub model: String,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default = "default_image_size")]
    pub image_size: usize,
    #[serde(default)]
    pub output: ClassifyOutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClassifyOutputConfig {
    /// Prediction report as JSON.
    pub result_json: Option<PathBuf>,
    /// Binarized classifier input saved as PNG for inspection.
    pub input_preview: Option<PathBuf>,
}

fn default_image_size() -> usize {
    IMAGE_SIZE
}
