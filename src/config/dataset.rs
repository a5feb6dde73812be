use crate::dataset::DatasetConfig;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct DatasetToolConfig {
    /// Folder containing `circle/`, `square/` and `triangle/` sub-trees.
    pub root: PathBuf,
    #[serde(default)]
    pub dataset: DatasetConfig,
    pub output: DatasetOutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatasetOutputConfig {
    pub summary_json: PathBuf,
    /// Where to write PNG previews of the first samples, if anywhere.
    #[serde(default)]
    pub preview_dir: Option<PathBuf>,
    #[serde(default = "default_preview_count")]
    pub preview_count: usize,
}

fn default_preview_count() -> usize {
    8
}
