//! JSON configuration for the command-line tools.
//!
//! Each tool reads one file whose path is the only argument. Optional sections
//! fall back to their `Default` values.
pub mod classify;
pub mod dataset;
pub mod export;

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub use classify::ClassifyToolConfig;
pub use dataset::DatasetToolConfig;
pub use export::ExportToolConfig;

/// Read and parse a JSON config file.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
