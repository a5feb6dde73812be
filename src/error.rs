//! Crate-wide error type.
//!
//! Every failure is terminal for the action that triggered it; nothing in the
//! crate retries. BMP layout mistakes (missing row padding, wrong height sign)
//! are ruled out by construction and have no variant here.
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An action needed an image or a classifier that is not available yet.
    #[error("no {0} available")]
    InputMissing(&'static str),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("failed to decode image from {source_name}: {reason}")]
    Decode { source_name: String, reason: String },

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("failed to load classifier from {location}: {reason}")]
    ClassifierLoad { location: String, reason: String },

    #[error("classifier returned {actual} scores, expected {expected}")]
    ClassifierOutputMismatch { expected: usize, actual: usize },

    #[error("tensor shape {actual:?} does not match expected {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("unsupported export format {0:?}")]
    UnsupportedFormat(String),

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("failed to parse config {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("i/o error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
