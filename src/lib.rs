//! Data pipeline of a sketch shape classifier.
//!
//! - [`preprocess`]: RGBA canvas → binarized `[1, 64, 64, 3]` classifier input.
//! - [`augment`]: random affine warp + brightness jitter for training samples.
//! - [`bmp`]: byte-exact 24-bit BMP encoder for canvas export.
//!
//! Around them sit the drawing surface, raster sources, the dataset builder,
//! the classifier seam and an explicit application state.

pub mod app;
pub mod augment;
pub mod bmp;
pub mod canvas;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod image;
pub mod labels;
pub mod preprocess;

// --- High-level re-exports -------------------------------------------------

pub use crate::app::AppState;
pub use crate::augment::{augment, augment_with, AugmentParams};
pub use crate::bmp::{encode_bmp, row_size};
pub use crate::classifier::{Classifier, LinearClassifier, Prediction};
pub use crate::error::{Error, Result};
pub use crate::labels::ClassLabel;
pub use crate::preprocess::{preprocess, IMAGE_SIZE};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use shape_sketch::prelude::*;
///
/// # fn main() -> shape_sketch::Result<()> {
/// let mut canvas = Canvas::new(280, 280);
/// canvas.stroke(&[[60.0, 200.0], [140.0, 60.0], [220.0, 200.0], [60.0, 200.0]], 4.0, [0, 0, 0, 255]);
///
/// let input = preprocess(canvas.view(), IMAGE_SIZE)?;
/// assert_eq!(input.shape(), &[1, 64, 64, 3]);
///
/// let bmp = encode_bmp(canvas.view())?;
/// std::fs::write("figure.bmp", bmp).expect("write figure.bmp");
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::image::{RasterImage, RgbaView};
    pub use crate::{encode_bmp, preprocess, ClassLabel, IMAGE_SIZE};
}
