//! Inference preprocessing: grayscale, global-mean binarization and a
//! nearest-neighbor resize into the `[1, S, S, 3]` classifier input.
//!
//! Darker-than-average pixels become foreground (`1.0`), everything else
//! background (`0.0`). The threshold is derived from the input itself, so the
//! transform is a pure function of the pixel buffer.
//!
//! The training path uses [`normalize_sample`] instead: the same nearest
//! resize, but continuous-tone RGB without thresholding.

pub mod resize;

use crate::error::{Error, Result};
use crate::image::{ImageF32, ImageView, ImageViewMut, RgbaView};
use log::debug;
use ndarray::{Array3, Array4};
use resize::resize_nearest;

/// Side length of the square classifier input.
pub const IMAGE_SIZE: usize = 64;

/// Channels fed to the classifier.
pub const INPUT_CHANNELS: usize = 3;

/// Binary foreground mask together with the threshold that produced it.
#[derive(Clone, Debug)]
pub struct Binarized {
    pub mask: ImageF32,
    pub threshold: f32,
}

/// Per-pixel luminance `mean(R, G, B) / 255` in `[0, 1]`.
pub fn grayscale(src: RgbaView<'_>) -> ImageF32 {
    let mut out = ImageF32::new(src.w, src.h);
    for y in 0..src.h {
        let row = src.row(y);
        let dst = out.row_mut(y);
        for (px, d) in row.chunks_exact(4).zip(dst.iter_mut()) {
            let sum = px[0] as f32 + px[1] as f32 + px[2] as f32;
            *d = sum / (3.0 * 255.0);
        }
    }
    out
}

/// Threshold a grayscale map at its global mean: `g <= mean` maps to `1.0`.
pub fn binarize(gray: &ImageF32) -> Binarized {
    let threshold = gray.mean();
    let mut mask = ImageF32::new(gray.w, gray.h);
    for y in 0..gray.h {
        let src = gray.row(y);
        let dst = mask.row_mut(y);
        for (d, &g) in dst.iter_mut().zip(src) {
            *d = if g <= threshold { 1.0 } else { 0.0 };
        }
    }
    Binarized { mask, threshold }
}

/// Full inference transform. Returns the `[1, size, size, 3]` tensor and the
/// threshold used.
pub fn preprocess_with_threshold(src: RgbaView<'_>, size: usize) -> Result<(Array4<f32>, f32)> {
    if src.w == 0 || src.h == 0 || size == 0 {
        return Err(Error::InvalidDimensions {
            width: src.w,
            height: src.h,
        });
    }
    let gray = grayscale(src);
    let Binarized { mask, threshold } = binarize(&gray);
    // Replicating into three channels commutes with nearest sampling, so the
    // single-channel mask is resized first and broadcast afterwards.
    let resized = resize_nearest(&mask, size, size);
    let tensor = Array4::from_shape_fn((1, size, size, INPUT_CHANNELS), |(_, y, x, _)| {
        resized[y * size + x]
    });
    debug!(
        "preprocess: {}x{} -> {size}x{size}, threshold={threshold:.4}",
        src.w, src.h
    );
    Ok((tensor, threshold))
}

/// Inference transform producing the `[1, size, size, 3]` binary tensor.
pub fn preprocess(src: RgbaView<'_>, size: usize) -> Result<Array4<f32>> {
    preprocess_with_threshold(src, size).map(|(tensor, _)| tensor)
}

/// Training-path normalization: nearest resize to `size × size`, RGB scaled
/// to `[0, 1]`, alpha dropped. No thresholding.
pub fn normalize_sample(src: RgbaView<'_>, size: usize) -> Result<Array3<f32>> {
    if src.w == 0 || src.h == 0 || size == 0 {
        return Err(Error::InvalidDimensions {
            width: src.w,
            height: src.h,
        });
    }
    let resized = resize_nearest(&src, size, size);
    Ok(Array3::from_shape_fn((size, size, INPUT_CHANNELS), |(y, x, c)| {
        resized[(y * size + x) * 4 + c] as f32 / 255.0
    }))
}
