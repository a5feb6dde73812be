//! Training-time augmentation: one random affine warp plus a brightness shift
//! per sample.
//!
//! Parameters are drawn from a caller-supplied RNG so a seeded `StdRng`
//! reproduces a run exactly. Drawing ([`AugmentParams::sample`]) and applying
//! ([`augment_with`]) are separate steps; the dataset builder draws
//! sequentially and applies in parallel.
//!
//! Uncovered regions after the warp are transparent black. The brightness
//! shift is applied to them as well, and alpha is dropped on the way back to a
//! float tensor, so they end up as `clamp(delta, 0, 255) / 255` grey.

pub mod affine;

use crate::image::RasterImage;
use crate::preprocess::INPUT_CHANNELS;
use affine::AffineWarp;
use ndarray::Array3;
use rand::Rng;
use serde::Serialize;

/// Largest rotation magnitude, in degrees.
pub const MAX_ROTATION_DEG: f32 = 10.0;
/// Scale factor range.
pub const SCALE_RANGE: (f32, f32) = (0.85, 1.15);
/// Largest translation magnitude per axis, in pixels.
pub const MAX_SHIFT_PX: f32 = 5.0;
/// Largest brightness shift, in 8-bit levels.
pub const MAX_BRIGHTNESS: f32 = 15.0;

/// One independently drawn set of augmentation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AugmentParams {
    /// Rotation in radians.
    pub angle: f32,
    pub scale: f32,
    pub dx: f32,
    pub dy: f32,
    /// Added to every colour channel before clamping.
    pub brightness: f32,
}

impl AugmentParams {
    /// Parameters that leave a sample unchanged.
    pub const IDENTITY: AugmentParams = AugmentParams {
        angle: 0.0,
        scale: 1.0,
        dx: 0.0,
        dy: 0.0,
        brightness: 0.0,
    };

    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        let angle_deg = rng.gen_range(-MAX_ROTATION_DEG..=MAX_ROTATION_DEG);
        Self {
            angle: angle_deg.to_radians(),
            scale: rng.gen_range(SCALE_RANGE.0..=SCALE_RANGE.1),
            dx: rng.gen_range(-MAX_SHIFT_PX..=MAX_SHIFT_PX),
            dy: rng.gen_range(-MAX_SHIFT_PX..=MAX_SHIFT_PX),
            brightness: rng.gen_range(-MAX_BRIGHTNESS..=MAX_BRIGHTNESS),
        }
    }
}

/// Draw parameters from `rng` and augment one `[S, S, 3]` sample.
pub fn augment<R: Rng>(sample: &Array3<f32>, rng: &mut R) -> Array3<f32> {
    augment_with(sample, &AugmentParams::sample(rng))
}

/// Apply fixed parameters to one `[H, W, 3]` sample in `[0, 1]`.
pub fn augment_with(sample: &Array3<f32>, params: &AugmentParams) -> Array3<f32> {
    let rgba = to_rgba(sample);
    let warp = AffineWarp::centered(
        rgba.width(),
        rgba.height(),
        params.angle,
        params.scale,
        params.dx,
        params.dy,
    );
    let mut warped = warp.render(&rgba);
    shift_brightness(&mut warped, params.brightness);
    to_tensor(&warped)
}

/// Add `delta` to R, G and B of every pixel, clamped to `[0, 255]`.
pub fn shift_brightness(img: &mut RasterImage, delta: f32) {
    if delta == 0.0 {
        return;
    }
    for y in 0..img.height() {
        for x in 0..img.width() {
            let mut p = img.get(x, y);
            for c in &mut p[..3] {
                *c = (*c as f32 + delta).round().clamp(0.0, 255.0) as u8;
            }
            img.put(x, y, p);
        }
    }
}

/// `[H, W, 3]` floats in `[0, 1]` to opaque RGBA, rounded to nearest.
fn to_rgba(sample: &Array3<f32>) -> RasterImage {
    let (h, w, _) = sample.dim();
    let mut out = RasterImage::filled(w, h, [0, 0, 0, 255]);
    for y in 0..h {
        for x in 0..w {
            let mut p = [0, 0, 0, 255];
            for c in 0..INPUT_CHANNELS {
                p[c] = (sample[[y, x, c]] * 255.0).round().clamp(0.0, 255.0) as u8;
            }
            out.put(x, y, p);
        }
    }
    out
}

fn to_tensor(img: &RasterImage) -> Array3<f32> {
    Array3::from_shape_fn((img.height(), img.width(), INPUT_CHANNELS), |(y, x, c)| {
        img.get(x, y)[c] as f32 / 255.0
    })
}
