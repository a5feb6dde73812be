//! Centre-anchored affine warp of RGBA buffers.
//!
//! The forward map is `T(c + d) · R(θ) · S(s) · T(-c)` with `c` the image
//! centre. Rendering walks destination pixel centres, maps them back through
//! the inverse and samples the source bilinearly on premultiplied colour.
//! Samples that fall outside the source read as transparent black.
use crate::image::RasterImage;
use nalgebra::{Matrix3, Vector3};

/// Colour used for destination pixels with no source coverage.
pub const FILL: [u8; 4] = [0, 0, 0, 0];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineWarp {
    forward: Matrix3<f32>,
    inverse: Matrix3<f32>,
}

fn translation(tx: f32, ty: f32) -> Matrix3<f32> {
    Matrix3::new(1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0)
}

fn rotation(angle: f32) -> Matrix3<f32> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
}

fn scaling(k: f32) -> Matrix3<f32> {
    Matrix3::new(k, 0.0, 0.0, 0.0, k, 0.0, 0.0, 0.0, 1.0)
}

impl AffineWarp {
    /// Build the warp for a `w × h` image. `scale` must be positive.
    pub fn centered(w: usize, h: usize, angle: f32, scale: f32, dx: f32, dy: f32) -> Self {
        debug_assert!(scale > 0.0, "scale must be positive");
        let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
        let forward =
            translation(cx + dx, cy + dy) * rotation(angle) * scaling(scale) * translation(-cx, -cy);
        // Composed from the inverted factors so no matrix inversion can fail.
        let inverse = translation(cx, cy)
            * scaling(1.0 / scale)
            * rotation(-angle)
            * translation(-(cx + dx), -(cy + dy));
        Self { forward, inverse }
    }

    pub fn forward(&self) -> &Matrix3<f32> {
        &self.forward
    }

    pub fn apply(&self, p: [f32; 2]) -> [f32; 2] {
        map_point(&self.forward, p)
    }

    pub fn apply_inverse(&self, p: [f32; 2]) -> [f32; 2] {
        map_point(&self.inverse, p)
    }

    /// Render `src` through the warp into a same-size buffer.
    pub fn render(&self, src: &RasterImage) -> RasterImage {
        let (w, h) = (src.width(), src.height());
        let mut out = RasterImage::filled(w, h, FILL);
        for y in 0..h {
            for x in 0..w {
                let [u, v] = self.apply_inverse([x as f32 + 0.5, y as f32 + 0.5]);
                out.put(x, y, sample_bilinear(src, u - 0.5, v - 0.5));
            }
        }
        out
    }
}

#[inline]
fn map_point(m: &Matrix3<f32>, p: [f32; 2]) -> [f32; 2] {
    let v = m * Vector3::new(p[0], p[1], 1.0);
    [v[0], v[1]]
}

#[inline]
fn premultiplied(src: &RasterImage, x: i64, y: i64) -> [f32; 4] {
    if x < 0 || y < 0 || x >= src.width() as i64 || y >= src.height() as i64 {
        return [0.0; 4];
    }
    let p = src.get(x as usize, y as usize);
    let a = p[3] as f32 / 255.0;
    [p[0] as f32 * a, p[1] as f32 * a, p[2] as f32 * a, p[3] as f32]
}

/// Bilinear sample at pixel-index coordinates (integer = pixel centre).
fn sample_bilinear(src: &RasterImage, fx: f32, fy: f32) -> [u8; 4] {
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let taps = [
        (x0, y0, (1.0 - tx) * (1.0 - ty)),
        (x0 + 1, y0, tx * (1.0 - ty)),
        (x0, y0 + 1, (1.0 - tx) * ty),
        (x0 + 1, y0 + 1, tx * ty),
    ];
    let mut acc = [0.0f32; 4];
    for (x, y, wgt) in taps {
        if wgt == 0.0 {
            continue;
        }
        let p = premultiplied(src, x, y);
        for c in 0..4 {
            acc[c] += p[c] * wgt;
        }
    }

    let alpha = acc[3];
    if alpha <= 0.0 {
        return FILL;
    }
    let unpremul = 255.0 / alpha;
    [
        (acc[0] * unpremul).round().clamp(0.0, 255.0) as u8,
        (acc[1] * unpremul).round().clamp(0.0, 255.0) as u8,
        (acc[2] * unpremul).round().clamp(0.0, 255.0) as u8,
        alpha.round().clamp(0.0, 255.0) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_pt(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn centre_maps_to_centre_plus_offset() {
        let warp = AffineWarp::centered(64, 64, 0.15, 1.1, 3.0, -2.0);
        assert!(approx_pt(warp.apply([32.0, 32.0]), [35.0, 30.0]));
    }

    #[test]
    fn inverse_undoes_forward() {
        let warp = AffineWarp::centered(40, 30, -0.17, 0.87, -4.5, 1.25);
        for p in [[0.0, 0.0], [12.5, 7.0], [39.0, 29.0]] {
            assert!(approx_pt(warp.apply_inverse(warp.apply(p)), p));
        }
    }

    #[test]
    fn identity_warp_copies_pixels() {
        let mut src = RasterImage::filled(5, 4, [255, 255, 255, 255]);
        src.put(1, 2, [10, 20, 30, 255]);
        let warp = AffineWarp::centered(5, 4, 0.0, 1.0, 0.0, 0.0);
        assert_eq!(warp.render(&src), src);
    }

    #[test]
    fn whole_pixel_shift_exposes_fill() {
        let src = RasterImage::filled(4, 4, [200, 100, 50, 255]);
        let warp = AffineWarp::centered(4, 4, 0.0, 1.0, 2.0, 0.0);
        let out = warp.render(&src);
        for y in 0..4 {
            assert_eq!(out.get(0, y), FILL);
            assert_eq!(out.get(1, y), FILL);
            assert_eq!(out.get(2, y), [200, 100, 50, 255]);
        }
    }

    #[test]
    fn edge_blend_keeps_colour_and_lowers_alpha() {
        let src = RasterImage::filled(4, 4, [200, 100, 50, 255]);
        let warp = AffineWarp::centered(4, 4, 0.0, 1.0, 0.5, 0.0);
        let out = warp.render(&src);
        let p = out.get(0, 1);
        assert_eq!(&p[..3], &[200, 100, 50]);
        assert!(p[3] > 0 && p[3] < 255);
    }
}
