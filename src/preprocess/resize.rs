//! Nearest-neighbor resampling for interleaved buffers.
//!
//! Destination index `d` samples source index `floor(d * src / dst)`, clamped
//! to the last valid index. Integral upscales therefore replicate every source
//! pixel into an exact block and no value is ever blended.
use crate::image::ImageView;

/// Source index sampled by destination index `d`.
#[inline]
pub fn nearest_index(d: usize, src_len: usize, dst_len: usize) -> usize {
    debug_assert!(src_len > 0 && dst_len > 0);
    ((d * src_len) / dst_len).min(src_len - 1)
}

/// Resize any image view to `dst_w × dst_h`, keeping its channel layout.
///
/// The result is tightly packed (`dst_w * channels` elements per row). An
/// empty source or destination yields an empty buffer.
pub fn resize_nearest<I: ImageView>(src: &I, dst_w: usize, dst_h: usize) -> Vec<I::Pixel> {
    let (sw, sh, c) = (src.width(), src.height(), src.channels());
    if sw == 0 || sh == 0 || dst_w == 0 || dst_h == 0 {
        return Vec::new();
    }
    let x_map: Vec<usize> = (0..dst_w).map(|x| nearest_index(x, sw, dst_w)).collect();

    let mut out = Vec::with_capacity(dst_w * dst_h * c);
    for y in 0..dst_h {
        let src_row = src.row(nearest_index(y, sh, dst_h));
        for &sx in &x_map {
            out.extend_from_slice(&src_row[sx * c..(sx + 1) * c]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageF32, RasterImage};

    #[test]
    fn checkerboard_upscale_replicates_blocks() {
        let mut src = ImageF32::new(2, 2);
        src.set(0, 0, 1.0);
        src.set(1, 1, 1.0);

        let out = resize_nearest(&src, 4, 4);
        assert_eq!(out.len(), 16);
        for y in 0..4 {
            for x in 0..4 {
                let expected = src.get(x / 2, y / 2);
                assert_eq!(out[y * 4 + x], expected, "pixel ({x},{y})");
            }
        }
        assert!(out.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn downscale_picks_existing_samples() {
        let mut src = ImageF32::new(5, 1);
        for x in 0..5 {
            src.set(x, 0, x as f32);
        }
        assert_eq!(resize_nearest(&src, 2, 1), vec![0.0, 2.0]);
    }

    #[test]
    fn rgba_channels_stay_together() {
        let mut src = RasterImage::filled(2, 1, [0, 0, 0, 255]);
        src.put(1, 0, [10, 20, 30, 40]);
        let out = resize_nearest(&src.as_view(), 4, 1);
        assert_eq!(
            out,
            vec![0, 0, 0, 255, 0, 0, 0, 255, 10, 20, 30, 40, 10, 20, 30, 40]
        );
    }

    #[test]
    fn empty_source_gives_empty_output() {
        let src = ImageF32::new(0, 3);
        assert!(resize_nearest(&src, 4, 4).is_empty());
    }
}
