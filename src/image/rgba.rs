//! 8-bit RGBA buffers: an owned [`RasterImage`] and a borrowed [`RgbaView`].
//!
//! Pixels are stored as interleaved `R, G, B, A` bytes, row-major, origin at
//! the top-left corner. `stride` counts bytes between row starts.
use crate::error::{Error, Result};

pub const RGBA_CHANNELS: usize = 4;

/// Borrowed RGBA view, possibly over a padded buffer.
#[derive(Clone, Copy, Debug)]
pub struct RgbaView<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> RgbaView<'a> {
    /// View over a tightly packed buffer. Fails when `data` does not hold
    /// exactly `w * h` pixels.
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Result<Self> {
        let expected = w
            .checked_mul(h)
            .and_then(|n| n.checked_mul(RGBA_CHANNELS))
            .ok_or(Error::InvalidDimensions { width: w, height: h })?;
        if data.len() != expected {
            return Err(Error::InvalidDimensions { width: w, height: h });
        }
        Ok(Self {
            w,
            h,
            stride: w * RGBA_CHANNELS,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 4] {
        let i = y * self.stride + x * RGBA_CHANNELS;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

impl<'a> crate::image::traits::ImageView for RgbaView<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn channels(&self) -> usize {
        RGBA_CHANNELS
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w * RGBA_CHANNELS]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        let len = self.w * self.h * RGBA_CHANNELS;
        (self.stride == self.w * RGBA_CHANNELS).then_some(&self.data[..len])
    }
}

/// Owned, tightly packed RGBA image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap raw RGBA bytes. Fails when the length does not match `w × h × 4`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        RgbaView::packed(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image filled with a single colour.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width * height * RGBA_CHANNELS)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Borrow as a read-only `RgbaView`.
    pub fn as_view(&self) -> RgbaView<'_> {
        RgbaView {
            w: self.width,
            h: self.height,
            stride: self.width * RGBA_CHANNELS,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 4] {
        self.as_view().get(x, y)
    }

    #[inline]
    pub fn put(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let i = (y * self.width + x) * RGBA_CHANNELS;
        self.data[i..i + RGBA_CHANNELS].copy_from_slice(&rgba);
    }

    /// Convert into the `image` crate buffer type for resampling and codecs.
    pub fn to_image_buffer(&self) -> image::RgbaImage {
        image::RgbaImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .expect("raster length matches its dimensions")
    }

    pub fn from_image_buffer(img: image::RgbaImage) -> Self {
        let width = img.width() as usize;
        let height = img.height() as usize;
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageView;

    #[test]
    fn from_raw_rejects_short_buffer() {
        let err = RasterImage::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDimensions {
                width: 2,
                height: 2
            }
        ));
    }

    #[test]
    fn rows_cover_four_bytes_per_pixel() {
        let mut img = RasterImage::filled(3, 2, [1, 2, 3, 255]);
        img.put(2, 1, [9, 8, 7, 6]);
        let view = img.as_view();
        assert_eq!(view.row(1).len(), 12);
        assert_eq!(&view.row(1)[8..], &[9, 8, 7, 6]);
        assert_eq!(view.rows().count(), 2);
        assert!(view.is_contiguous());
    }

    #[test]
    fn view_over_padded_buffer_skips_padding() {
        // 1x2 image with 4 padding bytes per row
        let data = [10, 20, 30, 40, 0, 0, 0, 0, 50, 60, 70, 80, 0, 0, 0, 0];
        let view = RgbaView {
            w: 1,
            h: 2,
            stride: 8,
            data: &data,
        };
        assert_eq!(view.get(0, 1), [50, 60, 70, 80]);
        assert!(view.as_slice().is_none());
    }
}
