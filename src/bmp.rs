//! Uncompressed 24-bit Windows BMP encoder.
//!
//! Layout (all integers little-endian):
//!
//! | offset | size | field                                        |
//! |--------|------|----------------------------------------------|
//! | 0      | 14   | file header: `BM`, file size, 0, offset 54   |
//! | 14     | 40   | BITMAPINFOHEADER, height negated (top-down)  |
//! | 54     | ..   | rows top first, `B G R` per pixel, 4-aligned |
//!
//! Alpha is dropped. Every row is zero-padded to `row_size(width)` bytes, so
//! widths that are not a multiple of four still produce conformant files.
use crate::error::{Error, Result};
use crate::image::{ImageView, RgbaView};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

pub const FILE_HEADER_LEN: u32 = 14;
pub const DIB_HEADER_LEN: u32 = 40;
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_LEN + DIB_HEADER_LEN;
const BITS_PER_PIXEL: u16 = 24;

/// Bytes per encoded row: `floor((24 * width + 31) / 32) * 4`.
pub fn row_size(width: usize) -> usize {
    (24 * width + 31) / 32 * 4
}

/// BITMAPFILEHEADER.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpFileHeader {
    pub file_size: u32,
    pub pixel_offset: u32,
}

impl BmpFileHeader {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(b"BM")?;
        out.write_u32::<LittleEndian>(self.file_size)?;
        out.write_u32::<LittleEndian>(0)?; // reserved
        out.write_u32::<LittleEndian>(self.pixel_offset)
    }
}

/// BITMAPINFOHEADER for a top-down, uncompressed 24-bit image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DibHeader {
    pub width: i32,
    /// Always negative: rows are stored top first.
    pub height: i32,
    pub image_size: u32,
}

impl DibHeader {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_u32::<LittleEndian>(DIB_HEADER_LEN)?;
        out.write_i32::<LittleEndian>(self.width)?;
        out.write_i32::<LittleEndian>(self.height)?;
        out.write_u16::<LittleEndian>(1)?; // planes
        out.write_u16::<LittleEndian>(BITS_PER_PIXEL)?;
        out.write_u32::<LittleEndian>(0)?; // BI_RGB
        out.write_u32::<LittleEndian>(self.image_size)?;
        // x/y resolution, palette size, important colours
        out.write_all(&[0u8; 16])
    }
}

/// Header values and sizes derived from the image dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpLayout {
    pub row_size: usize,
    pub file: BmpFileHeader,
    pub dib: DibHeader,
}

impl BmpLayout {
    /// Fails when a dimension is zero or a header field would overflow.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let invalid = || Error::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        let w = i32::try_from(width).map_err(|_| invalid())?;
        let h = i32::try_from(height).map_err(|_| invalid())?;
        let row = row_size(width);
        let image_size = row
            .checked_mul(height)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(invalid)?;
        let file_size = image_size
            .checked_add(PIXEL_DATA_OFFSET)
            .ok_or_else(invalid)?;
        Ok(Self {
            row_size: row,
            file: BmpFileHeader {
                file_size,
                pixel_offset: PIXEL_DATA_OFFSET,
            },
            dib: DibHeader {
                width: w,
                height: -h,
                image_size,
            },
        })
    }
}

/// Stream the BMP encoding of `src` into `out`.
pub fn write_bmp<W: Write>(src: RgbaView<'_>, layout: &BmpLayout, out: &mut W) -> io::Result<()> {
    layout.file.write_to(out)?;
    layout.dib.write_to(out)?;

    let mut row_buf = vec![0u8; layout.row_size];
    for y in 0..src.height() {
        for (px, bgr) in src.row(y).chunks_exact(4).zip(row_buf.chunks_exact_mut(3)) {
            bgr[0] = px[2];
            bgr[1] = px[1];
            bgr[2] = px[0];
        }
        // Padding bytes past 3 * width are never written and stay zero.
        out.write_all(&row_buf)?;
    }
    Ok(())
}

/// Encode an RGBA view as a 24-bit BMP file.
pub fn encode_bmp(src: RgbaView<'_>) -> Result<Vec<u8>> {
    let layout = BmpLayout::new(src.w, src.h)?;
    let mut out = Vec::with_capacity(layout.file.file_size as usize);
    write_bmp(src, &layout, &mut out).map_err(|e| Error::Encode(e.to_string()))?;
    debug_assert_eq!(out.len(), layout.file.file_size as usize);
    Ok(out)
}

/// Encode a tightly packed RGBA byte buffer of `width × height` pixels.
pub fn encode_bmp_raw(width: usize, height: usize, rgba: &[u8]) -> Result<Vec<u8>> {
    encode_bmp(RgbaView::packed(width, height, rgba)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::RasterImage;

    fn u32_at(b: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
    }

    fn i32_at(b: &[u8], at: usize) -> i32 {
        i32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
    }

    fn u16_at(b: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([b[at], b[at + 1]])
    }

    #[test]
    fn row_size_rounds_up_to_four_bytes() {
        assert_eq!(row_size(1), 4);
        assert_eq!(row_size(2), 8);
        assert_eq!(row_size(3), 12);
        assert_eq!(row_size(4), 12);
        assert_eq!(row_size(5), 16);
        assert_eq!(row_size(1023), 3072);
        assert_eq!(row_size(1024), 3072);
    }

    #[test]
    fn headers_match_layout() {
        let img = RasterImage::filled(3, 2, [1, 2, 3, 4]);
        let bytes = encode_bmp(img.as_view()).unwrap();

        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(u32_at(&bytes, 2), 54 + 12 * 2);
        assert_eq!(u32_at(&bytes, 6), 0);
        assert_eq!(u32_at(&bytes, 10), 54);
        assert_eq!(u32_at(&bytes, 14), 40);
        assert_eq!(i32_at(&bytes, 18), 3);
        assert_eq!(i32_at(&bytes, 22), -2);
        assert_eq!(u16_at(&bytes, 26), 1);
        assert_eq!(u16_at(&bytes, 28), 24);
        assert_eq!(u32_at(&bytes, 30), 0);
        assert_eq!(u32_at(&bytes, 34), 24);
        assert!(bytes[38..54].iter().all(|&b| b == 0));
        assert_eq!(bytes.len(), 78);
    }

    #[test]
    fn pixels_are_bgr_top_row_first_with_zero_padding() {
        let mut img = RasterImage::filled(1, 2, [0, 0, 0, 255]);
        img.put(0, 0, [10, 20, 30, 255]);
        img.put(0, 1, [40, 50, 60, 7]);
        let bytes = encode_bmp(img.as_view()).unwrap();

        assert_eq!(&bytes[54..58], &[30, 20, 10, 0]);
        assert_eq!(&bytes[58..62], &[60, 50, 40, 0]);
    }

    #[test]
    fn padding_is_zero_for_unaligned_widths() {
        for w in [1usize, 2, 3, 5, 6, 7] {
            let img = RasterImage::filled(w, 3, [255, 255, 255, 255]);
            let bytes = encode_bmp(img.as_view()).unwrap();
            let rs = row_size(w);
            for y in 0..3 {
                let row = &bytes[54 + y * rs..54 + (y + 1) * rs];
                assert!(row[..3 * w].iter().all(|&b| b == 255));
                assert!(row[3 * w..].iter().all(|&b| b == 0), "width {w} row {y}");
            }
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let mut img = RasterImage::filled(7, 5, [9, 9, 9, 9]);
        img.put(3, 3, [1, 2, 3, 4]);
        assert_eq!(
            encode_bmp(img.as_view()).unwrap(),
            encode_bmp(img.as_view()).unwrap()
        );
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            BmpLayout::new(0, 5),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_bmp_raw(2, 2, &[0; 8]),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert!(BmpLayout::new(usize::MAX / 64, 1).is_err());
        assert!(BmpLayout::new(40_000, 40_000).is_err());
    }
}
