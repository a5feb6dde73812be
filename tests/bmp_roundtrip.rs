mod common;

use common::synthetic_image::pattern_rgba;
use image::ImageFormat;
use shape_sketch::bmp::{encode_bmp, row_size};

const SIZES: [usize; 7] = [1, 2, 3, 4, 5, 1023, 1024];

#[test]
fn file_length_matches_row_size_formula() {
    for w in 1..=9usize {
        for h in 1..=4usize {
            let img = pattern_rgba(w, h);
            let bytes = encode_bmp(img.as_view()).unwrap();
            let expected_row = (24 * w + 31) / 32 * 4;
            assert_eq!(row_size(w), expected_row);
            assert_eq!(bytes.len(), 54 + expected_row * h, "{w}x{h}");
        }
    }
}

#[test]
fn decoder_reproduces_rgb_channels() {
    for &w in &SIZES {
        for &h in &SIZES {
            let img = pattern_rgba(w, h);
            let bytes = encode_bmp(img.as_view()).unwrap();
            let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Bmp)
                .unwrap_or_else(|e| panic!("{w}x{h} failed to decode: {e}"))
                .into_rgb8();
            assert_eq!((decoded.width() as usize, decoded.height() as usize), (w, h));
            for y in 0..h {
                for x in 0..w {
                    let src = img.get(x, y);
                    let got = decoded.get_pixel(x as u32, y as u32).0;
                    assert_eq!(got, [src[0], src[1], src[2]], "{w}x{h} at ({x},{y})");
                }
            }
        }
    }
}
