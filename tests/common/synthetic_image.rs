#![allow(dead_code)]

use shape_sketch::image::RasterImage;

pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

/// White image with a black axis-aligned square of side `side` at `(x0, y0)`.
pub fn square_on_white(width: usize, height: usize, x0: usize, y0: usize, side: usize) -> RasterImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = RasterImage::filled(width, height, WHITE);
    for y in y0..(y0 + side).min(height) {
        for x in x0..(x0 + side).min(width) {
            img.put(x, y, BLACK);
        }
    }
    img
}

/// Deterministic colourful pattern; every channel differs between neighbours.
pub fn pattern_rgba(width: usize, height: usize) -> RasterImage {
    let mut img = RasterImage::filled(width, height, [0, 0, 0, 255]);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 31 + y * 7) % 256) as u8;
            let g = ((x * 13 + y * 17 + 50) % 256) as u8;
            let b = ((x * 5 + y * 29 + 101) % 256) as u8;
            let a = ((x + y) % 256) as u8;
            img.put(x, y, [r, g, b, a]);
        }
    }
    img
}

/// Filled disc of `radius` centred in a white image.
pub fn disc_on_white(size: usize, radius: f32) -> RasterImage {
    let mut img = RasterImage::filled(size, size, WHITE);
    let c = size as f32 / 2.0;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - c;
            let dy = y as f32 + 0.5 - c;
            if dx * dx + dy * dy <= radius * radius {
                img.put(x, y, BLACK);
            }
        }
    }
    img
}
