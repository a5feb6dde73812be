//! In-memory drawing surface.
//!
//! Uploaded images are letterboxed onto a white background: scaled by
//! `min(cw / iw, ch / ih)` and centred. Freehand sketches are drawn as round
//! brush stamps along a polyline.
use crate::image::{RasterImage, RgbaView};
use image::imageops::{self, FilterType};
use serde::Deserialize;

pub const WHITE: [u8; 4] = [255, 255, 255, 255];
pub const BLACK: [u8; 4] = [0, 0, 0, 255];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 280,
            height: 280,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Canvas {
    image: RasterImage,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: RasterImage::filled(width, height, WHITE),
        }
    }

    pub fn from_config(config: &CanvasConfig) -> Self {
        Self::new(config.width, config.height)
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn view(&self) -> RgbaView<'_> {
        self.image.as_view()
    }

    pub fn clear(&mut self) {
        self.image = RasterImage::filled(self.width(), self.height(), WHITE);
    }

    /// Clear to white and draw `img` scaled to fit, centred.
    pub fn place_image(&mut self, img: &RasterImage) {
        self.clear();
        let (cw, ch) = (self.width(), self.height());
        let (iw, ih) = (img.width(), img.height());
        if cw == 0 || ch == 0 || iw == 0 || ih == 0 {
            return;
        }
        let scale = (cw as f64 / iw as f64).min(ch as f64 / ih as f64);
        let nw = ((iw as f64 * scale).round() as usize).clamp(1, cw);
        let nh = ((ih as f64 * scale).round() as usize).clamp(1, ch);

        let src = img.to_image_buffer();
        let scaled = if (nw, nh) == (iw, ih) {
            src
        } else {
            imageops::resize(&src, nw as u32, nh as u32, FilterType::Triangle)
        };
        let mut target = self.image.to_image_buffer();
        let x = ((cw - nw) / 2) as i64;
        let y = ((ch - nh) / 2) as i64;
        imageops::overlay(&mut target, &scaled, x, y);
        self.image = RasterImage::from_image_buffer(target);
    }

    /// Stamp filled discs of `radius` along the polyline through `points`.
    pub fn stroke(&mut self, points: &[[f32; 2]], radius: f32, colour: [u8; 4]) {
        match points {
            [] => {}
            [p] => self.stamp(*p, radius, colour),
            _ => {
                let step = (radius * 0.5).max(0.5);
                for pair in points.windows(2) {
                    let [a, b] = [pair[0], pair[1]];
                    let len = ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt();
                    let n = (len / step).ceil().max(1.0) as usize;
                    for i in 0..=n {
                        let t = i as f32 / n as f32;
                        self.stamp([a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t], radius, colour);
                    }
                }
            }
        }
    }

    /// Fill the axis-aligned rectangle `[x0, x1) × [y0, y1)`, clipped.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, colour: [u8; 4]) {
        for y in y0..y1.min(self.height()) {
            for x in x0..x1.min(self.width()) {
                self.image.put(x, y, colour);
            }
        }
    }

    fn stamp(&mut self, centre: [f32; 2], radius: f32, colour: [u8; 4]) {
        let r2 = radius * radius;
        let x_lo = (centre[0] - radius).floor().max(0.0) as usize;
        let y_lo = (centre[1] - radius).floor().max(0.0) as usize;
        let x_hi = ((centre[0] + radius).ceil().max(0.0) as usize).min(self.width());
        let y_hi = ((centre[1] + radius).ceil().max(0.0) as usize).min(self.height());
        for y in y_lo..y_hi {
            for x in x_lo..x_hi {
                let dx = x as f32 + 0.5 - centre[0];
                let dy = y as f32 + 0.5 - centre[1];
                if dx * dx + dy * dy <= r2 {
                    self.image.put(x, y, colour);
                }
            }
        }
    }
}
