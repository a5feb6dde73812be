pub mod f32;
pub mod io;
pub mod rgba;
pub mod source;
pub mod traits;

pub use self::f32::ImageF32;
pub use self::rgba::{RasterImage, RgbaView, RGBA_CHANNELS};
pub use self::source::RasterSource;
pub use self::traits::{ImageView, ImageViewMut, Rows};
