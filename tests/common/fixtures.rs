//! Test fixtures: generated images written to temporary directories.

use image::{ImageEncoder, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Horizontal gray gradient, black on the left, white on the right
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / (width - 1).max(1)) as u8;
        Rgba([v, v, v, 255])
    })
}

/// Deterministic noise that PNG cannot compress much
pub fn noise(width: u32, height: u32) -> RgbaImage {
    let mut seed = 0x9e37_79b9_u32;
    RgbaImage::from_fn(width, height, |_, _| {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let [r, g, b, _] = seed.to_le_bytes();
        Rgba([r, g, b, 255])
    })
}

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
    buf
}

/// Write `image` as a PNG file named `name` inside `dir`
pub fn write_png(dir: &Path, name: &str, image: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(image)).unwrap();
    path
}

/// A study configuration with a warm light level and a cool dark level
pub const TINTED_STUDY_YAML: &str = r##"
levels: 3
proportions: [1, 2, 1]
colors:
  0: "#203040"
  2: { h: 0.1, s: 0.2, v: 1.0 }
grayscale: true
"##;
