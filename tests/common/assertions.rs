//! Assertion helpers for tests.

use pretty_assertions::assert_eq;
use value_study::PosterizedImage;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Assert bytes are a PNG image and decode them
pub fn assert_png(bytes: &[u8]) -> image::RgbaImage {
    assert!(
        bytes.starts_with(PNG_SIGNATURE),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    image::load_from_memory(bytes)
        .expect("PNG should decode")
        .to_rgba8()
}

/// Assert every pixel's band is below the level count and that each band
/// pixel carries that band's color
pub fn assert_bands_consistent(image: &PosterizedImage, colors: &[[u8; 3]]) {
    let bands = image.bands().expect("posterized image should carry bands");
    assert_eq!(bands.len(), image.pixels().len());
    for (pixel, &band) in image.pixels().iter().zip(bands) {
        let band = band as usize;
        assert!(band < colors.len(), "band {band} out of range");
        let [r, g, b, _] = pixel.to_bytes();
        assert_eq!([r, g, b], colors[band], "pixel color does not match band {band}");
    }
}

/// Assert two images have the same size and RGBA bytes
pub fn assert_same_pixels(actual: &image::RgbaImage, expected: &[u8]) {
    assert_eq!(actual.as_raw().len(), expected.len());
    assert!(
        actual.as_raw().as_slice() == expected,
        "pixel data differs"
    );
}
