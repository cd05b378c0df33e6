//! PosterizedImage: the result of a render.

use crate::color::Rgba;
use crate::levels::MAX_LEVELS;

/// Output of a posterize render.
///
/// Holds the output pixels and, when the render classified pixels, the
/// band index of each one. Passthrough renders carry no bands.
///
/// # Example
///
/// ```
/// use value_study::{SourceImage, ValueStudy};
///
/// let source = SourceImage::from_rgba8(2, 1, &[0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
/// let image = ValueStudy::new().levels(2).render(&source).unwrap();
///
/// assert_eq!(image.bands(), Some(&[0u8, 1][..]));
/// assert_eq!(image.to_rgba8(), vec![0, 0, 0, 255, 255, 255, 255, 255]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PosterizedImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    bands: Option<Vec<u8>>,
}

impl PosterizedImage {
    /// Result of a posterize render, with one band index per pixel.
    pub fn posterized(width: u32, height: u32, pixels: Vec<Rgba>, bands: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        debug_assert_eq!(bands.len(), pixels.len());
        Self {
            width,
            height,
            pixels,
            bands: Some(bands),
        }
    }

    /// Result of a passthrough render.
    pub fn passthrough(width: u32, height: u32, pixels: Vec<Rgba>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
            bands: None,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Band index per pixel, row-major. `None` for passthrough renders.
    #[inline]
    pub fn bands(&self) -> Option<&[u8]> {
        self.bands.as_deref()
    }

    /// Interleaved 8-bit RGBA, `width * height * 4` bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for px in &self.pixels {
            bytes.extend_from_slice(&px.to_bytes());
        }
        bytes
    }

    /// Pixel count per band. All zero for passthrough renders.
    pub fn band_histogram(&self) -> [usize; MAX_LEVELS] {
        let mut histogram = [0usize; MAX_LEVELS];
        for &band in self.bands.iter().flatten() {
            if let Some(count) = histogram.get_mut(band as usize) {
                *count += 1;
            }
        }
        histogram
    }
}
