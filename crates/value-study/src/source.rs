//! Decoded source image

use std::fmt;

use crate::color::Rgba;

/// Error type for source image construction.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Width or height is zero
    EmptyImage,
    /// Pixel buffer does not match the dimensions
    LengthMismatch {
        /// `width * height` (times 4 for byte buffers)
        expected: usize,
        /// Length supplied
        actual: usize,
    },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::EmptyImage => write!(f, "image has zero width or height"),
            ImageError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel buffer length mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for ImageError {}

/// A decoded RGBA image, read-only input to a render.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl SourceImage {
    /// Wrap normalized pixels in row-major order.
    ///
    /// # Errors
    ///
    /// - [`ImageError::EmptyImage`] if either dimension is zero
    /// - [`ImageError::LengthMismatch`] if `pixels.len() != width * height`
    pub fn new(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self, ImageError> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(ImageError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from interleaved 8-bit RGBA bytes, normalizing each channel.
    ///
    /// ```
    /// use value_study::SourceImage;
    ///
    /// let image = SourceImage::from_rgba8(1, 1, &[255, 0, 0, 128]).unwrap();
    /// assert_eq!(image.pixels()[0].r, 1.0);
    /// ```
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, ImageError> {
        let expected = pixel_count(width, height)? * 4;
        if bytes.len() != expected {
            return Err(ImageError::LengthMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| Rgba::from_u8(px[0], px[1], px[2], px[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
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

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize, ImageError> {
    if width == 0 || height == 0 {
        return Err(ImageError::EmptyImage);
    }
    Ok(width as usize * height as usize)
}
