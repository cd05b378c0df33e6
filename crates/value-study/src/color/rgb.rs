//! Normalized RGB and RGBA color types
//!
//! Channels are plain normalized values in 0.0..=1.0. No gamma decoding is
//! applied anywhere in the pipeline: luma is computed directly on the
//! encoded channel values.

use super::hsv::Hsv;

/// BT.601 luma weights for red, green and blue.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Perceptual luma of an RGB triple using the BT.601 weights.
///
/// The expression order matches the WGSL kernel so that both backends
/// compute the same value for the same input.
#[inline]
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b
}

/// A normalized RGB color.
///
/// Produced by [`Hsv::to_rgb`] and stored in the
/// [`ColorTable`](crate::palette::ColorTable).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    /// Red channel (0.0..=1.0)
    pub r: f32,
    /// Green channel (0.0..=1.0)
    pub g: f32,
    /// Blue channel (0.0..=1.0)
    pub b: f32,
}

impl Rgb {
    /// Pure white, used to pad inert color table slots.
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    /// Pure black.
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create an Rgb color from 8-bit channel values.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Convert to 8-bit channels, rounding to nearest and clamping to 0..=255.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            (self.r * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.g * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.b * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    /// BT.601 luma of this color.
    #[inline]
    pub fn luma(self) -> f32 {
        luma(self.r, self.g, self.b)
    }

    /// Attach an alpha channel.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }

    /// Convert to the HSV model.
    ///
    /// Achromatic colors map to hue 0 and saturation 0, which is what the
    /// default grayscale ramp uses.
    pub fn to_hsv(self) -> Hsv {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;

        let v = max;
        let s = if max > 0.0 { delta / max } else { 0.0 };

        if delta <= 0.0 {
            return Hsv::new(0.0, 0.0, v);
        }

        let sector = if max == self.r {
            ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if max == self.g {
            (self.b - self.r) / delta + 2.0
        } else {
            (self.r - self.g) / delta + 4.0
        };

        Hsv::new(sector / 6.0, s, v)
    }
}

/// A normalized RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Alpha (0.0 transparent, 1.0 opaque). Never altered by quantization.
    pub a: f32,
}

impl Rgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a pixel from 8-bit channel values.
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Convert to 8-bit channels, rounding to nearest and clamping to 0..=255.
    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        [
            (self.r * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.g * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.b * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.a * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }

    #[inline]
    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    /// BT.601 luma of the color channels (alpha is ignored).
    #[inline]
    pub fn luma(self) -> f32 {
        luma(self.r, self.g, self.b)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
