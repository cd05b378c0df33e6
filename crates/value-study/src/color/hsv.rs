//! HSV level color type
//!
//! Level colors are picked in a cylindrical hue/saturation/value model
//! because that is how artists think about a swatch. They are converted to
//! RGB only when the color table is built.

use std::str::FromStr;

use super::rgb::Rgb;
use crate::palette::ParseColorError;

/// A color in the hue/saturation/value model.
///
/// All three components are in 0.0..=1.0; hue is a fraction of a full turn.
/// Keeping this a distinct type (rather than three loose floats) makes it
/// impossible to hand an HSV triple to code that expects RGB.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsv {
    /// Hue as a fraction of a full turn (0.0..=1.0)
    pub h: f32,
    /// Saturation (0.0..=1.0)
    pub s: f32,
    /// Value (0.0..=1.0)
    pub v: f32,
}

impl Hsv {
    pub const BLACK: Hsv = Hsv::gray(0.0);
    pub const WHITE: Hsv = Hsv::gray(1.0);

    #[inline]
    pub const fn new(h: f32, s: f32, v: f32) -> Self {
        Self { h, s, v }
    }

    /// An achromatic color with the given value.
    #[inline]
    pub const fn gray(v: f32) -> Self {
        Self { h: 0.0, s: 0.0, v }
    }

    /// Convert to normalized RGB. See [`hsv_to_rgb`].
    #[inline]
    pub fn to_rgb(self) -> Rgb {
        hsv_to_rgb(self.h, self.s, self.v)
    }

    /// 8-bit RGB for UI swatches.
    ///
    /// ```
    /// use value_study::Hsv;
    /// assert_eq!(Hsv::gray(0.5).to_display_color(), [128, 128, 128]);
    /// ```
    #[inline]
    pub fn to_display_color(self) -> [u8; 3] {
        self.to_rgb().to_bytes()
    }

    /// CSS `rgb(r, g, b)` string for UI swatches.
    pub fn to_css(self) -> String {
        let [r, g, b] = self.to_display_color();
        format!("rgb({r}, {g}, {b})")
    }

    /// Hex `#rrggbb` string of the display color.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_display_color();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Convert HSV to normalized RGB.
///
/// Sector selection follows the standard table: `i = floor(h*6) mod 6`,
/// `f = h*6 - floor(h*6)`, with `p = v(1-s)`, `q = v(1-fs)`,
/// `t = v(1-(1-f)s)`. Hues outside 0..=1 wrap around periodically; the
/// modulo is Euclidean so negative hues land in a valid sector too.
///
/// ```
/// use value_study::color::hsv_to_rgb;
/// let gray = hsv_to_rgb(0.0, 0.0, 0.5);
/// assert_eq!((gray.r, gray.g, gray.b), (0.5, 0.5, 0.5));
/// ```
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Rgb {
    let scaled = h * 6.0;
    let floor = scaled.floor();
    let f = scaled - floor;

    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match (floor as i64).rem_euclid(6) {
        0 => Rgb::new(v, t, p),
        1 => Rgb::new(q, v, p),
        2 => Rgb::new(p, v, t),
        3 => Rgb::new(p, q, v),
        4 => Rgb::new(t, p, v),
        _ => Rgb::new(v, p, q),
    }
}

impl FromStr for Hsv {
    type Err = ParseColorError;

    /// Parse a level color.
    ///
    /// Accepts either three comma-separated components `h,s,v` (each in
    /// 0..=1) or a hex RGB color `#RRGGBB` / `#RGB`, which is converted to
    /// HSV. Whitespace around components is ignored.
    ///
    /// ```
    /// use value_study::Hsv;
    ///
    /// let teal: Hsv = "0.5, 1, 0.5".parse().unwrap();
    /// assert_eq!(teal, Hsv::new(0.5, 1.0, 0.5));
    ///
    /// let white: Hsv = "#fff".parse().unwrap();
    /// assert_eq!(white, Hsv::WHITE);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.contains(',') {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            if parts.len() != 3 {
                return Err(ParseColorError::ComponentCount(parts.len()));
            }
            let mut components = [0.0f32; 3];
            for (slot, part) in components.iter_mut().zip(&parts) {
                let value: f32 = part.parse()?;
                if !(0.0..=1.0).contains(&value) {
                    return Err(ParseColorError::OutOfRange(value));
                }
                *slot = value;
            }
            return Ok(Hsv::new(components[0], components[1], components[2]));
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidDigit(bad));
        }
        let bytes = match hex.len() {
            3 => [
                u8::from_str_radix(&hex[0..1], 16)? * 17,
                u8::from_str_radix(&hex[1..2], 16)? * 17,
                u8::from_str_radix(&hex[2..3], 16)? * 17,
            ],
            6 => [
                u8::from_str_radix(&hex[0..2], 16)?,
                u8::from_str_radix(&hex[2..4], 16)?,
                u8::from_str_radix(&hex[4..6], 16)?,
            ],
            _ => return Err(ParseColorError::InvalidLength),
        };
        Ok(Rgb::from_u8(bytes[0], bytes[1], bytes[2]).to_hsv())
    }
}
