//! Color types and conversion utilities
//!
//! Two color models appear in the pipeline:
//!
//! - **HSV** ([`Hsv`]): how level colors are picked and stored.
//! - **RGB** ([`Rgb`], [`Rgba`]): what pixels and the color table hold.
//!
//! Channels are normalized to 0.0..=1.0 and are never gamma decoded.
//!
//! # Example
//!
//! ```
//! use value_study::{Hsv, Rgb};
//!
//! let swatch = Hsv::new(0.0, 1.0, 1.0);
//! assert_eq!(swatch.to_rgb(), Rgb::new(1.0, 0.0, 0.0));
//! assert!((Rgb::new(1.0, 0.0, 0.0).luma() - 0.299).abs() < 1e-7);
//! ```

mod hsv;
mod rgb;

pub use hsv::{hsv_to_rgb, Hsv};
pub use rgb::{luma, Rgb, Rgba, LUMA_WEIGHTS};
