//! value-study: posterized value studies for painters
//!
//! A value study reduces a photo to a handful of luminance bands so a
//! painter can see its light/dark structure. This crate turns user
//! proportions into band thresholds, maps each band to a chosen color,
//! and classifies every pixel.
//!
//! # Quick Start
//!
//! The [`ValueStudy`] builder is the primary entry point:
//!
//! ```
//! use value_study::{SourceImage, ValueStudy};
//!
//! let bytes = [
//!     10, 10, 10, 255, // dark
//!     128, 128, 128, 255, // mid
//!     250, 250, 250, 255, // light
//! ];
//! let source = SourceImage::from_rgba8(3, 1, &bytes).unwrap();
//!
//! let image = ValueStudy::new().levels(3).render(&source).unwrap();
//! assert_eq!(image.bands(), Some(&[0u8, 1, 2][..]));
//! ```
//!
//! # Editing Session
//!
//! For an interactive session, hold a [`ShadingParameters`] and freeze a
//! [`RenderSnapshot`] after every edit:
//!
//! ```
//! use value_study::{kernel, ShadingParameters, SourceImage};
//!
//! let mut params = ShadingParameters::default();
//! params.adjust_levels(1);
//! params.set_proportion(0, 0.5).unwrap();
//!
//! let source = SourceImage::from_rgba8(1, 1, &[0, 0, 0, 255]).unwrap();
//! let image = kernel::render(&source, &params.snapshot());
//! assert_eq!(image.bands(), Some(&[0u8][..]));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! Proportions (f64, sum 1)          LevelColors (11 x HSV)
//!     |                                  |
//!     | running sum, drop last           | first level_count -> RGB
//!     v                                  v
//! Thresholds (level_count - 1)      ColorTable (11 x RGB, white padded)
//!     |                                  |
//!     +------------> RenderSnapshot <----+
//!                    (10 padded thresholds, table, grayscale flag)
//!                          |
//!            +-------------+--------------+
//!            v                            v
//!     kernel::render (rayon)      gpu::render_gpu (WGSL)
//!            |                            |
//!            +-----> PosterizedImage <----+
//! ```
//!
//! ## Band Selection
//!
//! Luma is BT.601 (`0.299r + 0.587g + 0.114b`) on the encoded channel
//! values, with no gamma decoding. A pixel's band is the index of the
//! first threshold strictly greater than its luma, so a luma exactly on a
//! threshold belongs to the band above. Padding thresholds are 1.0, which
//! in-range luma never reaches; luma at or above 1.0 (pure white) folds
//! into the last active band.
//!
//! Thresholds are narrowed to `f32` once, when the snapshot is built. The
//! CPU and GPU kernels then compare the same `f32` values with the same
//! strict comparison, which is what keeps their band choices identical.
//!
//! ## Level Count Changes
//!
//! Changing the level count resets proportions to uniform and regenerates
//! the colors of all active levels from the default grayscale ramp. Colors
//! on levels above the new count are kept, so shrinking and regrowing does
//! not lose them until those levels become active again.

pub mod api;
pub mod color;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod kernel;
pub mod levels;
pub mod output;
pub mod palette;
pub mod params;
pub mod source;


pub use api::{StudyError, ValueStudy};
pub use color::{Hsv, Rgb, Rgba};
pub use kernel::{classify_luma, classify_pixel, RenderSnapshot, ShaderUniforms};
pub use levels::{LevelError, Proportions, Thresholds};
pub use output::PosterizedImage;
pub use palette::{
    generate_default_ramp, to_color_table, ColorTable, LevelColors, PaletteError,
    ParseColorError,
};
pub use params::{ShadingParameters, StagedColor};
pub use source::{ImageError, SourceImage};
