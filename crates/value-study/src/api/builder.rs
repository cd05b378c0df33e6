//! ValueStudy builder -- the primary ergonomic entry point for the crate.
//!
//! [`ValueStudy`] collects level count, proportions, colors and the
//! posterize flag, validates them once in [`build()`](ValueStudy::build),
//! and renders with the CPU kernel.

use super::error::StudyError;
use crate::color::Hsv;
use crate::kernel;
use crate::levels::{clamp_levels, LevelError, Proportions, DEFAULT_LEVELS};
use crate::output::PosterizedImage;
use crate::palette::LevelColors;
use crate::params::ShadingParameters;
use crate::source::SourceImage;

/// High-level value study builder.
///
/// - Configuration methods consume and return `self`
/// - [`render()`](Self::render) takes `&self` so one study can be applied
///   to many images
/// - The level count is clamped to 2..=11, never rejected
///
/// # Example
///
/// ```
/// use value_study::{Hsv, SourceImage, ValueStudy};
///
/// let study = ValueStudy::new()
///     .levels(4)
///     .proportions(&[1.0, 2.0, 2.0, 1.0])
///     .color(3, Hsv::new(0.15, 0.3, 1.0));
///
/// let source = SourceImage::from_rgba8(2, 1, &[20, 20, 20, 255, 240, 240, 240, 255]).unwrap();
/// let image = study.render(&source).unwrap();
///
/// assert_eq!(image.bands(), Some(&[0u8, 3][..]));
/// ```
#[derive(Debug, Clone)]
pub struct ValueStudy {
    level_count: usize,
    proportions: Option<Vec<f64>>,
    colors: Vec<(usize, Hsv)>,
    grayscale: bool,
}

impl Default for ValueStudy {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueStudy {
    /// Three uniform levels on the default ramp, posterize mode.
    pub fn new() -> Self {
        Self {
            level_count: DEFAULT_LEVELS,
            proportions: None,
            colors: Vec::new(),
            grayscale: true,
        }
    }

    /// Set the level count (clamped to 2..=11).
    #[inline]
    pub fn levels(mut self, level_count: usize) -> Self {
        self.level_count = clamp_levels(level_count);
        self
    }

    /// Set per-level proportions. Length must match the level count;
    /// values need not sum to 1.
    #[inline]
    pub fn proportions(mut self, weights: &[f64]) -> Self {
        self.proportions = Some(weights.to_vec());
        self
    }

    /// Override one active level's color.
    #[inline]
    pub fn color(mut self, level: usize, color: Hsv) -> Self {
        self.colors.push((level, color));
        self
    }

    /// `true` posterizes (default), `false` passes pixels through.
    #[inline]
    pub fn grayscale(mut self, enabled: bool) -> Self {
        self.grayscale = enabled;
        self
    }

    /// Validate and produce editable parameters.
    ///
    /// # Errors
    ///
    /// - [`LevelError::LengthMismatch`] if proportions don't match the level count
    /// - [`LevelError::NonFiniteProportion`] for NaN or infinite weights
    /// - [`PaletteError::IndexOutOfRange`](crate::PaletteError) for a color
    ///   on an inactive level
    pub fn build(&self) -> Result<ShadingParameters, StudyError> {
        let proportions = match &self.proportions {
            Some(weights) => {
                if weights.len() != self.level_count {
                    return Err(LevelError::LengthMismatch {
                        expected: self.level_count,
                        actual: weights.len(),
                    }
                    .into());
                }
                Proportions::from_weights(weights)?
            }
            None => Proportions::new(self.level_count),
        };

        let mut params = ShadingParameters::new(
            proportions,
            LevelColors::for_level_count(self.level_count),
            self.grayscale,
        );
        for &(level, color) in &self.colors {
            params.set_color(level, color)?;
        }
        Ok(params)
    }

    /// Build and render `source` on the CPU.
    pub fn render(&self, source: &SourceImage) -> Result<PosterizedImage, StudyError> {
        let params = self.build()?;
        Ok(kernel::render(source, &params.snapshot()))
    }
}
