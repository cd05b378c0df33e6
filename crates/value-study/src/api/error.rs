//! Unified error type for the value-study public API.
//!
//! [`StudyError`] wraps all error types from the crate into a single enum
//! for convenient `?` propagation in application code.

use std::fmt;

use crate::levels::LevelError;
use crate::palette::{PaletteError, ParseColorError};
use crate::source::ImageError;

/// Unified error type for the value-study public API.
///
/// # Example
///
/// ```
/// use value_study::{Hsv, StudyError, ValueStudy};
///
/// fn study_with(color: &str) -> Result<ValueStudy, StudyError> {
///     let color: Hsv = color.parse()?;
///     Ok(ValueStudy::new().color(0, color))
/// }
///
/// assert!(study_with("#123").is_ok());
/// assert!(study_with("nope").is_err());
/// ```
#[derive(Debug)]
pub enum StudyError {
    /// Invalid level or proportion edit
    Level(LevelError),
    /// Invalid level color edit
    Palette(PaletteError),
    /// Color string could not be parsed
    ParseColor(ParseColorError),
    /// Source image rejected
    Image(ImageError),
    /// GPU backend failure
    #[cfg(feature = "gpu")]
    Gpu(crate::gpu::GpuError),
}

impl fmt::Display for StudyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudyError::Level(err) => write!(f, "level error: {}", err),
            StudyError::Palette(err) => write!(f, "palette error: {}", err),
            StudyError::ParseColor(err) => write!(f, "color parse error: {}", err),
            StudyError::Image(err) => write!(f, "image error: {}", err),
            #[cfg(feature = "gpu")]
            StudyError::Gpu(err) => write!(f, "gpu error: {}", err),
        }
    }
}

impl std::error::Error for StudyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StudyError::Level(err) => Some(err),
            StudyError::Palette(err) => Some(err),
            StudyError::ParseColor(err) => Some(err),
            StudyError::Image(err) => Some(err),
            #[cfg(feature = "gpu")]
            StudyError::Gpu(err) => Some(err),
        }
    }
}

impl From<LevelError> for StudyError {
    fn from(err: LevelError) -> Self {
        StudyError::Level(err)
    }
}

impl From<PaletteError> for StudyError {
    fn from(err: PaletteError) -> Self {
        StudyError::Palette(err)
    }
}

impl From<ParseColorError> for StudyError {
    fn from(err: ParseColorError) -> Self {
        StudyError::ParseColor(err)
    }
}

impl From<ImageError> for StudyError {
    fn from(err: ImageError) -> Self {
        StudyError::Image(err)
    }
}

#[cfg(feature = "gpu")]
impl From<crate::gpu::GpuError> for StudyError {
    fn from(err: crate::gpu::GpuError) -> Self {
        StudyError::Gpu(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_prefixes_and_source() {
        let err = StudyError::from(ImageError::EmptyImage);
        assert_eq!(err.to_string(), "image error: image has zero width or height");
        assert!(err.source().is_some());

        let err = StudyError::from(PaletteError::NoStagedColor);
        assert_eq!(err.to_string(), "palette error: no color edit in progress");
    }
}
