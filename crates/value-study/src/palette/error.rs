//! Error types for palette operations
//!
//! This module provides error types for color parsing and level color edits.

use std::fmt;
use std::num::{ParseFloatError, ParseIntError};

/// Error type for parsing level color strings.
///
/// Returned by `Hsv::from_str` for both the `h,s,v` and the hex form.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// Hex string contains a character that is not a hex digit
    InvalidDigit(char),
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
    /// An `h,s,v` component is not a number
    InvalidNumber(ParseFloatError),
    /// Wrong number of comma-separated components (must be 3)
    ComponentCount(usize),
    /// An `h,s,v` component is outside 0..=1
    OutOfRange(f32),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl From<ParseFloatError> for ParseColorError {
    fn from(err: ParseFloatError) -> Self {
        ParseColorError::InvalidNumber(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidDigit(c) => {
                write!(f, "invalid hex digit {:?}", c)
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
            ParseColorError::InvalidNumber(err) => {
                write!(f, "invalid color component: {}", err)
            }
            ParseColorError::ComponentCount(count) => {
                write!(f, "expected 3 color components (h,s,v), got {}", count)
            }
            ParseColorError::OutOfRange(value) => {
                write!(f, "color component {} outside 0..=1", value)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            ParseColorError::InvalidNumber(err) => Some(err),
            _ => None,
        }
    }
}

/// Error type for level color edits.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// Level index is outside the 11 color slots, or outside the active levels
    IndexOutOfRange {
        /// Requested level index
        index: usize,
        /// Number of addressable levels
        limit: usize,
    },
    /// Confirm or reset was requested with no color edit in progress
    NoStagedColor,
    /// Invalid color string
    ParseColor(ParseColorError),
}

impl From<ParseColorError> for PaletteError {
    fn from(err: ParseColorError) -> Self {
        PaletteError::ParseColor(err)
    }
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::IndexOutOfRange { index, limit } => {
                write!(f, "color level {} out of range (limit {})", index, limit)
            }
            PaletteError::NoStagedColor => {
                write!(f, "no color edit in progress")
            }
            PaletteError::ParseColor(err) => {
                write!(f, "invalid color: {}", err)
            }
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_parse_color_display() {
        assert_eq!(
            ParseColorError::ComponentCount(2).to_string(),
            "expected 3 color components (h,s,v), got 2"
        );
        assert_eq!(
            ParseColorError::OutOfRange(1.5).to_string(),
            "color component 1.5 outside 0..=1"
        );
        assert_eq!(
            ParseColorError::InvalidDigit('+').to_string(),
            "invalid hex digit '+'"
        );
    }

    #[test]
    fn test_palette_error_source_chain() {
        let inner: ParseColorError = "zz".parse::<u8>().unwrap_err().into();
        let err = PaletteError::from(inner);
        assert!(err.to_string().starts_with("invalid color: invalid hex character"));
        assert!(err.source().is_some());
        assert!(PaletteError::NoStagedColor.source().is_none());
    }
}
