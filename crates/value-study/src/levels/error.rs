//! Error types for level and proportion edits

use std::fmt;

/// Error type for proportion edits.
///
/// Level count changes never fail (they clamp); only per-level edits that
/// name a band outside the active range or carry a non-finite value do.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// Level index is not below the active level count
    IndexOutOfRange {
        /// Requested level index
        index: usize,
        /// Active level count
        level_count: usize,
    },
    /// Proportion value is NaN or infinite
    NonFiniteProportion {
        /// Level index the value was meant for
        index: usize,
        /// Offending value
        value: f64,
    },
    /// Proportion list length does not match the level count
    LengthMismatch {
        /// Active level count
        expected: usize,
        /// Number of proportions supplied
        actual: usize,
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::IndexOutOfRange { index, level_count } => {
                write!(
                    f,
                    "level index {} out of range (level count is {})",
                    index, level_count
                )
            }
            LevelError::NonFiniteProportion { index, value } => {
                write!(f, "proportion for level {} is not finite: {}", index, value)
            }
            LevelError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "expected {} proportions, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for LevelError {}
