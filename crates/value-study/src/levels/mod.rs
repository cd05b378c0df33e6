//! Level count, proportions and luma thresholds
//!
//! A study splits the luma range 0.0..=1.0 into `level_count` bands. The
//! user controls the relative width of each band through [`Proportions`];
//! their running sum gives the [`Thresholds`] the kernel classifies
//! against.
//!
//! ```
//! use value_study::Proportions;
//!
//! let mut p = Proportions::new(3);
//! assert_eq!(p.thresholds().len(), 2);
//!
//! // ± buttons clamp to 2..=11 and reset proportions
//! p.adjust(-5);
//! assert_eq!(p.level_count(), 2);
//! ```

mod error;
mod proportions;
mod thresholds;

pub use error::LevelError;
pub use proportions::Proportions;
pub use thresholds::{Thresholds, THRESHOLD_SENTINEL};

/// Fewest levels a study can have.
pub const MIN_LEVELS: usize = 2;

/// Most levels a study can have; also the color table length.
pub const MAX_LEVELS: usize = 11;

/// Threshold slots bound to the kernels.
pub const MAX_THRESHOLDS: usize = MAX_LEVELS - 1;

/// Level count of a fresh study.
pub const DEFAULT_LEVELS: usize = 3;

/// Clamp a requested level count into `MIN_LEVELS..=MAX_LEVELS`.
#[inline]
pub fn clamp_level_count(requested: i64) -> usize {
    requested.clamp(MIN_LEVELS as i64, MAX_LEVELS as i64) as usize
}

/// [`clamp_level_count`] for unsigned counts.
#[inline]
pub fn clamp_levels(requested: usize) -> usize {
    requested.clamp(MIN_LEVELS, MAX_LEVELS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_level_count() {
        assert_eq!(clamp_level_count(-3), 2);
        assert_eq!(clamp_level_count(2), 2);
        assert_eq!(clamp_level_count(7), 7);
        assert_eq!(clamp_level_count(11), 11);
        assert_eq!(clamp_level_count(i64::MAX), 11);
    }

    #[test]
    fn test_clamp_levels_unsigned() {
        assert_eq!(clamp_levels(0), 2);
        assert_eq!(clamp_levels(5), 5);
        assert_eq!(clamp_levels(usize::MAX), 11);
    }
}
