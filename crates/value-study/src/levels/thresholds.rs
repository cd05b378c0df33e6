//! Cumulative luma thresholds

use super::MAX_THRESHOLDS;

/// Sentinel used to pad unused threshold slots.
///
/// No luma in 0.0..1.0 is ever at or above it, so sentinel bands are
/// unreachable for in-range input.
pub const THRESHOLD_SENTINEL: f32 = 1.0;

/// Monotonic non-decreasing band boundaries in 0.0..=1.0.
///
/// Holds exactly `level_count - 1` entries. Band `i` covers lumas in
/// `[t[i-1], t[i])`; the last band is everything at or above the final
/// threshold.
///
/// Values are `f32` because that is what both kernels compare against;
/// converting once here keeps the CPU and GPU paths on identical bits.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    values: Vec<f32>,
}

impl Thresholds {
    pub(crate) fn from_values(values: Vec<f32>) -> Self {
        debug_assert!(values.len() <= MAX_THRESHOLDS);
        debug_assert!(values.windows(2).all(|w| w[0] <= w[1]));
        Self { values }
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of bands these thresholds separate.
    #[inline]
    pub fn band_count(&self) -> usize {
        self.values.len() + 1
    }

    /// Band index of a luma value.
    ///
    /// Index of the first threshold strictly greater than `luma`, or the
    /// number of thresholds if none is. A luma equal to a threshold lands
    /// in the band above it.
    ///
    /// ```
    /// use value_study::Proportions;
    ///
    /// let thresholds = Proportions::new(3).thresholds();
    /// assert_eq!(thresholds.band_of(0.0), 0);
    /// assert_eq!(thresholds.band_of(1.0 / 3.0), 1);
    /// assert_eq!(thresholds.band_of(0.9), 2);
    /// ```
    pub fn band_of(&self, luma: f32) -> usize {
        self.values
            .iter()
            .position(|&t| luma < t)
            .unwrap_or(self.values.len())
    }

    /// Fixed-size form bound to the kernels: thresholds followed by
    /// [`THRESHOLD_SENTINEL`] padding.
    pub fn to_padded(&self) -> [f32; MAX_THRESHOLDS] {
        let mut padded = [THRESHOLD_SENTINEL; MAX_THRESHOLDS];
        padded[..self.values.len()].copy_from_slice(&self.values);
        padded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_fills_sentinels() {
        let t = Thresholds::from_values(vec![0.25, 0.5]);
        let padded = t.to_padded();
        assert_eq!(&padded[..2], &[0.25, 0.5]);
        assert!(padded[2..].iter().all(|&v| v == THRESHOLD_SENTINEL));
    }

    #[test]
    fn test_band_of_equal_goes_up() {
        let t = Thresholds::from_values(vec![0.25, 0.5]);
        assert_eq!(t.band_of(0.2499), 0);
        assert_eq!(t.band_of(0.25), 1);
        assert_eq!(t.band_of(0.5), 2);
        assert_eq!(t.band_of(1.0), 2);
    }

    #[test]
    fn test_band_of_nan_is_last_band() {
        let t = Thresholds::from_values(vec![0.25, 0.5]);
        assert_eq!(t.band_of(f32::NAN), 2);
    }

    #[test]
    fn test_band_count() {
        let t = Thresholds::from_values(vec![0.5]);
        assert_eq!(t.band_count(), 2);
        assert_eq!(t.len(), 1);
        assert!(!t.is_empty());
    }
}
