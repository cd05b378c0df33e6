//! Per-level proportions and threshold derivation

use super::error::LevelError;
use super::thresholds::Thresholds;
use super::{clamp_level_count, clamp_levels, DEFAULT_LEVELS};

/// Relative share of the luma range given to each level.
///
/// Always holds exactly `level_count` non-negative entries summing to 1
/// (within 1e-6). Every edit renormalizes; resizing resets to uniform.
///
/// Proportions are kept in `f64` so repeated slider edits do not drift.
/// [`thresholds()`](Self::thresholds) narrows to `f32` once, at the edge.
///
/// # Example
///
/// ```
/// use value_study::Proportions;
///
/// let mut p = Proportions::new(3);
/// p.set_proportion(0, 2.0).unwrap();
///
/// // 2 : 1/3 : 1/3, renormalized
/// let sum: f64 = p.as_slice().iter().sum();
/// assert!((sum - 1.0).abs() < 1e-9);
/// assert!(p.as_slice()[0] > p.as_slice()[1]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Proportions {
    weights: Vec<f64>,
}

impl Default for Proportions {
    fn default() -> Self {
        Self::new(DEFAULT_LEVELS)
    }
}

impl Proportions {
    /// Uniform proportions over `level_count` levels (clamped to 2..=11).
    pub fn new(level_count: usize) -> Self {
        Self {
            weights: uniform(clamp_levels(level_count)),
        }
    }

    /// Proportions from raw weights, renormalized.
    ///
    /// `weights.len()` sets the level count and must already be in 2..=11;
    /// the weights themselves need not sum to 1.
    ///
    /// # Errors
    ///
    /// - [`LevelError::LengthMismatch`] if the length is outside 2..=11
    /// - [`LevelError::NonFiniteProportion`] if any weight is NaN or infinite
    pub fn from_weights(weights: &[f64]) -> Result<Self, LevelError> {
        let expected = clamp_levels(weights.len());
        if expected != weights.len() {
            return Err(LevelError::LengthMismatch {
                expected,
                actual: weights.len(),
            });
        }
        if let Some((index, &value)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
            return Err(LevelError::NonFiniteProportion { index, value });
        }

        let mut proportions = Self {
            weights: weights.iter().map(|&w| w.max(0.0)).collect(),
        };
        proportions.renormalize();
        Ok(proportions)
    }

    #[inline]
    pub fn level_count(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// Set the level count, clamped to 2..=11.
    ///
    /// Returns `true` if the count changed, in which case proportions are
    /// reset to uniform. An unchanged count leaves edits untouched.
    pub fn set_level_count(&mut self, level_count: usize) -> bool {
        self.resize(clamp_levels(level_count))
    }

    /// Step the level count by `delta` (the ± buttons), clamped to 2..=11.
    ///
    /// Returns `true` if the count changed.
    pub fn adjust(&mut self, delta: i32) -> bool {
        let target = clamp_level_count(self.level_count() as i64 + i64::from(delta));
        self.resize(target)
    }

    fn resize(&mut self, level_count: usize) -> bool {
        if level_count == self.level_count() {
            return false;
        }
        self.weights = uniform(level_count);
        true
    }

    /// Set one level's share, then renormalize all levels to sum to 1.
    ///
    /// Values above 1 are accepted (they are just large relative weights).
    /// Negative values count as 0. If the edit leaves nothing to normalize
    /// against (every weight 0), proportions fall back to uniform.
    ///
    /// # Errors
    ///
    /// - [`LevelError::IndexOutOfRange`] if `index >= level_count`
    /// - [`LevelError::NonFiniteProportion`] if `value` is NaN or infinite
    pub fn set_proportion(&mut self, index: usize, value: f64) -> Result<(), LevelError> {
        if index >= self.level_count() {
            return Err(LevelError::IndexOutOfRange {
                index,
                level_count: self.level_count(),
            });
        }
        if !value.is_finite() {
            return Err(LevelError::NonFiniteProportion { index, value });
        }

        self.weights[index] = value.max(0.0);
        self.renormalize();
        Ok(())
    }

    /// Every level gets `1 / level_count`.
    pub fn reset_to_uniform(&mut self) {
        self.weights = uniform(self.level_count());
    }

    fn renormalize(&mut self) {
        let sum: f64 = self.weights.iter().sum();
        if !sum.is_finite() || sum <= 0.0 {
            self.reset_to_uniform();
            return;
        }
        for w in &mut self.weights {
            *w /= sum;
        }
    }

    /// Cumulative band boundaries: the running sum of the proportions,
    /// without its final (≈1.0) entry.
    ///
    /// The result always has `level_count - 1` entries, is non-decreasing
    /// and stays within 0.0..=1.0.
    ///
    /// ```
    /// use value_study::Proportions;
    ///
    /// let t = Proportions::new(4).thresholds();
    /// assert_eq!(t.as_slice(), &[0.25, 0.5, 0.75]);
    /// ```
    pub fn thresholds(&self) -> Thresholds {
        let mut running = 0.0f64;
        let values = self.weights[..self.level_count() - 1]
            .iter()
            .map(|&w| {
                running += w;
                running.clamp(0.0, 1.0) as f32
            })
            .collect();
        Thresholds::from_values(values)
    }
}

fn uniform(level_count: usize) -> Vec<f64> {
    vec![1.0 / level_count as f64; level_count]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(p: &Proportions) -> f64 {
        p.as_slice().iter().sum()
    }

    #[test]
    fn test_default_is_three_uniform() {
        let p = Proportions::default();
        assert_eq!(p.level_count(), 3);
        assert!(p.as_slice().iter().all(|&w| (w - 1.0 / 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_new_clamps() {
        assert_eq!(Proportions::new(0).level_count(), 2);
        assert_eq!(Proportions::new(1).level_count(), 2);
        assert_eq!(Proportions::new(12).level_count(), 11);
    }

    #[test]
    fn test_adjust_clamps_and_resets() {
        let mut p = Proportions::new(3);
        p.set_proportion(0, 5.0).unwrap();

        assert!(p.adjust(1));
        assert_eq!(p.level_count(), 4);
        assert!(p.as_slice().iter().all(|&w| w == 0.25));

        assert!(p.adjust(-10));
        assert_eq!(p.level_count(), 2);
        assert!(!p.adjust(-1));
        assert_eq!(p.level_count(), 2);

        assert!(p.set_level_count(50));
        assert_eq!(p.level_count(), 11);
        assert!(!p.adjust(1));
    }

    #[test]
    fn test_unchanged_count_keeps_edits() {
        let mut p = Proportions::new(3);
        p.set_proportion(1, 3.0).unwrap();
        let before = p.clone();
        assert!(!p.set_level_count(3));
        assert_eq!(p, before);
    }

    #[test]
    fn test_set_proportion_renormalizes() {
        let mut p = Proportions::new(2);
        p.set_proportion(0, 1.5).unwrap();
        // 1.5 : 0.5
        assert!((p.as_slice()[0] - 0.75).abs() < 1e-12);
        assert!((p.as_slice()[1] - 0.25).abs() < 1e-12);
        assert!((sum(&p) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_set_proportion_negative_counts_as_zero() {
        let mut p = Proportions::new(3);
        p.set_proportion(0, -1.0).unwrap();
        assert_eq!(p.as_slice()[0], 0.0);
        assert!((p.as_slice()[1] - 0.5).abs() < 1e-12);
        let t = p.thresholds();
        assert!(t.as_slice().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_zero_sum_falls_back_to_uniform() {
        let mut p = Proportions::new(2);
        p.set_proportion(0, 0.0).unwrap();
        // [0, 1]
        p.set_proportion(1, 0.0).unwrap();
        assert_eq!(p.as_slice(), &[0.5, 0.5]);
    }

    #[test]
    fn test_set_proportion_errors() {
        let mut p = Proportions::new(3);
        assert_eq!(
            p.set_proportion(3, 0.5),
            Err(LevelError::IndexOutOfRange {
                index: 3,
                level_count: 3
            })
        );
        assert!(matches!(
            p.set_proportion(0, f64::INFINITY),
            Err(LevelError::NonFiniteProportion { index: 0, .. })
        ));
        assert!(matches!(
            p.set_proportion(1, f64::NAN),
            Err(LevelError::NonFiniteProportion { index: 1, .. })
        ));
        // Rejected edits leave state alone
        assert_eq!(p, Proportions::new(3));
    }

    #[test]
    fn test_from_weights() {
        let p = Proportions::from_weights(&[1.0, 1.0, 2.0]).unwrap();
        assert_eq!(p.as_slice(), &[0.25, 0.25, 0.5]);
        assert_eq!(p.thresholds().as_slice(), &[0.25, 0.5]);

        assert_eq!(
            Proportions::from_weights(&[1.0]),
            Err(LevelError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(matches!(
            Proportions::from_weights(&[1.0, f64::NAN]),
            Err(LevelError::NonFiniteProportion { index: 1, .. })
        ));
    }

    #[test]
    fn test_thresholds_length_and_range() {
        for n in 2..=11 {
            let t = Proportions::new(n).thresholds();
            assert_eq!(t.len(), n - 1);
            assert!(t.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }
}
