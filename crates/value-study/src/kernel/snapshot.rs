//! Frozen render parameters.

use super::classify_luma;
use crate::color::Rgb;
use crate::levels::{Thresholds, MAX_THRESHOLDS};
use crate::palette::{ColorTable, LevelColors};

/// Everything one render needs, captured before it starts.
///
/// Built from the current parameters after every edit and then only read,
/// so a render in progress never observes a half-applied change.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    thresholds: [f32; MAX_THRESHOLDS],
    colors: ColorTable,
    level_count: usize,
    grayscale: bool,
}

impl RenderSnapshot {
    /// Freeze thresholds and the active colors.
    ///
    /// The level count is taken from the thresholds, so the color table
    /// always covers exactly the reachable bands.
    pub fn new(thresholds: &Thresholds, colors: &LevelColors, grayscale: bool) -> Self {
        let level_count = thresholds.band_count();
        Self {
            thresholds: thresholds.to_padded(),
            colors: colors.color_table(level_count),
            level_count,
            grayscale,
        }
    }

    #[inline]
    pub fn thresholds(&self) -> &[f32; MAX_THRESHOLDS] {
        &self.thresholds
    }

    #[inline]
    pub fn color_table(&self) -> &ColorTable {
        &self.colors
    }

    #[inline]
    pub fn level_count(&self) -> usize {
        self.level_count
    }

    /// `true` posterizes, `false` passes pixels through.
    #[inline]
    pub fn grayscale(&self) -> bool {
        self.grayscale
    }

    /// Band a luma value falls in, limited to the active levels.
    ///
    /// [`classify_luma`] can return a sentinel band for luma at or above
    /// 1.0 (or NaN); those are folded into the last active band.
    #[inline]
    pub fn band_of(&self, luma: f32) -> usize {
        classify_luma(luma, &self.thresholds).min(self.level_count - 1)
    }

    #[inline]
    pub fn color(&self, band: usize) -> Rgb {
        self.colors.get(band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::Proportions;

    #[test]
    fn test_white_lands_in_last_active_band() {
        let snapshot = RenderSnapshot::new(
            &Proportions::new(3).thresholds(),
            &LevelColors::default(),
            true,
        );
        assert_eq!(snapshot.band_of(1.0), 2);
        assert_eq!(snapshot.band_of(f32::NAN), 2);
        assert_eq!(snapshot.color(2), Rgb::WHITE);
    }

    #[test]
    fn test_level_count_follows_thresholds() {
        let snapshot = RenderSnapshot::new(
            &Proportions::new(7).thresholds(),
            &LevelColors::for_level_count(7),
            false,
        );
        assert_eq!(snapshot.level_count(), 7);
        assert!(!snapshot.grayscale());
        assert_eq!(snapshot.thresholds()[6..], [1.0; 4]);
    }
}
