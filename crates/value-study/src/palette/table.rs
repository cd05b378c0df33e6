//! Flattened RGB color table bound to the kernels.

use crate::color::{Hsv, Rgb};
use crate::levels::MAX_LEVELS;

/// RGB color per band, padded with white to [`MAX_LEVELS`] entries.
///
/// Only the first `level_count` entries are ever selected by the kernel;
/// the padding exists so the table has a fixed layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTable {
    entries: [[f32; 3]; MAX_LEVELS],
}

impl Default for ColorTable {
    fn default() -> Self {
        Self {
            entries: [Rgb::WHITE.to_array(); MAX_LEVELS],
        }
    }
}

impl ColorTable {
    /// Convert the first `level_count` colors to RGB.
    ///
    /// Shorter input than `level_count` leaves the remaining entries white.
    ///
    /// ```
    /// use value_study::{ColorTable, Hsv};
    ///
    /// let table = ColorTable::from_hsv(&[Hsv::BLACK, Hsv::gray(0.5)], 2);
    /// assert_eq!(table.as_array()[0], [0.0, 0.0, 0.0]);
    /// assert_eq!(table.as_array()[1], [0.5, 0.5, 0.5]);
    /// assert_eq!(table.as_array()[2], [1.0, 1.0, 1.0]);
    /// ```
    pub fn from_hsv(colors: &[Hsv], level_count: usize) -> Self {
        let mut table = Self::default();
        let count = level_count.min(MAX_LEVELS);
        for (entry, color) in table.entries.iter_mut().zip(colors).take(count) {
            *entry = color.to_rgb().to_array();
        }
        table
    }

    #[inline]
    pub fn as_array(&self) -> &[[f32; 3]; MAX_LEVELS] {
        &self.entries
    }

    /// Color of a band. Out-of-range bands read as white.
    #[inline]
    pub fn get(&self, band: usize) -> Rgb {
        self.entries
            .get(band)
            .map_or(Rgb::WHITE, |&rgb| Rgb::from_array(rgb))
    }
}

/// Free-function form of [`ColorTable::from_hsv`].
pub fn to_color_table(colors: &[Hsv], level_count: usize) -> [[f32; 3]; MAX_LEVELS] {
    *ColorTable::from_hsv(colors, level_count).as_array()
}
