//! The 11 per-level color slots and the default grayscale ramp.

use super::error::PaletteError;
use super::table::ColorTable;
use crate::color::Hsv;
use crate::levels::{DEFAULT_LEVELS, MAX_LEVELS};

/// Evenly spaced grays from black to white over `level_count` levels.
///
/// Slot `i < level_count` gets value `i / (level_count - 1)`; remaining
/// slots are white. A count of 0 or 1 yields a single black level.
///
/// ```
/// use value_study::{generate_default_ramp, Hsv};
///
/// let ramp = generate_default_ramp(5);
/// assert_eq!(ramp[2], Hsv::gray(0.5));
/// assert_eq!(ramp[4], Hsv::WHITE);
/// assert_eq!(ramp[10], Hsv::WHITE);
/// ```
pub fn generate_default_ramp(level_count: usize) -> [Hsv; MAX_LEVELS] {
    let mut ramp = [Hsv::WHITE; MAX_LEVELS];
    if level_count <= 1 {
        ramp[0] = Hsv::BLACK;
        return ramp;
    }

    let count = level_count.min(MAX_LEVELS);
    let last = (count - 1) as f32;
    for (i, slot) in ramp.iter_mut().take(count).enumerate() {
        *slot = Hsv::gray(i as f32 / last);
    }
    ramp
}

/// Per-level HSV colors.
///
/// Always holds [`MAX_LEVELS`] slots. Slots at or above the active level
/// count are inert: they are kept so a color survives shrinking and then
/// growing the level count again, but they never reach the color table.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelColors {
    slots: [Hsv; MAX_LEVELS],
}

impl Default for LevelColors {
    /// Black, mid-gray, white, then white: the ramp for the default three
    /// levels.
    fn default() -> Self {
        Self {
            slots: generate_default_ramp(DEFAULT_LEVELS),
        }
    }
}

impl LevelColors {
    /// Slots set to the default ramp for `level_count`.
    pub fn for_level_count(level_count: usize) -> Self {
        Self {
            slots: generate_default_ramp(level_count),
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[Hsv] {
        &self.slots
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<Hsv> {
        self.slots.get(index).copied()
    }

    /// Replace one slot.
    ///
    /// # Errors
    ///
    /// [`PaletteError::IndexOutOfRange`] if `index >= MAX_LEVELS`.
    pub fn set(&mut self, index: usize, color: Hsv) -> Result<(), PaletteError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(PaletteError::IndexOutOfRange {
                index,
                limit: MAX_LEVELS,
            })?;
        *slot = color;
        Ok(())
    }

    /// Apply a level count change.
    ///
    /// Slots below `level_count` are regenerated from the default ramp;
    /// slots at or above it keep whatever color they held.
    pub fn apply_level_count(&mut self, level_count: usize) {
        let ramp = generate_default_ramp(level_count);
        let count = level_count.min(MAX_LEVELS);
        self.slots[..count].copy_from_slice(&ramp[..count]);
    }

    /// Reset one slot to its default-ramp color for `level_count`.
    pub fn reset_level(&mut self, index: usize, level_count: usize) -> Result<(), PaletteError> {
        let color = default_color(index, level_count)?;
        self.set(index, color)
    }

    /// Reset every slot to the default ramp for `level_count`.
    pub fn reset_all(&mut self, level_count: usize) {
        self.slots = generate_default_ramp(level_count);
    }

    /// The RGB table for the first `level_count` slots.
    pub fn color_table(&self, level_count: usize) -> ColorTable {
        ColorTable::from_hsv(&self.slots, level_count)
    }
}

/// Default-ramp color of a single level.
pub fn default_color(index: usize, level_count: usize) -> Result<Hsv, PaletteError> {
    generate_default_ramp(level_count)
        .get(index)
        .copied()
        .ok_or(PaletteError::IndexOutOfRange {
            index,
            limit: MAX_LEVELS,
        })
}
