//! Editable study parameters
//!
//! [`ShadingParameters`] is the single owner of everything a user can change
//! between renders: level count, proportions, level colors, the
//! posterize/passthrough flag and an in-progress color edit. Renders never
//! read it directly; they take a [`RenderSnapshot`].

use crate::color::Hsv;
use crate::kernel::RenderSnapshot;
use crate::levels::{LevelError, Proportions, Thresholds};
use crate::palette::{default_color, LevelColors, PaletteError};

/// A color edit that has not been confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagedColor {
    /// Level being edited
    pub level: usize,
    /// Color shown in the picker
    pub color: Hsv,
}

/// Owned study state.
///
/// # Example
///
/// ```
/// use value_study::{Hsv, ShadingParameters};
///
/// let mut params = ShadingParameters::default();
/// params.adjust_levels(2);
/// assert_eq!(params.level_count(), 5);
///
/// params.begin_color_edit(4).unwrap();
/// params.update_staged_color(Hsv::new(0.6, 0.5, 0.9)).unwrap();
/// params.confirm_color_edit().unwrap();
/// assert_eq!(params.colors().get(4), Some(Hsv::new(0.6, 0.5, 0.9)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingParameters {
    proportions: Proportions,
    colors: LevelColors,
    grayscale: bool,
    staged: Option<StagedColor>,
}

impl Default for ShadingParameters {
    fn default() -> Self {
        Self {
            proportions: Proportions::default(),
            colors: LevelColors::default(),
            grayscale: true,
            staged: None,
        }
    }
}

impl ShadingParameters {
    pub fn new(proportions: Proportions, colors: LevelColors, grayscale: bool) -> Self {
        Self {
            proportions,
            colors,
            grayscale,
            staged: None,
        }
    }

    #[inline]
    pub fn level_count(&self) -> usize {
        self.proportions.level_count()
    }

    #[inline]
    pub fn proportions(&self) -> &Proportions {
        &self.proportions
    }

    #[inline]
    pub fn colors(&self) -> &LevelColors {
        &self.colors
    }

    #[inline]
    pub fn grayscale(&self) -> bool {
        self.grayscale
    }

    #[inline]
    pub fn staged_color(&self) -> Option<StagedColor> {
        self.staged
    }

    pub fn thresholds(&self) -> Thresholds {
        self.proportions.thresholds()
    }

    /// Step the level count. On change, proportions reset to uniform and
    /// active colors are regenerated from the default ramp.
    pub fn adjust_levels(&mut self, delta: i32) -> bool {
        let changed = self.proportions.adjust(delta);
        if changed {
            self.on_level_count_changed();
        }
        changed
    }

    /// Set the level count (clamped to 2..=11). Same effects as
    /// [`adjust_levels`](Self::adjust_levels).
    pub fn set_level_count(&mut self, level_count: usize) -> bool {
        let changed = self.proportions.set_level_count(level_count);
        if changed {
            self.on_level_count_changed();
        }
        changed
    }

    fn on_level_count_changed(&mut self) {
        self.colors.apply_level_count(self.level_count());
        // A staged edit for a level that no longer exists is dropped
        if matches!(self.staged, Some(s) if s.level >= self.level_count()) {
            self.staged = None;
        }
    }

    pub fn set_proportion(&mut self, index: usize, value: f64) -> Result<(), LevelError> {
        self.proportions.set_proportion(index, value)
    }

    pub fn reset_proportions(&mut self) {
        self.proportions.reset_to_uniform();
    }

    /// Replace a level color directly, bypassing the staged edit.
    pub fn set_color(&mut self, level: usize, color: Hsv) -> Result<(), PaletteError> {
        self.check_active(level)?;
        self.colors.set(level, color)
    }

    pub fn set_grayscale(&mut self, grayscale: bool) {
        self.grayscale = grayscale;
    }

    /// Flip between posterize and passthrough. Returns the new flag.
    pub fn toggle_grayscale(&mut self) -> bool {
        self.grayscale = !self.grayscale;
        self.grayscale
    }

    /// Start editing a level's color; the current color is staged.
    ///
    /// Any edit already in progress is discarded.
    pub fn begin_color_edit(&mut self, level: usize) -> Result<Hsv, PaletteError> {
        self.check_active(level)?;
        let color = self
            .colors
            .get(level)
            .ok_or(PaletteError::IndexOutOfRange {
                index: level,
                limit: self.level_count(),
            })?;
        self.staged = Some(StagedColor { level, color });
        Ok(color)
    }

    /// Replace the staged color. Level colors are not touched until
    /// [`confirm_color_edit`](Self::confirm_color_edit).
    pub fn update_staged_color(&mut self, color: Hsv) -> Result<(), PaletteError> {
        let staged = self.staged.as_mut().ok_or(PaletteError::NoStagedColor)?;
        staged.color = color;
        Ok(())
    }

    /// Stage the default-ramp color for the level being edited.
    pub fn reset_staged_color(&mut self) -> Result<Hsv, PaletteError> {
        let level_count = self.level_count();
        let staged = self.staged.as_mut().ok_or(PaletteError::NoStagedColor)?;
        staged.color = default_color(staged.level, level_count)?;
        Ok(staged.color)
    }

    /// Write the staged color into its level and end the edit.
    pub fn confirm_color_edit(&mut self) -> Result<StagedColor, PaletteError> {
        let staged = self.staged.take().ok_or(PaletteError::NoStagedColor)?;
        self.colors.set(staged.level, staged.color)?;
        Ok(staged)
    }

    /// End the edit without changing any level color.
    pub fn cancel_color_edit(&mut self) -> Option<StagedColor> {
        self.staged.take()
    }

    /// Every slot back to the default ramp for the current level count.
    pub fn reset_all_colors(&mut self) {
        self.colors.reset_all(self.level_count());
    }

    /// Freeze the current state for a render.
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::new(&self.thresholds(), &self.colors, self.grayscale)
    }

    fn check_active(&self, level: usize) -> Result<(), PaletteError> {
        if level >= self.level_count() {
            return Err(PaletteError::IndexOutOfRange {
                index: level,
                limit: self.level_count(),
            });
        }
        Ok(())
    }
}
