//! Level colors and the color table
//!
//! This module owns the 11 per-level HSV colors, the default grayscale
//! ramp, and the conversion into the RGB table the kernel looks bands up
//! in.

mod error;
mod level_colors;
mod table;

pub use error::{PaletteError, ParseColorError};
pub use level_colors::{default_color, generate_default_ramp, LevelColors};
pub use table::{to_color_table, ColorTable};
