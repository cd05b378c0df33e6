//! Render output
//!
//! [`PosterizedImage`] is what both the CPU kernel and the GPU backend
//! return.

mod posterized;

pub use posterized::PosterizedImage;
