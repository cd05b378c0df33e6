//! CPU posterization kernel
//!
//! The reference implementation of per-pixel classification. The WGSL
//! kernel in [`gpu`](crate::gpu) (feature `gpu`) mirrors it operation for
//! operation; [`classify_luma`] is the function the two must agree on.
//!
//! Per pixel:
//!
//! 1. passthrough mode returns the pixel unchanged;
//! 2. luma `Y = 0.299r + 0.587g + 0.114b` on the encoded channels;
//! 3. band = first threshold strictly greater than `Y`;
//! 4. output the band's color with the source alpha.

mod snapshot;
mod uniforms;

pub use snapshot::RenderSnapshot;
pub use uniforms::{ShaderUniforms, THRESHOLD_LANES};

use rayon::prelude::*;

use crate::color::Rgba;
use crate::levels::MAX_THRESHOLDS;
use crate::output::PosterizedImage;
use crate::source::SourceImage;

/// Pixel count from which [`render`] switches to rayon.
pub const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Band index of a luma value against padded thresholds.
///
/// Walks the thresholds in order and stops at the first one strictly
/// greater than `luma`; returns [`MAX_THRESHOLDS`] (10) if none is. This
/// is the literal comparison chain the shader performs.
///
/// ```
/// use value_study::classify_luma;
///
/// let t = [0.25, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
/// assert_eq!(classify_luma(0.1, &t), 0);
/// assert_eq!(classify_luma(0.25, &t), 1);
/// assert_eq!(classify_luma(0.99, &t), 2);
/// assert_eq!(classify_luma(1.0, &t), 10);
/// ```
#[inline]
pub fn classify_luma(luma: f32, thresholds: &[f32; MAX_THRESHOLDS]) -> usize {
    for (band, &t) in thresholds.iter().enumerate() {
        if luma < t {
            return band;
        }
    }
    MAX_THRESHOLDS
}

/// Posterize one pixel.
#[inline]
pub fn classify_pixel(pixel: Rgba, snapshot: &RenderSnapshot) -> Rgba {
    if !snapshot.grayscale() {
        return pixel;
    }
    let band = snapshot.band_of(pixel.luma());
    snapshot.color(band).with_alpha(pixel.a)
}

/// Posterize a whole image on the CPU.
///
/// Rows are processed in parallel for images of at least
/// [`PARALLEL_THRESHOLD`] pixels, sequentially below that. In passthrough
/// mode the output is a copy of the source and carries no band indices.
pub fn render(source: &SourceImage, snapshot: &RenderSnapshot) -> PosterizedImage {
    let (width, height) = (source.width(), source.height());

    if !snapshot.grayscale() {
        return PosterizedImage::passthrough(width, height, source.pixels().to_vec());
    }

    let pixels = source.pixels();
    let mut output = vec![Rgba::new(0.0, 0.0, 0.0, 0.0); pixels.len()];
    let mut bands = vec![0u8; pixels.len()];

    let row = width as usize;
    if pixels.len() >= PARALLEL_THRESHOLD {
        output
            .par_chunks_mut(row)
            .zip(bands.par_chunks_mut(row))
            .zip(pixels.par_chunks(row))
            .for_each(|((out, band), src)| posterize_row(src, out, band, snapshot));
    } else {
        posterize_row(pixels, &mut output, &mut bands, snapshot);
    }

    PosterizedImage::posterized(width, height, output, bands)
}

#[inline]
fn posterize_row(src: &[Rgba], out: &mut [Rgba], bands: &mut [u8], snapshot: &RenderSnapshot) {
    for ((pixel, dst), band_out) in src.iter().zip(out.iter_mut()).zip(bands.iter_mut()) {
        let band = snapshot.band_of(pixel.luma());
        *band_out = band as u8;
        *dst = snapshot.color(band).with_alpha(pixel.a);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::levels::Proportions;
    use crate::palette::LevelColors;

    fn snapshot(levels: usize, grayscale: bool) -> RenderSnapshot {
        RenderSnapshot::new(
            &Proportions::new(levels).thresholds(),
            &LevelColors::for_level_count(levels),
            grayscale,
        )
    }

    #[test]
    fn test_classify_luma_strict_less_than() {
        let t = [0.5; MAX_THRESHOLDS];
        assert_eq!(classify_luma(0.4999, &t), 0);
        assert_eq!(classify_luma(0.5, &t), MAX_THRESHOLDS);
    }

    #[test]
    fn test_classify_pixel_keeps_alpha() {
        let s = snapshot(3, true);
        let out = classify_pixel(Rgba::new(0.9, 0.9, 0.9, 0.25), &s);
        assert_eq!(out, Rgb::WHITE.with_alpha(0.25));
    }

    #[test]
    fn test_classify_pixel_passthrough() {
        let s = snapshot(3, false);
        let px = Rgba::new(0.1, 0.7, 0.3, 0.5);
        assert_eq!(classify_pixel(px, &s), px);
    }

    #[test]
    fn test_render_small_image_bands() {
        let s = snapshot(3, true);
        let source = SourceImage::new(
            3,
            1,
            vec![
                Rgba::new(0.0, 0.0, 0.0, 1.0),
                Rgba::new(0.5, 0.5, 0.5, 1.0),
                Rgba::new(1.0, 1.0, 1.0, 1.0),
            ],
        )
        .unwrap();
        let image = render(&source, &s);
        assert_eq!(image.bands(), Some(&[0u8, 1, 2][..]));
        assert_eq!(image.pixels()[1], Rgb::new(0.5, 0.5, 0.5).with_alpha(1.0));
    }

    #[test]
    fn test_render_parallel_matches_sequential() {
        let s = snapshot(5, true);
        let (w, h) = (512u32, 160u32);
        assert!((w * h) as usize >= PARALLEL_THRESHOLD);

        let pixels: Vec<Rgba> = (0..w * h)
            .map(|i| {
                let v = (i % 256) as f32 / 255.0;
                Rgba::new(v, 1.0 - v, v * 0.5, 1.0)
            })
            .collect();
        let source = SourceImage::new(w, h, pixels.clone()).unwrap();

        let image = render(&source, &s);
        for (i, px) in pixels.iter().enumerate() {
            assert_eq!(image.pixels()[i], classify_pixel(*px, &s));
        }
    }

    #[test]
    fn test_render_passthrough_has_no_bands() {
        let s = snapshot(3, false);
        let source = SourceImage::from_rgba8(1, 1, &[10, 20, 30, 40]).unwrap();
        let image = render(&source, &s);
        assert!(image.bands().is_none());
        assert_eq!(image.pixels(), source.pixels());
    }
}
