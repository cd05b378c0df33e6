//! PNG export of rendered studies

use crate::error::ExportError;
use std::io::Cursor;
use std::path::Path;
use value_study::PosterizedImage;

/// Default download name: `valueator-image-<unix millis>.png`
pub fn default_file_name() -> String {
    format!(
        "valueator-image-{}.png",
        chrono::Utc::now().timestamp_millis()
    )
}

/// Encode a rendered image as an 8-bit RGBA PNG.
pub fn encode_png(image: &PosterizedImage) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ExportError::UnsupportedDimensions { width, height });
    }

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.to_rgba8())?;
    }
    Ok(buf.into_inner())
}

/// Re-compress PNG bytes with oxipng (zopfli + adaptive filters)
pub fn optimize_png(png_bytes: &[u8]) -> Result<Vec<u8>, ExportError> {
    oxipng::optimize_from_memory(
        png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .map_err(|e| ExportError::Optimize(e.to_string()))
}

/// Encode, optionally optimize, and write to `path`. Returns bytes written.
///
/// A failed optimization keeps the unoptimized PNG.
pub fn save_png(image: &PosterizedImage, path: &Path, optimize: bool) -> Result<usize, ExportError> {
    let mut bytes = encode_png(image)?;
    if optimize {
        match optimize_png(&bytes) {
            Ok(optimized) => {
                tracing::debug!(before = bytes.len(), after = optimized.len(), "Optimized PNG");
                bytes = optimized;
            }
            Err(e) => tracing::warn!(%e, "PNG optimization failed, keeping unoptimized output"),
        }
    }
    std::fs::write(path, &bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved PNG");
    Ok(bytes.len())
}
