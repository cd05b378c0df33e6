//! Image ingestion: decoding, compression and thumbnails
//!
//! Large uploads are scaled to fit 1920x1080 and re-encoded as JPEG before
//! they are stored. Every stored image also gets a 150px square thumbnail,
//! cover-cropped around its centre.

use crate::error::IngestError;
use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use value_study::SourceImage;

/// Files above this size are compressed before storing (2 MiB)
pub const COMPRESS_THRESHOLD: u64 = 2 * 1024 * 1024;

pub const MAX_WIDTH: u32 = 1920;
pub const MAX_HEIGHT: u32 = 1080;
pub const COMPRESS_QUALITY: u8 = 80;

pub const THUMBNAIL_SIZE: u32 = 150;
pub const THUMBNAIL_QUALITY: u8 = 70;
const THUMBNAIL_BACKGROUND: Rgba<u8> = Rgba([0xf0, 0xf0, 0xf0, 0xff]);

/// An uploaded image ready for the store
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub name: String,
    pub mime: String,
    pub original_size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    /// Stored image bytes (original or compressed JPEG)
    pub data: Vec<u8>,
    /// JPEG thumbnail bytes
    pub thumbnail: Vec<u8>,
    pub compressed: bool,
}

/// Decode encoded image bytes into a pipeline source image
pub fn decode_source(bytes: &[u8]) -> Result<SourceImage, IngestError> {
    let image = image::load_from_memory(bytes)?;
    to_source(&image)
}

/// Read and decode an image file
pub fn load_source(path: &Path) -> Result<SourceImage, IngestError> {
    let bytes = std::fs::read(path)?;
    decode_source(&bytes)
}

fn to_source(image: &DynamicImage) -> Result<SourceImage, IngestError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(IngestError::EmptyImage { width, height });
    }
    Ok(SourceImage::from_rgba8(width, height, rgba.as_raw())?)
}

/// Whether a file of `size` bytes should be compressed before storing
pub fn should_compress(size: u64) -> bool {
    size > COMPRESS_THRESHOLD
}

/// Dimensions scaled down to fit within `max_width` x `max_height`,
/// keeping the aspect ratio. Images that already fit are unchanged.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let ratio = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    (
        ((width as f64 * ratio).round() as u32).max(1),
        ((height as f64 * ratio).round() as u32).max(1),
    )
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, IngestError> {
    let rgb = image.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(&rgb)?;
    Ok(buf)
}

/// Scale to fit 1920x1080 and re-encode as JPEG (quality 80)
pub fn compress_image(image: &DynamicImage) -> Result<Vec<u8>, IngestError> {
    let (width, height) = fit_within(image.width(), image.height(), MAX_WIDTH, MAX_HEIGHT);
    if (width, height) == (image.width(), image.height()) {
        return encode_jpeg(image, COMPRESS_QUALITY);
    }
    let resized = image.resize_exact(width, height, FilterType::Triangle);
    encode_jpeg(&resized, COMPRESS_QUALITY)
}

/// Square JPEG thumbnail (quality 70).
///
/// The centred square spanning the shorter side is cropped out first and
/// then scaled to `size`. Transparent areas show a light gray background.
pub fn create_thumbnail(image: &DynamicImage, size: u32) -> Result<Vec<u8>, IngestError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(IngestError::EmptyImage { width, height });
    }

    let side = width.min(height);
    let square = image
        .crop_imm((width - side) / 2, (height - side) / 2, side, side)
        .to_rgba8();
    let cropped = imageops::resize(&square, size, size, FilterType::Triangle);

    let mut canvas = RgbaImage::from_pixel(size, size, THUMBNAIL_BACKGROUND);
    imageops::overlay(&mut canvas, &cropped, 0, 0);
    encode_jpeg(&DynamicImage::ImageRgba8(canvas), THUMBNAIL_QUALITY)
}

/// Human readable size: `0 Bytes`, `1.5 KB`, `2 MB`
pub fn format_file_size(bytes: u64) -> String {
    const SIZES: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZES.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SIZES[unit])
}

/// Decode an upload, compress it if needed and build its thumbnail
pub fn process_image_bytes(
    name: &str,
    bytes: Vec<u8>,
    last_modified: Option<DateTime<Utc>>,
) -> Result<ProcessedImage, IngestError> {
    let format = image::guess_format(&bytes)?;
    if !format.reading_enabled() {
        return Err(IngestError::UnsupportedType(
            format.to_mime_type().to_string(),
        ));
    }
    let image = image::load_from_memory_with_format(&bytes, format)?;
    if image.width() == 0 || image.height() == 0 {
        return Err(IngestError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }

    let original_size = bytes.len() as u64;
    let thumbnail = create_thumbnail(&image, THUMBNAIL_SIZE)?;

    let (data, mime, compressed) = if should_compress(original_size) {
        let data = compress_image(&image)?;
        tracing::debug!(
            name,
            original = %format_file_size(original_size),
            compressed = %format_file_size(data.len() as u64),
            "Compressed image"
        );
        (data, ImageFormat::Jpeg.to_mime_type().to_string(), true)
    } else {
        (bytes, format.to_mime_type().to_string(), false)
    };

    Ok(ProcessedImage {
        name: name.to_string(),
        mime,
        original_size,
        last_modified,
        data,
        thumbnail,
        compressed,
    })
}

/// Read an image file from disk and process it for the store
pub fn process_image_file(path: &Path) -> Result<ProcessedImage, IngestError> {
    let bytes = std::fs::read(path)?;
    let last_modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    process_image_bytes(&name, bytes, last_modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageEncoder;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        });
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                img.as_raw(),
                width,
                height,
                image::ExtendedColorType::Rgba8,
            )
            .unwrap();
        buf
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024 * 1024), "2 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_should_compress_threshold() {
        assert!(!should_compress(COMPRESS_THRESHOLD));
        assert!(should_compress(COMPRESS_THRESHOLD + 1));
    }

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(800, 600, 1920, 1080), (800, 600));
        assert_eq!(fit_within(3840, 2160, 1920, 1080), (1920, 1080));
        assert_eq!(fit_within(4000, 1000, 1920, 1080), (1920, 480));
        assert_eq!(fit_within(1000, 4000, 1920, 1080), (270, 1080));
    }

    #[test]
    fn test_decode_source_dimensions() {
        let source = decode_source(&png_bytes(7, 3)).unwrap();
        assert_eq!((source.width(), source.height()), (7, 3));
        assert_eq!(source.len(), 21);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_source(b"not an image").unwrap_err();
        assert!(matches!(err, IngestError::Decode(_)));
    }

    #[test]
    fn test_thumbnail_is_square() {
        let wide = image::load_from_memory(&png_bytes(300, 100)).unwrap();
        let thumb = create_thumbnail(&wide, THUMBNAIL_SIZE).unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (150, 150));
        assert_eq!(image::guess_format(&thumb).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_thumbnail_of_thin_strip_uses_centre() {
        let strip = RgbaImage::from_fn(1, 4000, |_, y| {
            if y == 1999 {
                Rgba([0, 255, 0, 255])
            } else {
                Rgba([255, 0, 0, 255])
            }
        });
        let thumb = create_thumbnail(&DynamicImage::ImageRgba8(strip), THUMBNAIL_SIZE).unwrap();
        let decoded = image::load_from_memory(&thumb).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (150, 150));
        let centre = decoded.get_pixel(75, 75);
        assert!(centre[1] > 200 && centre[0] < 60, "{centre:?}");
    }

    #[test]
    fn test_small_image_kept_as_is() {
        let bytes = png_bytes(20, 10);
        let processed = process_image_bytes("small.png", bytes.clone(), None).unwrap();
        assert!(!processed.compressed);
        assert_eq!(processed.mime, "image/png");
        assert_eq!(processed.data, bytes);
        assert_eq!(processed.original_size, bytes.len() as u64);
        assert!(!processed.thumbnail.is_empty());
    }
}
