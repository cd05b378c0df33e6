use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has no pixels: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Invalid source image: {0}")]
    Source(#[from] value_study::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Index error: {0}")]
    Index(#[from] serde_json::Error),

    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Storage quota exceeded: {used} of {quota} bytes")]
    QuotaExceeded { used: u64, quota: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("PNG optimize error: {0}")]
    Optimize(String),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<png::EncodingError> for ExportError {
    fn from(e: png::EncodingError) -> Self {
        ExportError::PngEncode(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid color for level {level}: {source}")]
    Color {
        level: usize,
        source: value_study::ParseColorError,
    },

    #[error("Invalid study parameters: {0}")]
    Study(#[from] value_study::StudyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_not_found() {
        let error = StoreError::NotFound("abc123".to_string());
        assert_eq!(error.to_string(), "Image not found: abc123");
    }

    #[test]
    fn test_store_error_quota_exceeded() {
        let error = StoreError::QuotaExceeded {
            used: 2048,
            quota: 1024,
        };
        assert_eq!(
            error.to_string(),
            "Storage quota exceeded: 2048 of 1024 bytes"
        );
    }

    #[test]
    fn test_ingest_error_empty_image() {
        let error = IngestError::EmptyImage {
            width: 0,
            height: 10,
        };
        assert_eq!(error.to_string(), "Image has no pixels: 0x10");
    }

    #[test]
    fn test_ingest_error_unsupported_type() {
        let error = IngestError::UnsupportedType("text/plain".to_string());
        assert_eq!(error.to_string(), "Unsupported image type: text/plain");
    }

    #[test]
    fn test_export_error_unsupported_dimensions() {
        let error = ExportError::UnsupportedDimensions {
            width: 0,
            height: 0,
        };
        assert_eq!(error.to_string(), "Unsupported dimensions: 0x0");
    }

    #[test]
    fn test_export_error_png_encode() {
        let error = ExportError::PngEncode("Encoding failed".to_string());
        assert_eq!(error.to_string(), "PNG encode error: Encoding failed");
    }

    #[test]
    fn test_config_error_color() {
        let error = ConfigError::Color {
            level: 2,
            source: value_study::ParseColorError::InvalidLength,
        };
        assert_eq!(
            error.to_string(),
            "Invalid color for level 2: invalid hex color length (expected 3 or 6 characters)"
        );
    }

    #[test]
    fn test_store_error_from_ingest_error() {
        let ingest = IngestError::UnsupportedType("x".to_string());
        let store: StoreError = ingest.into();
        match store {
            StoreError::Ingest(_) => {}
            _ => panic!("Expected Ingest variant"),
        }
    }
}
