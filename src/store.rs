//! Recent-image store
//!
//! A directory holding `index.json` plus one image file and one thumbnail
//! per record. The index lists records newest first. Writes go through a
//! temporary file and a rename so a crash never leaves a half-written
//! index behind.

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::ingest::{self, ProcessedImage};
use chrono::{DateTime, Utc};
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use value_study::SourceImage;

const INDEX_FILE: &str = "index.json";

/// Metadata for one stored image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: String,
    pub name: String,
    /// Stored size in bytes (after compression)
    pub size: u64,
    pub original_size: u64,
    pub mime: String,
    pub last_modified: Option<DateTime<Utc>>,
    /// When the image was added
    pub timestamp: DateTime<Utc>,
    /// Image file name inside the store directory
    pub file: String,
    /// Thumbnail file name inside the store directory
    pub thumbnail: String,
    pub thumbnail_size: u64,
    pub compressed: bool,
}

/// Storage usage summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageInfo {
    pub used: u64,
    pub quota: u64,
    pub percentage: f64,
}

/// Bytes used by the image and thumbnail files of `records`
pub fn calculate_storage_size(records: &[ImageRecord]) -> u64 {
    records.iter().map(|r| r.size + r.thumbnail_size).sum()
}

/// Content-derived record id: first 16 hex digits of SHA-256 over the
/// name and the stored bytes.
fn record_id(name: &str, data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update([0u8]);
    hasher.update(data);
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}

fn extension_for(mime: &str) -> &'static str {
    ImageFormat::from_mime_type(mime)
        .and_then(|f| f.extensions_str().first().copied())
        .unwrap_or("bin")
}

/// Recent-image store rooted at a directory
pub struct ImageStore {
    dir: PathBuf,
    max_images: usize,
    quota_bytes: u64,
    fallback_keep: usize,
}

impl ImageStore {
    /// Open (creating if needed) the store described by `config`
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::new(
            config.data_dir(),
            config.max_images,
            config.quota_bytes,
            config.fallback_keep,
        )
    }

    pub fn new(
        dir: impl Into<PathBuf>,
        max_images: usize,
        quota_bytes: u64,
        fallback_keep: usize,
    ) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            max_images: max_images.max(1),
            quota_bytes,
            fallback_keep,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    /// Read the index. A missing index is empty; a corrupt one is logged,
    /// removed and treated as empty.
    fn load_index(&self) -> Vec<ImageRecord> {
        let path = self.index_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read image index");
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Corrupt image index, discarding");
                if let Err(e) = fs::remove_file(&path) {
                    tracing::warn!(%e, "Failed to remove corrupt image index");
                }
                self.sweep_orphans();
                Vec::new()
            }
        }
    }

    /// Remove every stored file once no index refers to it
    fn sweep_orphans(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(%e, dir = %self.dir.display(), "Failed to list store directory");
                return;
            }
        };
        let mut removed = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || entry.file_name() == INDEX_FILE {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(%e, path = %path.display(), "Failed to remove orphaned file"),
            }
        }
        tracing::info!(removed, "Swept orphaned store files");
    }

    fn save_index(&self, records: &[ImageRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.dir.join(format!("{INDEX_FILE}.tmp"));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.index_path())?;
        Ok(())
    }

    fn remove_files(&self, record: &ImageRecord) {
        for file in [&record.file, &record.thumbnail] {
            match fs::remove_file(self.dir.join(file)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(%e, file = %file, "Failed to remove stored file"),
            }
        }
    }

    /// Drop records beyond `keep`, deleting their files
    fn truncate(&self, records: &mut Vec<ImageRecord>, keep: usize) {
        if records.len() > keep {
            for record in records.drain(keep..) {
                self.remove_files(&record);
            }
        }
    }

    /// Store a processed upload as the newest record.
    ///
    /// A record with the same name is replaced. At most `max_images`
    /// records are kept. Over the quota, the store trims down to the
    /// `fallback_keep` newest records; if that is still too much it is
    /// cleared and [`StoreError::QuotaExceeded`] is returned.
    pub fn add(&self, image: ProcessedImage) -> Result<ImageRecord, StoreError> {
        let (replaced, mut records): (Vec<_>, Vec<_>) = self
            .load_index()
            .into_iter()
            .partition(|r| r.name == image.name);
        for old in &replaced {
            tracing::debug!(id = %old.id, name = %old.name, "Replacing stored image");
            self.remove_files(old);
        }

        let id = record_id(&image.name, &image.data);
        let file = format!("{id}.{}", extension_for(&image.mime));
        let thumbnail = format!("{id}.thumb.jpg");
        fs::write(self.dir.join(&file), &image.data)?;
        fs::write(self.dir.join(&thumbnail), &image.thumbnail)?;

        let record = ImageRecord {
            id,
            name: image.name,
            size: image.data.len() as u64,
            original_size: image.original_size,
            mime: image.mime,
            last_modified: image.last_modified,
            timestamp: Utc::now(),
            file,
            thumbnail,
            thumbnail_size: image.thumbnail.len() as u64,
            compressed: image.compressed,
        };
        records.insert(0, record.clone());
        self.truncate(&mut records, self.max_images);

        let used = calculate_storage_size(&records);
        if used > self.quota_bytes {
            tracing::warn!(
                used,
                quota = self.quota_bytes,
                keep = self.fallback_keep,
                "Storage quota exceeded, trimming recent images"
            );
            self.truncate(&mut records, self.fallback_keep);

            let used = calculate_storage_size(&records);
            if used > self.quota_bytes {
                tracing::warn!(used, quota = self.quota_bytes, "Still over quota, clearing store");
                for record in &records {
                    self.remove_files(record);
                }
                self.save_index(&[])?;
                return Err(StoreError::QuotaExceeded {
                    used,
                    quota: self.quota_bytes,
                });
            }
        }

        self.save_index(&records)?;
        tracing::info!(
            id = %record.id,
            name = %record.name,
            size = %ingest::format_file_size(record.size),
            compressed = record.compressed,
            "Stored image"
        );
        Ok(record)
    }

    /// Process an image file and store it
    pub fn add_file(&self, path: &Path) -> Result<ImageRecord, StoreError> {
        let processed = ingest::process_image_file(path)?;
        self.add(processed)
    }

    /// All records, newest first
    pub fn list(&self) -> Vec<ImageRecord> {
        self.load_index()
    }

    pub fn get(&self, id: &str) -> Result<ImageRecord, StoreError> {
        self.load_index()
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Stored image bytes of a record
    pub fn read_image(&self, record: &ImageRecord) -> Result<Vec<u8>, StoreError> {
        Ok(fs::read(self.dir.join(&record.file))?)
    }

    /// Decode a stored image for rendering
    pub fn load_source(&self, id: &str) -> Result<SourceImage, StoreError> {
        let record = self.get(id)?;
        let bytes = self.read_image(&record)?;
        Ok(ingest::decode_source(&bytes)?)
    }

    /// Delete the records with the given ids. Returns how many were removed.
    pub fn delete(&self, ids: &[String]) -> Result<usize, StoreError> {
        let records = self.load_index();
        let (removed, kept): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|r| ids.contains(&r.id));
        for record in &removed {
            self.remove_files(record);
        }
        self.save_index(&kept)?;
        tracing::info!(removed = removed.len(), "Deleted stored images");
        Ok(removed.len())
    }

    /// Remove every record and its files
    pub fn clear(&self) -> Result<(), StoreError> {
        for record in self.load_index() {
            self.remove_files(&record);
        }
        self.save_index(&[])?;
        tracing::info!(dir = %self.dir.display(), "Cleared image store");
        Ok(())
    }

    pub fn storage_info(&self) -> StorageInfo {
        let used = calculate_storage_size(&self.load_index());
        let percentage = if self.quota_bytes > 0 {
            used as f64 / self.quota_bytes as f64 * 100.0
        } else {
            0.0
        };
        StorageInfo {
            used,
            quota: self.quota_bytes,
            percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(name: &str, size: usize) -> ProcessedImage {
        ProcessedImage {
            name: name.to_string(),
            mime: "image/png".to_string(),
            original_size: size as u64,
            last_modified: None,
            data: vec![name.len() as u8; size],
            thumbnail: vec![1; 10],
            compressed: false,
        }
    }

    fn store(dir: &Path, quota: u64) -> ImageStore {
        ImageStore::new(dir, 10, quota, 3).unwrap()
    }

    #[test]
    fn test_record_id_is_stable_hex() {
        let id = record_id("a.png", b"data");
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, record_id("a.png", b"data"));
        assert_ne!(id, record_id("b.png", b"data"));
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("application/x-unknown"), "bin");
    }

    #[test]
    fn test_add_newest_first_and_dedupe() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), u64::MAX);

        store.add(processed("a.png", 5)).unwrap();
        store.add(processed("b.png", 5)).unwrap();
        store.add(processed("a.png", 7)).unwrap();

        let names: Vec<String> = store.list().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
        assert_eq!(store.list()[0].size, 7);
    }

    #[test]
    fn test_keeps_at_most_max_images() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), u64::MAX);
        for i in 0..12 {
            store.add(processed(&format!("{i}.png"), 4)).unwrap();
        }
        let records = store.list();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].name, "11.png");
        assert!(!dir.path().join(format!("{}.png", record_id("0.png", &[5; 4]))).exists());
    }

    #[test]
    fn test_quota_trims_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        // Each record uses 100 + 10 bytes; four exceed the quota, three fit.
        let store = store(dir.path(), 400);
        for i in 0..4 {
            store.add(processed(&format!("{i}.png"), 100)).unwrap();
        }
        let names: Vec<String> = store.list().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["3.png", "2.png", "1.png"]);
    }

    #[test]
    fn test_quota_clears_when_still_over() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), 50);
        let err = store.add(processed("huge.png", 100)).unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert!(store.list().is_empty());
        assert!(!dir.path().join(format!("{}.png", record_id("huge.png", &[8; 100]))).exists());
    }

    #[test]
    fn test_corrupt_index_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), u64::MAX);
        let record = store.add(processed("a.png", 5)).unwrap();
        assert!(dir.path().join(&record.file).exists());

        fs::write(dir.path().join(INDEX_FILE), "{not json").unwrap();
        assert!(store.list().is_empty());
        assert!(!dir.path().join(INDEX_FILE).exists());
        assert!(!dir.path().join(&record.file).exists());
        assert!(!dir.path().join(&record.thumbnail).exists());
        assert_eq!(store.storage_info().used, 0);
    }

    #[test]
    fn test_delete_and_storage_info() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), 1000);
        let a = store.add(processed("a.png", 90)).unwrap();
        store.add(processed("b.png", 190)).unwrap();

        let info = store.storage_info();
        assert_eq!(info.used, 300);
        assert!((info.percentage - 30.0).abs() < 1e-9);

        assert_eq!(store.delete(&[a.id.clone(), "missing".into()]).unwrap(), 1);
        assert!(matches!(store.get(&a.id), Err(StoreError::NotFound(_))));
        assert!(!dir.path().join(&a.file).exists());
        assert_eq!(store.storage_info().used, 200);
    }

    #[test]
    fn test_clear_removes_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path(), u64::MAX);
        let record = store.add(processed("a.png", 3)).unwrap();
        store.clear().unwrap();
        assert!(store.list().is_empty());
        assert!(!dir.path().join(record.thumbnail).exists());
    }
}
