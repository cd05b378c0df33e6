//! Asset loading with embedded fallbacks
//!
//! The default study configuration is compiled into the binary:
//!
//! - If `CONFIG_FILE` is NOT set: use the embedded `study.yaml` only
//! - If `CONFIG_FILE` IS set and the file exists: use it
//! - If `CONFIG_FILE` IS set and the file is missing: fall back to embedded
//!   (`valueator init` writes it out)

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::PathBuf;

/// File name of the embedded default study configuration.
pub const CONFIG_NAME: &str = "study.yaml";

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "study.yaml"]
struct EmbeddedConfig;

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
pub struct AssetLoader {
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// `config_file` should be `Some` only if `CONFIG_FILE` was set.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self { config_file }
    }

    /// Loader configured from the environment.
    pub fn from_env() -> Self {
        Self::new(std::env::var("CONFIG_FILE").ok().map(PathBuf::from))
    }

    pub fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get(CONFIG_NAME)
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Embedded study.yaml not found"))
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Extract the embedded config to the configured path (or
    /// `./study.yaml`).
    pub fn init(&self, force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        let path = self
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("./{CONFIG_NAME}")));

        if !force && path.exists() {
            report.skipped.push(path.display().to_string());
            return Ok(report);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Some(data) = EmbeddedConfig::get(CONFIG_NAME) {
            fs::write(&path, &*data.data)?;
            report.written.push(path.display().to_string());
        }

        Ok(report)
    }

    /// List embedded assets (for display)
    pub fn list_embedded() -> Vec<String> {
        EmbeddedConfig::iter().map(|s| s.to_string()).collect()
    }
}
