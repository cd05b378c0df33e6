use crate::assets::AssetLoader;
use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use value_study::{Hsv, ParseColorError, ShadingParameters, ValueStudy};

/// Study configuration loaded from study.yaml
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StudyConfig {
    /// Number of value levels, clamped to 2..=11
    pub levels: usize,

    /// Per-level weights, darkest first
    pub proportions: Option<Vec<f64>>,

    /// Color overrides keyed by level index
    pub colors: BTreeMap<usize, ColorSpec>,

    /// Posterize (`true`) or pass pixels through
    pub grayscale: bool,

    pub store: StoreConfig,

    pub export: ExportConfig,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            levels: 3,
            proportions: None,
            colors: BTreeMap::new(),
            grayscale: true,
            store: StoreConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

/// A level color as written in YAML.
///
/// Either a string (`"#rrggbb"`, `"#rgb"`, `"h,s,v"`) or a `{h, s, v}` map.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ColorSpec {
    Hsv { h: f32, s: f32, v: f32 },
    Text(String),
}

impl ColorSpec {
    pub fn to_hsv(&self, level: usize) -> Result<Hsv, ConfigError> {
        match self {
            ColorSpec::Hsv { h, s, v } => {
                if let Some(&value) = [h, s, v]
                    .into_iter()
                    .find(|c| !(0.0..=1.0).contains(*c))
                {
                    return Err(ConfigError::Color {
                        level,
                        source: ParseColorError::OutOfRange(value),
                    });
                }
                Ok(Hsv::new(*h, *s, *v))
            }
            ColorSpec::Text(text) => text
                .parse()
                .map_err(|source| ConfigError::Color { level, source }),
        }
    }
}

/// Recent-image store settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    /// Store directory (falls back to `VALUEATOR_DATA_DIR`, then `.valueator`)
    pub dir: Option<PathBuf>,

    /// Records kept after every add
    pub max_images: usize,

    /// Total stored bytes before the store trims itself
    pub quota_bytes: u64,

    /// Records kept when the quota is exceeded
    pub fallback_keep: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_images: 10,
            quota_bytes: 50 * 1024 * 1024,
            fallback_keep: 3,
        }
    }
}

impl StoreConfig {
    /// Resolve the store directory
    pub fn data_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.dir {
            return dir.clone();
        }
        std::env::var("VALUEATOR_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".valueator"))
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ExportConfig {
    /// Run oxipng over exported PNGs
    pub optimize: bool,
}

impl StudyConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        levels = config.levels,
                        colors = config.colors.len(),
                        grayscale = config.grayscale,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Change the level count. Configured proportions no longer fit a
    /// different count and are dropped.
    pub fn set_levels(&mut self, levels: usize) {
        if levels != self.levels {
            self.levels = levels;
            self.proportions = None;
        }
    }

    /// Builder for this configuration.
    ///
    /// Colors configured for levels above the level count are skipped.
    pub fn to_study(&self) -> Result<ValueStudy, ConfigError> {
        let mut study = ValueStudy::new()
            .levels(self.levels)
            .grayscale(self.grayscale);
        if let Some(ref weights) = self.proportions {
            study = study.proportions(weights);
        }

        let active = value_study::levels::clamp_levels(self.levels);
        for (&level, spec) in &self.colors {
            if level >= active {
                tracing::debug!(level, active, "Skipping color for inactive level");
                continue;
            }
            study = study.color(level, spec.to_hsv(level)?);
        }
        Ok(study)
    }

    /// Validated editable parameters
    pub fn to_parameters(&self) -> Result<ShadingParameters, ConfigError> {
        Ok(self.to_study()?.build()?)
    }
}
