//! Configuration models and loaders for SolarMAP.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "solarmap.toml";

/// Everything a map run needs besides the target date.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Date plotted when the command line does not supply one.
    pub default_date: NaiveDate,
    /// Object identifiers to resolve (validated against the catalog by the caller).
    pub objects: Vec<String>,
    /// Days of trailing orbit; values below 1 are clamped by the resolver.
    pub trail_days: i64,
    /// Hours between trail samples.
    pub resolution_hours: u32,
    /// Issue per-object queries concurrently.
    pub parallel_queries: bool,
    pub output: OutputConfig,
    pub horizons: HorizonsConfig,
}

/// Image output settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// Image encodings the renderer can write.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Ephemeris service settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HorizonsConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_date: NaiveDate::from_ymd_opt(2020, 7, 11).unwrap_or(NaiveDate::MIN),
            objects: [
                "psp", "solo", "stereo_a", "stereo_b", "wind", "mars", "earth", "venus",
                "mercury", "sun",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            trail_days: 50,
            resolution_hours: 24,
            parallel_queries: false,
            output: OutputConfig::default(),
            horizons: HorizonsConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("artifacts/solarmap.png"),
            width: 900,
            height: 900,
            format: ImageFormat::Png,
        }
    }
}

impl Default for HorizonsConfig {
    fn default() -> Self {
        Self {
            endpoint: solarmap_horizons::DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: solarmap_horizons::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Load a configuration file; `.yaml`/`.yml` are read as YAML, anything else as TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MapConfig, ConfigError> {
    let path = path.as_ref();
    let config: MapConfig = if is_yaml(path) {
        let reader = File::open(path)?;
        serde_yaml::from_reader(reader)?
    } else {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)?
    };
    config.validate()?;
    Ok(config)
}

/// Load `path` when given, otherwise `solarmap.toml` if present, otherwise the defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<MapConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_PATH);
            if fallback.is_file() {
                load_config(fallback)
            } else {
                Ok(MapConfig::default())
            }
        }
    }
}

impl MapConfig {
    /// Check values that no later stage can repair.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.objects.is_empty() {
            return Err(ConfigError::Invalid("`objects` must list at least one body".into()));
        }
        if self.resolution_hours == 0 {
            return Err(ConfigError::Invalid("`resolution_hours` must be at least 1".into()));
        }
        if self.output.width == 0 || self.output.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "output size {}x{} must be non-zero",
                self.output.width, self.output.height
            )));
        }
        if self.horizons.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("`horizons.endpoint` is empty".into()));
        }
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false)
}
