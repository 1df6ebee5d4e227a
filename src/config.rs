use chrono::Duration;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::elements::{RetentionPolicy, LISTING_ARTIFACT};
use crate::predict::{ObserverLocation, Twilight, DEFAULT_MIN_CULMINATION_ALT_DEG};
use crate::report::OutputFormat;

pub const DEFAULT_SOURCE_URL: &str = "https://celestrak.org/NORAD/elements/stations.txt";
const ELEMENTS_FILE: &str = "elements.jsonl";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid duration '{value}': {message}")]
    Duration { value: String, message: String },
    #[error("Observer {0} is not set (use --lat/--lon or the observer section)")]
    MissingObserver(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Discrete rise / culmination / set passes
    #[default]
    Events,
    /// Fixed-step samples without pass boundaries
    Sampling,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub observer: ObserverConfig,
    pub satellite: String,
    pub source_url: String,
    pub data_dir: PathBuf,
    pub scan: ScanConfig,
    pub filter: FilterConfig,
    pub display: DisplayConfig,
    pub fetch: FetchConfig,
    pub retention: RetentionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            observer: ObserverConfig::default(),
            satellite: "ISS (ZARYA)".to_string(),
            source_url: DEFAULT_SOURCE_URL.to_string(),
            data_dir: PathBuf::from("data"),
            scan: ScanConfig::default(),
            filter: FilterConfig::default(),
            display: DisplayConfig::default(),
            fetch: FetchConfig::default(),
            retention: RetentionConfig::default(),
        }
    }
}

/// Observer site; coordinates have no default
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    pub elevation_m: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            latitude_deg: None,
            longitude_deg: None,
            elevation_m: 200.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Clamped to 31 when the window is built
    pub range_days: u32,
    pub resolution: String,
    pub strategy: Strategy,
    pub horizon_deg: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            range_days: 10,
            resolution: "1m".to_string(),
            strategy: Strategy::default(),
            horizon_deg: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub min_altitude_deg: f64,
    pub twilight: Twilight,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_altitude_deg: DEFAULT_MIN_CULMINATION_ALT_DEG,
            twilight: Twilight::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub time_zone: String,
    pub format: OutputFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_zone: "UTC".to_string(),
            format: OutputFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub min_interval: String,
    /// Continue with stored element sets when the source is unreachable
    pub allow_stale: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            min_interval: "2h".to_string(),
            allow_stale: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetentionConfig {
    pub keep_latest: Option<NonZeroUsize>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn observer(&self) -> Result<ObserverLocation, ConfigError> {
        let latitude_deg = self
            .observer
            .latitude_deg
            .ok_or(ConfigError::MissingObserver("latitude"))?;
        let longitude_deg = self
            .observer
            .longitude_deg
            .ok_or(ConfigError::MissingObserver("longitude"))?;
        Ok(ObserverLocation::new(
            latitude_deg,
            longitude_deg,
            self.observer.elevation_m,
        ))
    }

    pub fn elements_path(&self) -> PathBuf {
        self.data_dir.join(ELEMENTS_FILE)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.data_dir.join(LISTING_ARTIFACT)
    }

    pub fn resolution(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.scan.resolution)
    }

    pub fn min_fetch_interval(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.fetch.min_interval)
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        match self.retention.keep_latest {
            Some(n) => RetentionPolicy::KeepLatest(n.get()),
            None => RetentionPolicy::KeepAll,
        }
    }
}

fn parse_duration(value: &str) -> Result<Duration, ConfigError> {
    let err = |message: String| ConfigError::Duration {
        value: value.to_string(),
        message,
    };
    humantime::parse_duration(value.trim())
        .map_err(|e| err(e.to_string()))
        .and_then(|d| Duration::from_std(d).map_err(|e| err(e.to_string())))
}
