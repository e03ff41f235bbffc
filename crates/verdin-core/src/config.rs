use crate::error::{Result, VerdinError};
use crate::models::Region;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default archive identifier (Landsat 8 8-day EVI composites)
pub const DEFAULT_ARCHIVE: &str = "LANDSAT/LC08/C01/T1_8DAY_EVI";

/// Default band to aggregate and sample
pub const DEFAULT_BAND: &str = "EVI";

/// Default clip region: the western North America study area
pub const DEFAULT_REGION: [(f64, f64); 4] =
    [(-151.4, 22.8), (-94.1, 22.8), (-94.1, 59.7), (-151.4, 59.7)];

/// Default aggregation window, end exclusive
pub const DEFAULT_START_DATE: (i32, u32, u32) = (2013, 1, 1);
pub const DEFAULT_END_DATE: (i32, u32, u32) = (2017, 12, 31);

/// Default native scale in meters
pub const DEFAULT_NATIVE_SCALE: f64 = 30.0;

/// Default coarse scale in meters
pub const DEFAULT_COARSE_SCALE: f64 = 1000.0;

/// Default bound on input cells aggregated per coarsened cell
pub const DEFAULT_MAX_PIXELS: u32 = 1500;

/// Default sampling parallelism hint
pub const DEFAULT_TILE_SCALE: u32 = 4;

/// Temporal aggregation granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemporalMode {
    /// Twelve calendar-month composites
    #[default]
    Monthly,
    /// One composite over the whole window
    Overall,
}

/// Spatial resolution of the built layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpatialMode {
    /// The archive's native scale
    #[default]
    Native,
    /// Block-mean aggregated to the coarse scale
    Coarse,
}

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for a verdin run
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub temporal: ConfigValue<TemporalMode>,
    pub spatial: ConfigValue<SpatialMode>,
    pub archive: ConfigValue<String>,
    pub band: ConfigValue<String>,
    pub start_date: ConfigValue<NaiveDate>,
    pub end_date: ConfigValue<NaiveDate>,
    pub native_scale: ConfigValue<f64>,
    pub coarse_scale: ConfigValue<f64>,
    pub max_pixels: ConfigValue<u32>,
    pub tile_scale: ConfigValue<u32>,
    pub limit: ConfigValue<Option<usize>>,
    pub region: ConfigValue<Vec<(f64, f64)>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            temporal: ConfigValue::new(TemporalMode::Monthly, ConfigSource::Default),
            spatial: ConfigValue::new(SpatialMode::Native, ConfigSource::Default),
            archive: ConfigValue::new(DEFAULT_ARCHIVE.to_string(), ConfigSource::Default),
            band: ConfigValue::new(DEFAULT_BAND.to_string(), ConfigSource::Default),
            start_date: ConfigValue::new(default_date(DEFAULT_START_DATE), ConfigSource::Default),
            end_date: ConfigValue::new(default_date(DEFAULT_END_DATE), ConfigSource::Default),
            native_scale: ConfigValue::new(DEFAULT_NATIVE_SCALE, ConfigSource::Default),
            coarse_scale: ConfigValue::new(DEFAULT_COARSE_SCALE, ConfigSource::Default),
            max_pixels: ConfigValue::new(DEFAULT_MAX_PIXELS, ConfigSource::Default),
            tile_scale: ConfigValue::new(DEFAULT_TILE_SCALE, ConfigSource::Default),
            limit: ConfigValue::new(None, ConfigSource::Default),
            region: ConfigValue::new(DEFAULT_REGION.to_vec(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| VerdinError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| VerdinError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        // Update values from file
        if let Some(temporal) = file_config.temporal {
            self.temporal.update(temporal, ConfigSource::File);
        }

        if let Some(spatial) = file_config.spatial {
            self.spatial.update(spatial, ConfigSource::File);
        }

        if let Some(archive) = file_config.archive {
            self.archive.update(archive, ConfigSource::File);
        }

        if let Some(band) = file_config.band {
            self.band.update(band, ConfigSource::File);
        }

        if let Some(start_date) = file_config.start_date {
            self.start_date.update(start_date, ConfigSource::File);
        }

        if let Some(end_date) = file_config.end_date {
            self.end_date.update(end_date, ConfigSource::File);
        }

        if let Some(native_scale) = file_config.native_scale {
            self.native_scale.update(native_scale, ConfigSource::File);
        }

        if let Some(coarse_scale) = file_config.coarse_scale {
            self.coarse_scale.update(coarse_scale, ConfigSource::File);
        }

        if let Some(max_pixels) = file_config.max_pixels {
            self.max_pixels.update(max_pixels, ConfigSource::File);
        }

        if let Some(tile_scale) = file_config.tile_scale {
            self.tile_scale.update(tile_scale, ConfigSource::File);
        }

        if let Some(limit) = file_config.limit {
            self.limit.update(Some(limit), ConfigSource::File);
        }

        if let Some(region) = file_config.region {
            self.region.update(region, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // VERDIN_TEMPORAL
        if let Ok(temporal_str) = env::var("VERDIN_TEMPORAL") {
            match parse_temporal_mode(&temporal_str) {
                Ok(temporal) => self.temporal.update(temporal, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid VERDIN_TEMPORAL value '{}': expected monthly or overall",
                    temporal_str
                ),
            }
        }

        // VERDIN_SPATIAL
        if let Ok(spatial_str) = env::var("VERDIN_SPATIAL") {
            match parse_spatial_mode(&spatial_str) {
                Ok(spatial) => self.spatial.update(spatial, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid VERDIN_SPATIAL value '{}': expected native, coarse, 30m, or 1km",
                    spatial_str
                ),
            }
        }

        // VERDIN_ARCHIVE
        if let Ok(archive) = env::var("VERDIN_ARCHIVE") {
            self.archive.update(archive, ConfigSource::Environment);
        }

        // VERDIN_START_DATE
        if let Ok(start_str) = env::var("VERDIN_START_DATE") {
            match parse_date(&start_str) {
                Ok(start) => self.start_date.update(start, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid VERDIN_START_DATE value '{}': expected YYYY-MM-DD",
                    start_str
                ),
            }
        }

        // VERDIN_END_DATE
        if let Ok(end_str) = env::var("VERDIN_END_DATE") {
            match parse_date(&end_str) {
                Ok(end) => self.end_date.update(end, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid VERDIN_END_DATE value '{}': expected YYYY-MM-DD",
                    end_str
                ),
            }
        }

        // VERDIN_LIMIT
        if let Ok(limit_str) = env::var("VERDIN_LIMIT") {
            match limit_str.parse::<usize>() {
                Ok(limit) => self.limit.update(Some(limit), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid VERDIN_LIMIT value '{}': expected a row count",
                    limit_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(temporal) = overrides.temporal {
            self.temporal.update(temporal, ConfigSource::Cli);
        }

        if let Some(spatial) = overrides.spatial {
            self.spatial.update(spatial, ConfigSource::Cli);
        }

        if let Some(archive) = overrides.archive {
            self.archive.update(archive, ConfigSource::Cli);
        }

        if let Some(start_date) = overrides.start_date {
            self.start_date.update(start_date, ConfigSource::Cli);
        }

        if let Some(end_date) = overrides.end_date {
            self.end_date.update(end_date, ConfigSource::Cli);
        }

        if let Some(limit) = overrides.limit {
            self.limit.update(Some(limit), ConfigSource::Cli);
        }

        if let Some(region) = overrides.region {
            self.region.update(region, ConfigSource::Cli);
        }
    }

    /// Resolve into the validated run configuration
    pub fn build(&self) -> Result<PipelineConfig> {
        if self.start_date.value >= self.end_date.value {
            return Err(VerdinError::ConfigInvalid {
                key: "date_range".to_string(),
                reason: format!(
                    "start date {} is not before end date {}",
                    self.start_date.value, self.end_date.value
                ),
            });
        }

        if self.native_scale.value <= 0.0 || !self.native_scale.value.is_finite() {
            return Err(VerdinError::ConfigInvalid {
                key: "native_scale".to_string(),
                reason: format!("scale must be a positive number, got {}", self.native_scale.value),
            });
        }

        if self.coarse_scale.value <= 0.0 || !self.coarse_scale.value.is_finite() {
            return Err(VerdinError::ConfigInvalid {
                key: "coarse_scale".to_string(),
                reason: format!("scale must be a positive number, got {}", self.coarse_scale.value),
            });
        }

        if self.spatial.value == SpatialMode::Coarse
            && self.coarse_scale.value <= self.native_scale.value
        {
            return Err(VerdinError::ConfigInvalid {
                key: "coarse_scale".to_string(),
                reason: format!(
                    "coarse scale {} must exceed native scale {}",
                    self.coarse_scale.value, self.native_scale.value
                ),
            });
        }

        if self.max_pixels.value == 0 {
            return Err(VerdinError::ConfigMissing { key: "max_pixels".to_string() });
        }

        if self.tile_scale.value == 0 {
            return Err(VerdinError::ConfigMissing { key: "tile_scale".to_string() });
        }

        let region = Region::new(self.region.value.clone())?;

        Ok(PipelineConfig {
            temporal: self.temporal.value,
            spatial: self.spatial.value,
            archive: self.archive.value.clone(),
            band: self.band.value.clone(),
            start_date: self.start_date.value,
            end_date: self.end_date.value,
            native_scale: self.native_scale.value,
            coarse_scale: self.coarse_scale.value,
            max_pixels: self.max_pixels.value,
            tile_scale: self.tile_scale.value,
            limit: self.limit.value,
            region,
        })
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "temporal".to_string(),
            (format!("{:?}", self.temporal.value), self.temporal.source),
        );

        map.insert(
            "spatial".to_string(),
            (format!("{:?}", self.spatial.value), self.spatial.source),
        );

        map.insert("archive".to_string(), (self.archive.value.clone(), self.archive.source));

        map.insert("band".to_string(), (self.band.value.clone(), self.band.source));

        map.insert(
            "start_date".to_string(),
            (self.start_date.value.to_string(), self.start_date.source),
        );

        map.insert(
            "end_date".to_string(),
            (self.end_date.value.to_string(), self.end_date.source),
        );

        map.insert(
            "native_scale".to_string(),
            (format!("{} m", self.native_scale.value), self.native_scale.source),
        );

        map.insert(
            "coarse_scale".to_string(),
            (format!("{} m", self.coarse_scale.value), self.coarse_scale.source),
        );

        map.insert(
            "max_pixels".to_string(),
            (self.max_pixels.value.to_string(), self.max_pixels.source),
        );

        map.insert(
            "tile_scale".to_string(),
            (self.tile_scale.value.to_string(), self.tile_scale.source),
        );

        map.insert(
            "limit".to_string(),
            (
                self.limit.value.map_or_else(|| "none".to_string(), |n| n.to_string()),
                self.limit.source,
            ),
        );

        map.insert(
            "region".to_string(),
            (format!("{} vertices", self.region.value.len()), self.region.source),
        );

        map
    }
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub temporal: TemporalMode,
    pub spatial: SpatialMode,
    pub archive: String,
    pub band: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub native_scale: f64,
    pub coarse_scale: f64,
    pub max_pixels: u32,
    pub tile_scale: u32,
    pub limit: Option<usize>,
    pub region: Region,
}

impl PipelineConfig {
    /// The nominal scale layers built under this configuration carry
    pub fn target_scale(&self) -> f64 {
        match self.spatial {
            SpatialMode::Native => self.native_scale,
            SpatialMode::Coarse => self.coarse_scale,
        }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    temporal: Option<TemporalMode>,
    spatial: Option<SpatialMode>,
    archive: Option<String>,
    band: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    native_scale: Option<f64>,
    coarse_scale: Option<f64>,
    max_pixels: Option<u32>,
    tile_scale: Option<u32>,
    limit: Option<usize>,
    region: Option<Vec<(f64, f64)>>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub temporal: Option<TemporalMode>,
    pub spatial: Option<SpatialMode>,
    pub archive: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub region: Option<Vec<(f64, f64)>>,
}

fn default_date((year, month, day): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("default date constant is valid")
}

/// Parse temporal mode from string
pub fn parse_temporal_mode(s: &str) -> Result<TemporalMode> {
    match s.to_lowercase().as_str() {
        "monthly" => Ok(TemporalMode::Monthly),
        "overall" => Ok(TemporalMode::Overall),
        _ => Err(VerdinError::ConfigInvalid {
            key: "temporal".to_string(),
            reason: format!("Invalid temporal mode: {}. Use monthly or overall", s),
        }),
    }
}

/// Parse spatial mode from string, accepting the legacy resolution spellings
pub fn parse_spatial_mode(s: &str) -> Result<SpatialMode> {
    match s.to_lowercase().as_str() {
        "native" | "30m" => Ok(SpatialMode::Native),
        "coarse" | "1km" => Ok(SpatialMode::Coarse),
        _ => Err(VerdinError::ConfigInvalid {
            key: "spatial".to_string(),
            reason: format!("Invalid spatial mode: {}. Use native, coarse, 30m, or 1km", s),
        }),
    }
}

/// Parse an ISO `YYYY-MM-DD` date from string
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| VerdinError::ConfigInvalid {
        key: "date".to_string(),
        reason: format!("Invalid date '{}': {}", s, e),
    })
}
