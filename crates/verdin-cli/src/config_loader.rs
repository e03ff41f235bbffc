//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use verdin_core::config::{CliConfigOverrides, LayeredConfig};
use verdin_core::formats::geojson;

/// Configuration file name searched in the working directory when no
/// --config flag is given
pub const DEFAULT_CONFIG_FILE: &str = "verdin.toml";

/// Load layered configuration, merging file and environment layers
pub fn load_config(config_path: Option<&Path>) -> Result<LayeredConfig> {
    let config = LayeredConfig::with_defaults();

    let config = match config_path {
        Some(path) => config
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                config
                    .load_from_file(default_path)
                    .context("Failed to load verdin.toml")?
            } else {
                config
            }
        }
    };

    Ok(config.load_from_env())
}

/// Load layered configuration with CLI overrides applied on top
pub fn load_config_with_overrides(
    config_path: Option<&Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let mut config = load_config(config_path)?;
    config.update_from_cli(overrides);
    Ok(config)
}

/// Read a clip region override from a GeoJSON polygon file
pub fn load_region_vertices(path: &Path) -> Result<Vec<(f64, f64)>> {
    let region = geojson::read_region(path)
        .with_context(|| format!("Failed to load region from {}", path.display()))?;
    Ok(region.vertices().to_vec())
}
