use crate::cli::{ConfigArgs, ConfigCommand, ConfigInitArgs};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::{ConfigEntry, ConfigInitOutput, ConfigShowOutput};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tabled::Tabled;
use verdin_core::config::{LayeredConfig, SpatialMode, TemporalMode};

pub fn execute(args: ConfigArgs, output: &OutputWriter, config_path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(output, config_path),
        ConfigCommand::Init(init_args) => init(init_args, output),
    }
}

/// Show the resolved configuration with the source of each value
fn show(output: &OutputWriter, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let inspection_map = config.to_inspection_map();

    let mut entries: Vec<ConfigEntry> = inspection_map
        .into_iter()
        .map(|(key, (value, source))| ConfigEntry {
            key,
            value,
            source: format!("{:?}", source),
        })
        .collect();

    // Sort by key for consistent output
    entries.sort_by(|a, b| a.key.cmp(&b.key));

    if output.is_json() {
        output.result(ConfigShowOutput { entries })?;
    } else {
        output.section("Configuration Values");

        #[derive(Tabled, Serialize)]
        struct ConfigRow {
            #[tabled(rename = "Key")]
            key: String,
            #[tabled(rename = "Value")]
            value: String,
            #[tabled(rename = "Source")]
            source: String,
        }

        let rows: Vec<ConfigRow> = entries
            .into_iter()
            .map(|entry| ConfigRow {
                key: entry.key,
                value: entry.value,
                source: entry.source,
            })
            .collect();

        output.table(rows);

        output.section("Configuration Precedence");
        output.info("CLI arguments > Environment variables > Config file > Defaults");
    }

    Ok(())
}

/// Write a starter configuration file populated with the default values
fn init(args: ConfigInitArgs, output: &OutputWriter) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!("{} already exists. Use --force to overwrite.", args.path.display());
    }

    #[derive(Serialize)]
    struct StarterConfig {
        temporal: TemporalMode,
        spatial: SpatialMode,
        archive: String,
        band: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        native_scale: f64,
        coarse_scale: f64,
        max_pixels: u32,
        tile_scale: u32,
        region: Vec<(f64, f64)>,
    }

    let defaults = LayeredConfig::with_defaults();
    let starter = StarterConfig {
        temporal: defaults.temporal.value,
        spatial: defaults.spatial.value,
        archive: defaults.archive.value,
        band: defaults.band.value,
        start_date: defaults.start_date.value,
        end_date: defaults.end_date.value,
        native_scale: defaults.native_scale.value,
        coarse_scale: defaults.coarse_scale.value,
        max_pixels: defaults.max_pixels.value,
        tile_scale: defaults.tile_scale.value,
        region: defaults.region.value,
    };

    let body = toml::to_string_pretty(&starter).context("Failed to serialize configuration")?;
    let content = format!(
        "# Verdin run configuration\n\
         # Values here are overridden by VERDIN_* environment variables and CLI flags\n\n\
         {}",
        body
    );

    fs::write(&args.path, content)
        .with_context(|| format!("Failed to write {}", args.path.display()))?;

    if output.is_json() {
        output.result(ConfigInitOutput {
            path: args.path.display().to_string(),
            created: true,
        })?;
    } else {
        output.success(format!("Wrote configuration to {}", args.path.display()));
        output.info("Edit the file, or override values with VERDIN_* variables or CLI flags");
    }

    Ok(())
}
