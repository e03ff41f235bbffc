use crate::cli::LayersArgs;
use crate::config_loader::{load_config_with_overrides, load_region_vertices};
use crate::output::OutputWriter;
use crate::output_types::{LayerInfo, LayersOutput};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;
use verdin_core::config::{parse_date, parse_spatial_mode, parse_temporal_mode, CliConfigOverrides};
use verdin_core::models::Layer;
use verdin_engine::{MemoryEngine, SceneArchive};
use verdin_pipeline::build_layer_set;

pub fn execute(args: LayersArgs, output: &OutputWriter, config_path: Option<&Path>) -> Result<()> {
    // Resolve layered configuration with CLI overrides
    let overrides = CliConfigOverrides {
        temporal: args.temporal.as_deref().map(parse_temporal_mode).transpose()?,
        spatial: args.spatial.as_deref().map(parse_spatial_mode).transpose()?,
        archive: args.archive.clone(),
        start_date: args.start_date.as_deref().map(parse_date).transpose()?,
        end_date: args.end_date.as_deref().map(parse_date).transpose()?,
        limit: None,
        region: args.region.as_deref().map(load_region_vertices).transpose()?,
    };

    let config = load_config_with_overrides(config_path, overrides)?
        .build()
        .context("Invalid configuration")?;

    // Load the scene archive
    let archive = SceneArchive::load_dir(config.archive.clone(), &args.archive_dir)
        .with_context(|| {
            format!("Failed to load scene archive from {}", args.archive_dir.display())
        })?;

    if archive.is_empty() {
        bail!(
            "No scenes found in {}. Expected date-stamped .asc grids.",
            args.archive_dir.display()
        );
    }

    let scene_count = archive.len();
    let engine = MemoryEngine::new(archive);
    let layers = build_layer_set(&engine, &config, &config.region)
        .context("Failed to build composite layers")?;

    let infos: Vec<LayerInfo> = layers.iter().map(layer_info).collect();

    // Display layers
    if output.is_json() {
        let json_output = LayersOutput {
            archive: config.archive.clone(),
            temporal: format!("{:?}", config.temporal),
            spatial: format!("{:?}", config.spatial),
            target_scale_m: config.target_scale(),
            layers: infos,
        };
        output.result(json_output)?;
    } else {
        output.section("Layer Build");
        output.kv("Archive", &config.archive);
        output.kv("Scenes", scene_count);
        output.kv("Temporal", format!("{:?}", config.temporal));
        output.kv("Spatial", format!("{:?}", config.spatial));
        output.kv("Target Scale", format!("{} m", config.target_scale()));

        output.section("Composite Layers");

        #[derive(Tabled, Serialize)]
        struct LayerRow {
            #[tabled(rename = "Period")]
            period: String,
            #[tabled(rename = "Band")]
            band: String,
            #[tabled(rename = "Scale")]
            scale: String,
            #[tabled(rename = "Size")]
            size: String,
            #[tabled(rename = "Coverage")]
            coverage: String,
        }

        let rows: Vec<LayerRow> = infos
            .iter()
            .map(|info| LayerRow {
                period: info.period.clone(),
                band: info.band.clone(),
                scale: format!("{} m", info.scale_m),
                size: format!("{}x{}", info.width, info.height),
                coverage: format!("{:.1}%", info.coverage * 100.0),
            })
            .collect();

        output.table(rows);
    }

    Ok(())
}

fn layer_info(layer: &Layer) -> LayerInfo {
    let period = match layer.month {
        Some(month) => month_name(month),
        None => "Overall".to_string(),
    };

    LayerInfo {
        period,
        band: layer.band.clone(),
        scale_m: layer.scale,
        width: layer.raster.width,
        height: layer.raster.height,
        coverage: layer.raster.coverage(),
    }
}

fn month_name(month: u32) -> String {
    match NaiveDate::from_ymd_opt(2000, month, 1) {
        Some(date) => date.format("%B").to_string(),
        None => format!("Month {}", month),
    }
}
