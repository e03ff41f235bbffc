use crate::cli::AnnotateArgs;
use crate::config_loader::{load_config_with_overrides, load_region_vertices};
use crate::output::OutputWriter;
use crate::output_types::AnnotateOutput;
use crate::progress::RunProgressBars;
use anyhow::{bail, Context, Result};
use std::path::Path;
use verdin_core::config::{parse_date, parse_spatial_mode, parse_temporal_mode, CliConfigOverrides};
use verdin_core::formats;
use verdin_engine::{CsvSink, MemoryEngine, SceneArchive};
use verdin_pipeline::{AnnotationPipeline, RunPhase, RunProgress};

pub fn execute(
    args: AnnotateArgs,
    output: &OutputWriter,
    config_path: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    // Resolve layered configuration with CLI overrides
    let overrides = CliConfigOverrides {
        temporal: args.temporal.as_deref().map(parse_temporal_mode).transpose()?,
        spatial: args.spatial.as_deref().map(parse_spatial_mode).transpose()?,
        archive: args.archive.clone(),
        start_date: args.start_date.as_deref().map(parse_date).transpose()?,
        end_date: args.end_date.as_deref().map(parse_date).transpose()?,
        limit: args.limit,
        region: args.region.as_deref().map(load_region_vertices).transpose()?,
    };

    let config = load_config_with_overrides(config_path, overrides)?
        .build()
        .context("Invalid configuration")?;

    // Load observation records
    let records = formats::load_records(&args.records)
        .with_context(|| format!("Failed to load records from {}", args.records.display()))?;

    if records.is_empty() {
        bail!("No records to annotate in {}", args.records.display());
    }

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

    let engine = MemoryEngine::new(archive);
    let pipeline = AnnotationPipeline::new(engine, config);
    let sink = CsvSink::new(&args.output);

    // Run with progress display
    let mut bars = if quiet { None } else { Some(RunProgressBars::new()) };
    let mut last_phase = RunPhase::BuildingLayers;

    let summary = pipeline
        .run_with_progress(&records, &sink, |progress: RunProgress| {
            let Some(bars) = bars.as_mut() else {
                return;
            };

            if progress.phase != last_phase {
                match progress.phase {
                    RunPhase::BuildingLayers => {}
                    RunPhase::Annotating => bars.start_annotate(progress.total as u64),
                    RunPhase::Exporting => {
                        bars.finish_annotate(progress.total);
                        bars.start_export();
                    }
                }
                last_phase = progress.phase;
            }

            match progress.phase {
                RunPhase::BuildingLayers => {
                    if progress.current > 0 && progress.current == progress.total {
                        bars.finish_layers(progress.current);
                    } else {
                        bars.update_layers(&progress.message);
                    }
                }
                RunPhase::Annotating => bars.update_annotate(progress.current as u64),
                RunPhase::Exporting => {}
            }
        })
        .context("Annotation run failed")?;

    if let Some(bars) = bars.as_ref() {
        bars.finish_export(summary.rows_exported);
    }

    if summary.records_missing > 0 {
        output.warning(format!(
            "{} of {} records had no coverage at the sampled point",
            summary.records_missing, summary.records_total
        ));
    }

    // Output results
    if output.is_json() {
        let json_output = AnnotateOutput {
            records_total: summary.records_total,
            records_annotated: summary.records_annotated,
            records_missing: summary.records_missing,
            layer_count: summary.layer_count,
            rows_exported: summary.rows_exported,
            output_path: args.output.display().to_string(),
        };
        output.result(json_output)?;
    } else {
        output.success("Annotation complete");
        output.section("Run Summary");
        output.kv("Records", summary.records_total);
        output.kv("Annotated", summary.records_annotated);
        output.kv("Missing", summary.records_missing);
        output.kv("Layers", summary.layer_count);
        output.kv("Output", args.output.display());
    }

    Ok(())
}
