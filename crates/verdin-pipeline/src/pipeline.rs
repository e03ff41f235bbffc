use serde::Serialize;
use verdin_core::config::{PipelineConfig, TemporalMode};
use verdin_core::models::{Annotation, LayerSet, Record};
use verdin_core::ports::{AnnotationSink, EviEngine};
use verdin_core::Result;

use crate::builder;
use crate::sampler;

/// Progress information for an annotation run
#[derive(Debug, Clone)]
pub struct RunProgress {
    pub phase: RunPhase,
    pub current: usize,
    pub total: usize,
    pub message: String,
}

/// Current phase of an annotation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    BuildingLayers,
    Annotating,
    Exporting,
}

/// Annotation pipeline orchestrating layer building, sampling, and export
pub struct AnnotationPipeline<E>
where
    E: EviEngine,
{
    engine: E,
    config: PipelineConfig,
}

impl<E> AnnotationPipeline<E>
where
    E: EviEngine,
{
    /// Create a new annotation pipeline
    pub fn new(engine: E, config: PipelineConfig) -> Self {
        Self { engine, config }
    }

    /// The resolved configuration this pipeline runs under
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build the layer set for this pipeline's configuration
    pub fn build_layers(&self) -> Result<LayerSet> {
        builder::build_layer_set(&self.engine, &self.config, &self.config.region)
    }

    /// Annotate records against an already-built layer set.
    ///
    /// The configured record limit applies here the same way it does in
    /// [`run`](Self::run).
    pub fn annotate(&self, layers: &LayerSet, records: &[Record]) -> Result<Vec<Annotation>> {
        let records = self.effective_records(records);
        sampler::annotate_records(&self.engine, layers, records, self.config.tile_scale)
    }

    /// Annotate with per-record progress reporting
    pub fn annotate_with<F>(
        &self,
        layers: &LayerSet,
        records: &[Record],
        mut progress: F,
    ) -> Result<Vec<Annotation>>
    where
        F: FnMut(RunProgress),
    {
        let records = self.effective_records(records);
        let total = records.len();
        let mut rows = Vec::with_capacity(total);

        for (idx, record) in records.iter().enumerate() {
            let value =
                sampler::sample_record(&self.engine, layers, record, self.config.tile_scale)?;
            rows.push(Annotation::for_record(record, value));

            progress(RunProgress {
                phase: RunPhase::Annotating,
                current: idx + 1,
                total,
                message: format!("Annotated {}/{} records", idx + 1, total),
            });
        }

        Ok(rows)
    }

    /// Run the full pipeline: build layers, annotate every record, export
    pub fn run<S: AnnotationSink>(&self, records: &[Record], sink: &S) -> Result<RunSummary> {
        self.run_with_progress(records, sink, |_| {})
    }

    /// Run the full pipeline with progress reporting
    pub fn run_with_progress<S, F>(
        &self,
        records: &[Record],
        sink: &S,
        mut progress: F,
    ) -> Result<RunSummary>
    where
        S: AnnotationSink,
        F: FnMut(RunProgress),
    {
        let expected_layers = match self.config.temporal {
            TemporalMode::Monthly => 12,
            TemporalMode::Overall => 1,
        };

        // Phase 1: Build the layer set
        progress(RunProgress {
            phase: RunPhase::BuildingLayers,
            current: 0,
            total: expected_layers,
            message: "Building layers".to_string(),
        });

        let layers = self.build_layers()?;
        tracing::info!(
            layers = layers.len(),
            scale = self.config.target_scale(),
            "Layer set built"
        );

        progress(RunProgress {
            phase: RunPhase::BuildingLayers,
            current: layers.len(),
            total: expected_layers,
            message: format!("Built {} layers", layers.len()),
        });

        // Phase 2: Annotate records in input order
        let rows = self.annotate_with(&layers, records, &mut progress)?;
        let total = rows.len();

        let annotated = rows.iter().filter(|row| row.value.is_some()).count();
        tracing::info!(total, annotated, missing = total - annotated, "Annotation complete");

        // Phase 3: Export
        progress(RunProgress {
            phase: RunPhase::Exporting,
            current: 0,
            total: rows.len(),
            message: "Exporting rows".to_string(),
        });

        let exported = sink.export(&rows)?;

        Ok(RunSummary {
            records_total: total,
            records_annotated: annotated,
            records_missing: total - annotated,
            layer_count: layers.len(),
            rows_exported: exported,
        })
    }

    fn effective_records<'a>(&self, records: &'a [Record]) -> &'a [Record] {
        match self.config.limit {
            Some(limit) if records.len() > limit => &records[..limit],
            _ => records,
        }
    }
}

/// Result of an annotation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Number of records processed after any limit
    pub records_total: usize,

    /// Rows carrying a sampled value
    pub records_annotated: usize,

    /// Rows with no coverage at the sampled point
    pub records_missing: usize,

    /// Number of layers built
    pub layer_count: usize,

    /// Rows written by the sink
    pub rows_exported: usize,
}
