//! Verdin Pipeline - Layer building and record annotation
//!
//! This crate implements the annotation use cases, orchestrating composite
//! construction and point sampling over an archive engine.

pub mod builder;
pub mod pipeline;
pub mod sampler;

pub use builder::build_layer_set;
pub use pipeline::{AnnotationPipeline, RunPhase, RunProgress, RunSummary};
pub use sampler::{annotate_records, sample_record};
