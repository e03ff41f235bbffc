//! Export sinks for annotation rows.
//!
//! `MemorySink` uses `RwLock::unwrap()` intentionally. Lock poisoning only
//! occurs when another thread panicked while holding the lock, which is an
//! unrecoverable state.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use verdin_core::formats;
use verdin_core::models::Annotation;
use verdin_core::ports::AnnotationSink;
use verdin_core::{Result, VerdinError};

/// Sink writing rows as a CSV table
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    /// Create a sink writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The output path rows are written to
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnnotationSink for CsvSink {
    fn export(&self, rows: &[Annotation]) -> Result<usize> {
        formats::csv::write_annotations(&self.path, rows)
            .map_err(|e| VerdinError::Export(format!("{}: {}", self.path.display(), e)))
    }
}

/// Sink collecting rows in memory for tests and previews
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: RwLock<Vec<Annotation>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// The rows exported so far
    pub fn rows(&self) -> Vec<Annotation> {
        self.rows.read().unwrap().clone()
    }
}

impl AnnotationSink for MemorySink {
    fn export(&self, rows: &[Annotation]) -> Result<usize> {
        self.rows.write().unwrap().extend(rows.iter().cloned());
        Ok(rows.len())
    }
}
