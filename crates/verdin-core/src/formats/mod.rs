//! Input and output file formats.
//!
//! Record collections arrive as CSV or GeoJSON; archive scenes are ESRI ASCII
//! grids. Record format detection dispatches on the file extension.

use std::path::Path;

use crate::error::{Result, VerdinError};
use crate::models::Record;

pub mod asciigrid;
pub mod csv;
pub mod geojson;

/// Supported record input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Csv,
    GeoJson,
}

impl RecordFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| VerdinError::UnsupportedFormat { extension: "none".to_string() })?;

        match extension.to_lowercase().as_str() {
            "csv" => Ok(RecordFormat::Csv),
            "json" | "geojson" => Ok(RecordFormat::GeoJson),
            other => Err(VerdinError::UnsupportedFormat { extension: other.to_string() }),
        }
    }

    /// Human-readable format name
    pub fn name(&self) -> &'static str {
        match self {
            RecordFormat::Csv => "CSV",
            RecordFormat::GeoJson => "GeoJSON",
        }
    }
}

/// Load records from a file, dispatching on its extension
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    match RecordFormat::from_path(path)? {
        RecordFormat::Csv => csv::read_records(path),
        RecordFormat::GeoJson => geojson::read_records(path),
    }
}
