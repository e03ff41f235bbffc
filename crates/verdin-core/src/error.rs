//! Error types for verdin

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerdinError {
    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // Region errors
    #[error("Invalid region: {reason}")]
    InvalidRegion { reason: String },

    // Layer errors
    #[error("No layer built for month {month}")]
    LayerMissing { month: u32 },

    // Archive errors
    #[error("Archive {archive} has no images for the requested window")]
    ArchiveEmpty { archive: String },

    // Record errors
    #[error("Invalid record {id}: {reason}")]
    RecordInvalid { id: String, reason: String },

    // Format errors
    #[error("Unsupported record format: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("Invalid {format} input: {reason}")]
    FormatInvalid { format: String, reason: String },

    // Engine errors
    #[error("Engine error: {0}")]
    Engine(String),

    // Export errors
    #[error("Export failed: {0}")]
    Export(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, VerdinError>;
