//! Verdin Engine - Archive compute and export adapters
//!
//! This crate provides the in-memory compute engine over scene archives and
//! the sinks annotation rows are exported through.

pub mod archive;
pub mod memory;
pub mod sink;

pub use archive::{Scene, SceneArchive};
pub use memory::MemoryEngine;
pub use sink::{CsvSink, MemorySink};
