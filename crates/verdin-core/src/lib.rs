//! Verdin Core - Domain models, configuration, and port definitions
//!
//! This crate contains the core domain logic and port definitions for the verdin
//! annotation pipeline.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod ports;

pub use error::{Result, VerdinError};
