use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Verdin - EVI annotation for wildlife observation records
#[derive(Parser, Debug)]
#[command(name = "verdin")]
#[command(about = "Annotate observation records with composited EVI values", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to a TOML configuration file (defaults to verdin.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress bars
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotate observation records with EVI values
    Annotate(AnnotateArgs),

    /// Build the composite layers and show their metadata
    Layers(LayersArgs),

    /// Inspect or create the run configuration
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct AnnotateArgs {
    /// Path to the observation records file (CSV or GeoJSON)
    pub records: PathBuf,

    /// Directory holding the scene archive as date-stamped ASCII grids
    #[arg(long, value_name = "DIR")]
    pub archive_dir: PathBuf,

    /// Destination CSV file for the annotated rows
    #[arg(long, short = 'o', default_value = "annotations.csv")]
    pub output: PathBuf,

    /// Temporal aggregation mode (monthly or overall)
    #[arg(long, value_name = "MODE")]
    pub temporal: Option<String>,

    /// Spatial resolution mode (native, coarse, 30m, or 1km)
    #[arg(long, value_name = "MODE")]
    pub spatial: Option<String>,

    /// Archive name the scene directory must match
    #[arg(long, value_name = "NAME")]
    pub archive: Option<String>,

    /// Start of the aggregation window (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<String>,

    /// End of the aggregation window (YYYY-MM-DD, exclusive)
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<String>,

    /// Annotate at most this many records
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// GeoJSON polygon file overriding the clip region
    #[arg(long, value_name = "FILE")]
    pub region: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct LayersArgs {
    /// Directory holding the scene archive as date-stamped ASCII grids
    #[arg(long, value_name = "DIR")]
    pub archive_dir: PathBuf,

    /// Temporal aggregation mode (monthly or overall)
    #[arg(long, value_name = "MODE")]
    pub temporal: Option<String>,

    /// Spatial resolution mode (native, coarse, 30m, or 1km)
    #[arg(long, value_name = "MODE")]
    pub spatial: Option<String>,

    /// Archive name the scene directory must match
    #[arg(long, value_name = "NAME")]
    pub archive: Option<String>,

    /// Start of the aggregation window (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<String>,

    /// End of the aggregation window (YYYY-MM-DD, exclusive)
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<String>,

    /// GeoJSON polygon file overriding the clip region
    #[arg(long, value_name = "FILE")]
    pub region: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration command
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration and where each value came from
    Show,

    /// Write a starter configuration file with the default values
    Init(ConfigInitArgs),
}

#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Destination path for the configuration file
    #[arg(default_value = "verdin.toml")]
    pub path: PathBuf,

    /// Overwrite the file if it already exists
    #[arg(long)]
    pub force: bool,
}
