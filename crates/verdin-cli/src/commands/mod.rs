//! Command implementations

pub mod annotate;
pub mod config;
pub mod layers;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute the parsed CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    // Progress bars are suppressed in JSON mode so stdout stays parseable
    let quiet = cli.quiet || cli.json;

    match cli.command {
        Commands::Annotate(args) => {
            annotate::execute(args, &output, cli.config.as_deref(), quiet)
        }
        Commands::Layers(args) => layers::execute(args, &output, cli.config.as_deref()),
        Commands::Config(args) => config::execute(args, &output, cli.config.as_deref()),
    }
}
