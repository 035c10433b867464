//! Connections command implementation
//!
//! Lists connection profiles from the configuration file.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, ConnectionList};
use crate::config::Config;
use crate::error::Result;

/// Execute the connections command
pub fn run_connections(config: &Config, format: OutputFormat) -> Result<()> {
    let registry = config.registry();
    print_output(&ConnectionList::from(&registry), format)?;
    Ok(())
}
