//! Validate command implementation
//!
//! Checks a payload file against the alert schema without sending anything.

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::cli::output::{print_output, PayloadView};
use crate::config::Config;
use crate::domain::AlertPayload;
use crate::error::Result;
use chrono::Utc;
use serde_json::Value;
use std::io::Read;

/// Execute the validate command
pub fn run_validate(args: &ValidateArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let content = if args.path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&args.path)?
    };

    let value: Value = serde_json::from_str(&content)?;
    let mut payload = AlertPayload::from_value(&value, config.keep.unknown_keys)?;

    if args.enrich {
        payload.fill_timestamps(Utc::now());
        payload.validate()?;
    }

    log::debug!("Payload '{}' is valid", payload.name);
    print_output(&PayloadView::from(payload), format)?;

    Ok(())
}
