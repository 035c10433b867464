//! Send command implementation
//!
//! Sends one alert built from flags and/or a JSON file.

use crate::cli::args::{OutputFormat, SendArgs};
use crate::cli::output::{print_output, Message, RequestPreview};
use crate::client::AlertClient;
use crate::config::Config;
use crate::domain::AlertPayload;
use crate::error::Result;

/// Execute the send command
pub fn run_send(args: &SendArgs, config: &Config, format: OutputFormat) -> Result<()> {
    // Validate before touching connections or the network
    let data = args.alert.to_map()?;
    let payload = AlertPayload::from_map(&data, config.keep.unknown_keys)?;

    let client = AlertClient::connect(
        &config.registry(),
        &config.keep.conn_id,
        config.keep.alert_endpoint.as_str(),
        config.keep.timeout(),
    )?;

    if config.general.dry_run {
        let request = client.build_request(&payload)?;
        print_output(&RequestPreview::from(&request), format)?;
        return Ok(());
    }

    client.send(&payload)?;

    print_output(
        &Message {
            message: format!("Sent alert '{}' to {}", payload.name, client.url()),
            success: true,
        },
        format,
    )?;

    Ok(())
}
