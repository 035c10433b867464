//! Notify command implementation
//!
//! Plays the host runtime: builds a Keep notifier and fires it once with an
//! event context taken from the command line.

use crate::cli::args::{NotifyArgs, OutputFormat};
use crate::cli::output::{print_output, Message, RequestPreview};
use crate::config::Config;
use crate::error::Result;
use crate::notifier::{KeepNotifier, Notifier};

/// Execute the notify command
pub fn run_notify(args: &NotifyArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let data = args.alert.to_map()?;
    let notifier = KeepNotifier::new(&config.registry(), &config.keep, &data)?;
    let context = args.context();

    if config.general.dry_run {
        let request = notifier.preview(&context)?;
        print_output(&RequestPreview::from(&request), format)?;
        return Ok(());
    }

    notifier.notify(&context)?;

    let target = context.task_id.as_deref().unwrap_or("<no task>");
    print_output(
        &Message {
            message: format!(
                "Notified Keep of '{}' for task {} via '{}'",
                notifier.payload().name,
                target,
                notifier.conn_id()
            ),
            success: true,
        },
        format,
    )?;

    Ok(())
}
