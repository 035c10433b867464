//! keepctl - Keep alert forwarder
//!
//! A command-line tool for sending alerts and task lifecycle notifications to
//! the Keep alert management service.

use clap::Parser;
use keepctl::cli::args::{generate_completions, Cli, Commands};
use keepctl::commands::{run_connections, run_notify, run_send, run_validate};
use keepctl::config::{Config, ConfigBuilder};
use keepctl::domain::UnknownKeyPolicy;
use keepctl::error::{AppError, ConfigError, SendError};

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    logger(cli.verbose).init();

    // Run the appropriate command
    let result = load_config(&cli).and_then(|config| run(&cli, &config));

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

/// Logger with a `warn` default, overridden by `RUST_LOG`, and `debug` when verbose
fn logger(verbose: bool) -> env_logger::Builder {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.format_timestamp(None);

    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }

    builder
}

fn load_config(cli: &Cli) -> Result<Config, AppError> {
    let mut config = ConfigBuilder::new()
        .with_file(cli.config.as_deref())?
        .with_verbose(cli.verbose.then_some(true))
        .with_dry_run(cli.dry_run.then_some(true))
        .with_conn_id(cli.conn_id.clone())
        .with_alert_endpoint(cli.endpoint.clone())
        .with_timeout(cli.timeout)
        .build();

    if cli.strict {
        config.keep.unknown_keys = UnknownKeyPolicy::Reject;
    }

    Ok(config)
}

fn run(cli: &Cli, config: &Config) -> Result<(), AppError> {
    match &cli.command {
        Commands::Send(args) => run_send(args, config, cli.format),

        Commands::Notify(args) => run_notify(args, config, cli.format),

        Commands::Validate(args) => run_validate(args, config, cli.format),

        Commands::Connections => run_connections(config, cli.format),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    let cause = match err {
        AppError::Notification(n) => n.cause(),
        other => other,
    };

    // Print helpful hints for common errors
    match cause {
        AppError::Config(ConfigError::ConnectionNotFound(id)) => {
            eprintln!();
            eprintln!("Hint: Define the connection in your config file:");
            eprintln!("      [connections.{}]", id);
            eprintln!("      host = \"https://api.keep.dev\"");
            eprintln!("      password = \"<api key>\"");
        }
        AppError::Config(ConfigError::MissingApiKey(_)) => {
            eprintln!();
            eprintln!("Hint: The Keep API key goes in the connection's 'password' field.");
        }
        AppError::Send(SendError::Transmission { status: 401, .. })
        | AppError::Send(SendError::Transmission { status: 403, .. }) => {
            eprintln!();
            eprintln!("Hint: Keep rejected the API key. Check the connection's password.");
        }
        _ => {}
    }
}
