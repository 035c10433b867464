//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use crate::error::{AppError, ConfigError};
use crate::notifier::EventContext;
use chrono::{DateTime, Utc};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Keep alert forwarder
///
/// Send alerts and task lifecycle notifications to the Keep alert management
/// service.
#[derive(Parser, Debug)]
#[command(name = "keepctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "KEEPCTL_CONFIG")]
    pub config: Option<String>,

    /// Connection profile holding the Keep endpoint and API key
    #[arg(long, global = true)]
    pub conn_id: Option<String>,

    /// Alert path appended to the connection endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Reject payload keys the schema does not know
    #[arg(long, global = true)]
    pub strict: bool,

    /// Dry run mode - build and print the request without sending it
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a single alert
    Send(SendArgs),

    /// Simulate a task lifecycle event and notify Keep
    Notify(NotifyArgs),

    /// Validate an alert payload file and print the normalized record
    Validate(ValidateArgs),

    /// List configured connection profiles
    Connections,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Alert fields shared by `send` and `notify`
///
/// Flags override values read from `--data`.
#[derive(Args, Debug, Default)]
pub struct AlertArgs {
    /// JSON file with alert data
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Alert name
    #[arg(long)]
    pub name: Option<String>,

    /// Alert status (firing, resolved, acknowledged, suppressed, pending)
    #[arg(long)]
    pub status: Option<String>,

    /// Alert severity (critical, high, warning, info, low)
    #[arg(long)]
    pub severity: Option<String>,

    /// Concise alert summary
    #[arg(long)]
    pub message: Option<String>,

    /// Detailed explanation
    #[arg(long)]
    pub description: Option<String>,

    /// Affected service
    #[arg(long)]
    pub service: Option<String>,

    /// Environment name
    #[arg(long)]
    pub environment: Option<String>,

    /// Alert grouping fingerprint
    #[arg(long)]
    pub fingerprint: Option<String>,

    /// Extra label (format: KEY=VALUE)
    #[arg(long = "label", value_name = "KEY=VALUE")]
    pub labels: Vec<String>,
}

impl AlertArgs {
    /// Assemble the raw alert mapping
    pub fn to_map(&self) -> Result<Map<String, Value>, AppError> {
        let mut map = match &self.data {
            Some(path) => read_object(path)?,
            None => Map::new(),
        };

        let fields = [
            ("name", &self.name),
            ("status", &self.status),
            ("severity", &self.severity),
            ("message", &self.message),
            ("description", &self.description),
            ("service", &self.service),
            ("environment", &self.environment),
            ("fingerprint", &self.fingerprint),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                map.insert(key.to_string(), Value::String(value.clone()));
            }
        }

        if !self.labels.is_empty() {
            let labels = map
                .entry("labels")
                .or_insert_with(|| Value::Object(Map::new()));
            // A non-object `labels` from the data file is left for the schema to report
            if let Value::Object(labels) = labels {
                for pair in &self.labels {
                    let (key, value) = parse_label(pair)?;
                    labels.insert(key, Value::String(value));
                }
            }
        }

        Ok(map)
    }
}

/// Arguments for the send command
#[derive(Parser, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub alert: AlertArgs,
}

/// Arguments for the notify command
#[derive(Parser, Debug)]
pub struct NotifyArgs {
    #[command(flatten)]
    pub alert: AlertArgs,

    /// Workflow (DAG) identifier
    #[arg(long)]
    pub dag_id: Option<String>,

    /// Task identifier
    #[arg(long)]
    pub task_id: Option<String>,

    /// Run identifier
    #[arg(long)]
    pub run_id: Option<String>,

    /// Execution timestamp (RFC 3339)
    #[arg(long, value_parser = parse_timestamp)]
    pub execution_date: Option<DateTime<Utc>>,

    /// Attempt number
    #[arg(long)]
    pub try_number: Option<u32>,
}

impl NotifyArgs {
    /// Event context described by the flags
    pub fn context(&self) -> EventContext {
        EventContext {
            dag_id: self.dag_id.clone(),
            task_id: self.task_id.clone(),
            run_id: self.run_id.clone(),
            execution_date: self.execution_date,
            try_number: self.try_number,
        }
    }
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// JSON payload file, or '-' for stdin
    pub path: String,

    /// Also fill the timestamps the client would add before sending
    #[arg(long)]
    pub enrich: bool,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{}': {}", s, e))
}

fn parse_label(pair: &str) -> Result<(String, String), ConfigError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidValue {
            key: "label".to_string(),
            message: format!("expected KEY=VALUE, got '{}'", pair),
        }),
    }
}

fn read_object(path: &Path) -> Result<Map<String, Value>, AppError> {
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::InvalidValue {
            key: "data".to_string(),
            message: format!("{} does not contain a JSON object", path.display()),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_cli_parse_connections() {
        let args = Cli::try_parse_from(["keepctl", "connections"]).unwrap();
        assert!(matches!(args.command, Commands::Connections));
    }

    #[test]
    fn test_cli_parse_verbose() {
        let args = Cli::try_parse_from(["keepctl", "-v", "connections"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_parse_global_overrides() {
        let args = Cli::try_parse_from([
            "keepctl",
            "send",
            "--name",
            "x",
            "--conn-id",
            "keep_prod",
            "--endpoint",
            "/alerts/event/airflow",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.conn_id.as_deref(), Some("keep_prod"));
        assert_eq!(args.endpoint.as_deref(), Some("/alerts/event/airflow"));
        assert!(args.dry_run);
    }

    #[test]
    fn test_cli_parse_send() {
        let args = Cli::try_parse_from([
            "keepctl",
            "send",
            "--name",
            "ServiceOutage",
            "--severity",
            "critical",
            "--label",
            "team=payments",
        ])
        .unwrap();

        if let Commands::Send(send) = args.command {
            let map = send.alert.to_map().unwrap();
            assert_eq!(map["name"], json!("ServiceOutage"));
            assert_eq!(map["severity"], json!("critical"));
            assert_eq!(map["labels"], json!({ "team": "payments" }));
        } else {
            panic!("Expected Send command");
        }
    }

    #[test]
    fn test_cli_parse_notify() {
        let args = Cli::try_parse_from([
            "keepctl",
            "notify",
            "--name",
            "TaskFailure",
            "--dag-id",
            "wf1",
            "--try-number",
            "3",
            "--execution-date",
            "2024-05-01T12:00:00Z",
        ])
        .unwrap();

        if let Commands::Notify(notify) = args.command {
            let context = notify.context();
            assert_eq!(context.dag_id.as_deref(), Some("wf1"));
            assert_eq!(context.try_number, Some(3));
            assert!(context.execution_date.is_some());
        } else {
            panic!("Expected Notify command");
        }
    }

    #[test]
    fn test_cli_rejects_bad_execution_date() {
        let result = Cli::try_parse_from([
            "keepctl",
            "notify",
            "--execution-date",
            "yesterday",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(
            parse_label("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
        assert!(parse_label("novalue").is_err());
        assert!(parse_label("=x").is_err());
    }

    #[test]
    fn test_flags_override_data_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!({ "name": "FromFile", "service": "etl", "labels": { "a": "1" } })
        )
        .unwrap();

        let args = AlertArgs {
            data: Some(file.path().to_path_buf()),
            name: Some("FromFlag".to_string()),
            labels: vec!["b=2".to_string()],
            ..AlertArgs::default()
        };
        let map = args.to_map().unwrap();
        assert_eq!(map["name"], json!("FromFlag"));
        assert_eq!(map["service"], json!("etl"));
        assert_eq!(map["labels"], json!({ "a": "1", "b": "2" }));
    }

    #[test]
    fn test_data_file_must_be_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();

        let args = AlertArgs {
            data: Some(file.path().to_path_buf()),
            ..AlertArgs::default()
        };
        assert!(matches!(args.to_map(), Err(AppError::Config(_))));
    }
}
