//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::client::DEFAULT_ALERT_ENDPOINT;
use crate::connection::{Connection, StaticRegistry, DEFAULT_CONN_ID};
use crate::domain::UnknownKeyPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Keep delivery settings
    pub keep: KeepConfig,
    /// Connection profiles by identifier
    pub connections: HashMap<String, Connection>,
}

impl Config {
    /// Registry serving the configured connection profiles
    pub fn registry(&self) -> StaticRegistry {
        StaticRegistry::from(self.connections.clone())
    }
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
    /// Build requests without sending them
    pub dry_run: bool,
}

/// Keep delivery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeepConfig {
    /// Connection profile to resolve credentials from
    pub conn_id: String,
    /// Path appended to the connection endpoint
    pub alert_endpoint: String,
    /// HTTP timeout; the client default applies when unset
    pub timeout_secs: Option<u64>,
    /// Handling of payload keys the schema does not know
    pub unknown_keys: UnknownKeyPolicy,
}

impl KeepConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for KeepConfig {
    fn default() -> Self {
        Self {
            conn_id: DEFAULT_CONN_ID.to_string(),
            alert_endpoint: DEFAULT_ALERT_ENDPOINT.to_string(),
            timeout_secs: None,
            unknown_keys: UnknownKeyPolicy::Ignore,
        }
    }
}
