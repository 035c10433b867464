//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file, or from the default locations
    ///
    /// An explicitly named file must exist.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default()?,
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with CLI verbose flag
    pub fn with_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.config.general.verbose = v;
        }
        self
    }

    /// Override with CLI dry-run flag
    pub fn with_dry_run(mut self, dry_run: Option<bool>) -> Self {
        if let Some(d) = dry_run {
            self.config.general.dry_run = d;
        }
        self
    }

    /// Override with CLI connection identifier
    pub fn with_conn_id(mut self, conn_id: Option<String>) -> Self {
        if let Some(id) = conn_id {
            self.config.keep.conn_id = id;
        }
        self
    }

    /// Override with CLI alert endpoint path
    pub fn with_alert_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(e) = endpoint {
            self.config.keep.alert_endpoint = e;
        }
        self
    }

    /// Override with CLI timeout
    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        if let Some(t) = timeout_secs {
            self.config.keep.timeout_secs = Some(t);
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
