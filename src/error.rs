//! Unified error types for keepctl
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use std::fmt;
use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Alert payload failed schema validation
    #[error("Invalid alert payload: {0}")]
    Validation(#[from] ValidationError),

    /// Error from configuration or connection lookup
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error while delivering an alert
    #[error("{0}")]
    Send(#[from] SendError),

    /// Error surfaced by a notifier
    #[error("{0}")]
    Notification(#[from] NotificationError),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single schema violation on one payload field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// JSON name of the offending field
    pub field: String,
    /// Human readable reason
    pub reason: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Alert payload schema failure listing every violated field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Create from a list of violations
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// All violations, in field check order
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Whether the given field was among the violations
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s): ", self.violations.len())?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

/// Errors from configuration parsing and connection resolution
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Failed to parse config file
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Named connection is not registered
    #[error("Connection '{0}' is not defined")]
    ConnectionNotFound(String),

    /// Connection has no endpoint
    #[error("Keep endpoint (host) not configured in connection '{0}'")]
    MissingEndpoint(String),

    /// Connection has no API key
    #[error("Keep API key not configured in connection '{0}' (password field)")]
    MissingApiKey(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Errors from the HTTP transport layer, before any response was obtained
#[derive(Error, Debug)]
pub enum TransportError {
    /// Underlying HTTP client failure (DNS, timeout, connection refused)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Request body could not be encoded
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// Connection-level failure reported by a non-reqwest transport
    #[error("Connection failed: {0}")]
    Connection(String),
}

/// Errors from a single alert delivery
#[derive(Error, Debug)]
pub enum SendError {
    /// Enriched payload no longer satisfies the schema
    #[error("Invalid alert payload: {0}")]
    Validation(#[from] ValidationError),

    /// Service answered with a 4xx or 5xx status
    #[error("Keep API request failed: {status} - {body}")]
    Transmission { status: u16, body: String },

    /// No response was obtained
    #[error("Failed to send alert: {0}")]
    Transport(#[from] TransportError),
}

impl SendError {
    /// HTTP status carried by a transmission failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transmission { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Uniform failure reported by a notifier, wrapping whatever went wrong
#[derive(Error, Debug)]
#[error("Failed to send Keep notification: {source}")]
pub struct NotificationError {
    #[source]
    source: Box<AppError>,
}

impl NotificationError {
    /// Wrap any application error
    pub fn new(cause: impl Into<AppError>) -> Self {
        Self {
            source: Box::new(cause.into()),
        }
    }

    /// The original failure
    pub fn cause(&self) -> &AppError {
        &self.source
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
