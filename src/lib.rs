//! keepctl - Keep alert forwarding library
//!
//! This library forwards workflow task lifecycle events to the Keep alert
//! management service through its HTTP ingestion endpoint.
//!
//! # Modules
//!
//! - [`cli`]: Command-line interface definitions
//! - [`client`]: HTTP client posting alerts to Keep
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`connection`]: Connection profiles and credential resolution
//! - [`domain`]: Alert payload schema with validation
//! - [`error`]: Error types
//! - [`notifier`]: Lifecycle event notifiers

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod connection;
pub mod domain;
pub mod error;
pub mod notifier;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
