//! Alert status and severity
//!
//! Closed value sets accepted by the Keep ingestion API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Alert is currently active
    #[default]
    Firing,
    /// Condition cleared
    Resolved,
    /// Someone is looking at it
    Acknowledged,
    /// Muted by a rule or operator
    Suppressed,
    /// Waiting to fire
    Pending,
}

impl AlertStatus {
    /// All accepted values, in wire form
    pub const VALUES: [&'static str; 5] =
        ["firing", "resolved", "acknowledged", "suppressed", "pending"];

    /// Wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Firing => "firing",
            Self::Resolved => "resolved",
            Self::Acknowledged => "acknowledged",
            Self::Suppressed => "suppressed",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firing" => Ok(Self::Firing),
            "resolved" => Ok(Self::Resolved),
            "acknowledged" => Ok(Self::Acknowledged),
            "suppressed" => Ok(Self::Suppressed),
            "pending" => Ok(Self::Pending),
            other => Err(format!(
                "'{}' is not one of {}",
                other,
                Self::VALUES.join(", ")
            )),
        }
    }
}

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Immediate action required
    Critical,
    /// Action required soon
    High,
    /// Attention recommended
    Warning,
    /// Informational, no action needed
    #[default]
    Info,
    /// Background noise
    Low,
}

impl AlertSeverity {
    /// All accepted values, in wire form
    pub const VALUES: [&'static str; 5] = ["critical", "high", "warning", "info", "low"];

    /// Wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertSeverity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "warning" => Ok(Self::Warning),
            "info" => Ok(Self::Info),
            "low" => Ok(Self::Low),
            other => Err(format!(
                "'{}' is not one of {}",
                other,
                Self::VALUES.join(", ")
            )),
        }
    }
}
