//! Connection profiles and credential resolution
//!
//! The host runtime owns the connection store. This module only reads it
//! through the [`ConnectionRegistry`] trait and turns a named profile into the
//! endpoint and API key the alert client needs.

mod registry;

pub use registry::{resolve_credentials, ConnectionRegistry, StaticRegistry};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Connection type name registered with the host runtime
pub const CONN_TYPE: &str = "keep";

/// Connection identifier used when none is given
pub const DEFAULT_CONN_ID: &str = "keep_default";

/// A named credential bundle as stored by the host
///
/// Only `host` and `password` are read; they carry the Keep endpoint and the
/// API key respectively.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connection {
    pub host: Option<String>,
    pub password: Option<String>,
}

impl Connection {
    pub fn new(host: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            password: Some(password.into()),
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Endpoint and API key resolved from a connection
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub endpoint: String,
    pub api_key: String,
}

impl Credentials {
    /// The API key with everything but the last four characters hidden
    pub fn masked_key(&self) -> String {
        mask(&self.api_key)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.masked_key())
            .finish()
    }
}

/// How a host UI should present the connection form for this type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldBehaviour {
    pub hidden_fields: Vec<&'static str>,
    /// (field, label)
    pub relabeling: Vec<(&'static str, &'static str)>,
    /// (field, placeholder)
    pub placeholders: Vec<(&'static str, &'static str)>,
}

/// Connection form layout for the `keep` connection type
pub fn connection_field_behaviour() -> FieldBehaviour {
    FieldBehaviour {
        hidden_fields: vec!["port", "schema", "extra", "login"],
        relabeling: vec![("host", "Keep Endpoint"), ("password", "Keep API Key")],
        placeholders: vec![
            ("host", "https://api.keep.dev"),
            ("password", "Enter API key"),
        ],
    }
}

/// Hide a secret for display
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdefgh"), "****efgh");
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let conn = Connection::new("https://keep.example.com", "supersecret");
        assert!(!format!("{:?}", conn).contains("supersecret"));

        let creds = Credentials {
            endpoint: "https://keep.example.com".to_string(),
            api_key: "supersecret".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("supersecret"));
        assert!(debug.contains("cret"));
    }

    #[test]
    fn test_field_behaviour() {
        let behaviour = connection_field_behaviour();
        assert!(behaviour.hidden_fields.contains(&"login"));
        assert!(behaviour
            .relabeling
            .contains(&("password", "Keep API Key")));
    }
}
