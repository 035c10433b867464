//! Connection registry abstraction
//!
//! The trait lets the host runtime plug in its own credential store, while
//! [`StaticRegistry`] serves connections defined in the config file.

use super::{Connection, Credentials};
use crate::error::ConfigError;
use std::collections::{BTreeMap, HashMap};

/// Read-only lookup of connection profiles by identifier
pub trait ConnectionRegistry: Send + Sync {
    /// Fetch a connection, `None` if the identifier is unknown
    fn get_connection(&self, conn_id: &str) -> Option<Connection>;
}

/// Registry backed by an in-memory map
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    connections: BTreeMap<String, Connection>,
}

impl StaticRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a connection
    pub fn with_connection(mut self, conn_id: impl Into<String>, connection: Connection) -> Self {
        self.insert(conn_id, connection);
        self
    }

    /// Add or replace a connection
    pub fn insert(&mut self, conn_id: impl Into<String>, connection: Connection) {
        self.connections.insert(conn_id.into(), connection);
    }

    /// Iterate connections in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Connection)> {
        self.connections.iter().map(|(id, conn)| (id.as_str(), conn))
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl From<HashMap<String, Connection>> for StaticRegistry {
    fn from(map: HashMap<String, Connection>) -> Self {
        Self {
            connections: map.into_iter().collect(),
        }
    }
}

impl ConnectionRegistry for StaticRegistry {
    fn get_connection(&self, conn_id: &str) -> Option<Connection> {
        self.connections.get(conn_id).cloned()
    }
}

/// Resolve a connection identifier into endpoint and API key
///
/// # Errors
/// Returns `ConfigError::ConnectionNotFound` for an unknown identifier, and
/// `MissingEndpoint`/`MissingApiKey` when either field is unset or blank.
pub fn resolve_credentials<R>(registry: &R, conn_id: &str) -> Result<Credentials, ConfigError>
where
    R: ConnectionRegistry + ?Sized,
{
    let connection = registry
        .get_connection(conn_id)
        .ok_or_else(|| ConfigError::ConnectionNotFound(conn_id.to_string()))?;

    let endpoint = non_blank(connection.host)
        .ok_or_else(|| ConfigError::MissingEndpoint(conn_id.to_string()))?;
    let api_key = non_blank(connection.password)
        .ok_or_else(|| ConfigError::MissingApiKey(conn_id.to_string()))?;

    log::debug!("Resolved connection '{}' to {}", conn_id, endpoint);

    Ok(Credentials { endpoint, api_key })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
