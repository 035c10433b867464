//! Keep alert client
//!
//! Sends one validated alert payload to the Keep ingestion endpoint per call.
//! There is no retry: every failure is returned to the caller as is.

mod transport;

pub use transport::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, API_KEY_HEADER,
};

use crate::connection::{resolve_credentials, ConnectionRegistry, Credentials};
use crate::domain::AlertPayload;
use crate::error::{AppError, ConfigError, SendError, TransportError};
use chrono::Utc;
use std::time::Duration;

/// Path alerts are posted to when none is configured
pub const DEFAULT_ALERT_ENDPOINT: &str = "/alerts/event";

/// Client bound to one set of Keep credentials
pub struct AlertClient {
    credentials: Credentials,
    alert_endpoint: String,
    transport: Box<dyn HttpTransport>,
}

impl AlertClient {
    /// Create a client from already resolved credentials
    pub fn new(
        credentials: Credentials,
        alert_endpoint: impl Into<String>,
        transport: Box<dyn HttpTransport>,
    ) -> Self {
        Self {
            credentials,
            alert_endpoint: alert_endpoint.into(),
            transport,
        }
    }

    /// Resolve a named connection and create a client over `transport`
    ///
    /// # Errors
    /// Returns `ConfigError` if the connection is unknown or incomplete. No
    /// request is made in that case.
    pub fn from_connection<R>(
        registry: &R,
        conn_id: &str,
        alert_endpoint: impl Into<String>,
        transport: Box<dyn HttpTransport>,
    ) -> Result<Self, ConfigError>
    where
        R: ConnectionRegistry + ?Sized,
    {
        let credentials = resolve_credentials(registry, conn_id)?;
        Ok(Self::new(credentials, alert_endpoint, transport))
    }

    /// Resolve a named connection and create a client over HTTP
    pub fn connect<R>(
        registry: &R,
        conn_id: &str,
        alert_endpoint: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, AppError>
    where
        R: ConnectionRegistry + ?Sized,
    {
        let credentials = resolve_credentials(registry, conn_id)?;
        let transport = ReqwestTransport::new(timeout).map_err(SendError::from)?;
        Ok(Self::new(credentials, alert_endpoint, Box::new(transport)))
    }

    /// Full URL alerts are posted to
    pub fn url(&self) -> String {
        join_url(&self.credentials.endpoint, &self.alert_endpoint)
    }

    pub fn alert_endpoint(&self) -> &str {
        &self.alert_endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the request that [`send`](Self::send) would issue
    ///
    /// Fills in missing timestamps and re-validates the payload.
    pub fn build_request(&self, payload: &AlertPayload) -> Result<HttpRequest, SendError> {
        let mut payload = payload.clone();
        payload.fill_timestamps(Utc::now());
        payload.validate()?;

        let body = payload.to_json().map_err(TransportError::from)?;

        Ok(HttpRequest {
            url: self.url(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
                (API_KEY_HEADER.to_string(), self.credentials.api_key.clone()),
            ],
            body,
        })
    }

    /// Send one alert
    ///
    /// # Errors
    /// - `SendError::Validation` if the enriched payload breaks the schema
    /// - `SendError::Transmission` for a 4xx/5xx response
    /// - `SendError::Transport` if no response was obtained
    pub fn send(&self, payload: &AlertPayload) -> Result<(), SendError> {
        let request = self.build_request(payload)?;
        log::debug!("Posting alert '{}' to {}", payload.name, request.url);

        let response = self.transport.post_json(&request)?;

        if (400..600).contains(&response.status) {
            log::warn!(
                "Keep rejected alert '{}' with status {}",
                payload.name,
                response.status
            );
            return Err(SendError::Transmission {
                status: response.status,
                body: response.body,
            });
        }

        log::info!(
            "Alert '{}' sent to Keep (status {})",
            payload.name,
            response.status
        );
        Ok(())
    }
}

/// Join an endpoint base and path with exactly one separating slash
///
/// A base without a scheme is treated as plain http, like host-only
/// connection profiles usually are.
fn join_url(base: &str, path: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    let base = if base.contains("://") {
        base.to_string()
    } else {
        format!("http://{}", base)
    };

    let path = path.trim().trim_start_matches('/');
    if path.is_empty() {
        base
    } else {
        format!("{}/{}", base, path)
    }
}
