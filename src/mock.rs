//! Mock implementations for testing
//!
//! Provides a scripted HTTP transport and registry fixtures for unit testing
//! without a Keep server.

use crate::client::{HttpRequest, HttpResponse, HttpTransport};
use crate::connection::{Connection, StaticRegistry, DEFAULT_CONN_ID};
use crate::error::TransportError;

use std::sync::{Arc, Mutex};

/// What the mock answers with
#[derive(Debug, Clone)]
enum Reply {
    Response(HttpResponse),
    Failure(String),
}

/// Mock transport that records every request
///
/// Clones share the same request log, so a test can hand one clone to the
/// client and inspect the other.
#[derive(Debug, Clone)]
pub struct MockTransport {
    reply: Reply,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    /// A transport answering 200 with an empty body
    pub fn new() -> Self {
        Self::with_response(200, "")
    }

    /// A transport answering with the given status and body
    pub fn with_response(status: u16, body: impl Into<String>) -> Self {
        Self {
            reply: Reply::Response(HttpResponse {
                status,
                body: body.into(),
            }),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A transport whose every call fails before a response
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reply: Reply::Failure(reason.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for MockTransport {
    fn post_json(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());

        match &self.reply {
            Reply::Response(response) => Ok(response.clone()),
            Reply::Failure(reason) => Err(TransportError::Connection(reason.clone())),
        }
    }
}

/// Registry with a complete `keep_default` connection
pub fn mock_registry() -> StaticRegistry {
    StaticRegistry::new().with_connection(
        DEFAULT_CONN_ID,
        Connection::new("https://keep.example.com", "mock-api-key"),
    )
}
