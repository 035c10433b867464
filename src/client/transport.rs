//! HTTP transport abstraction
//!
//! The alert client only needs "POST this JSON, tell me the status and body".
//! Keeping that behind a trait lets tests script responses without a network.

use crate::error::TransportError;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Header carrying the Keep API key
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// A fully built outbound request
#[derive(Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl HttpRequest {
    /// Look up a header value, case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Headers with the API key masked, safe for printing
    pub fn redacted_headers(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(key, value)| {
                if key.eq_ignore_ascii_case(API_KEY_HEADER) {
                    (key.clone(), crate::connection::mask(value))
                } else {
                    (key.clone(), value.clone())
                }
            })
            .collect()
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("url", &self.url)
            .field("headers", &self.redacted_headers())
            .field("body", &self.body)
            .finish()
    }
}

/// Status and body of a response, whatever the status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Something that can deliver a JSON POST
pub trait HttpTransport: Send + Sync {
    /// Send the request and return the raw response
    ///
    /// Only failures that prevent a response from being read are errors;
    /// 4xx/5xx statuses come back as `Ok`.
    fn post_json(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Create a transport, optionally with a request timeout
    ///
    /// Without a timeout the reqwest default applies.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(&request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        let response = builder.json(&request.body).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Accept one connection, capture the request, answer with `reply`
    fn serve_once(reply: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                head.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();

            let mut stream = stream;
            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();

            format!("{}{}", head, String::from_utf8(body).unwrap())
        });

        (format!("http://{}", addr), handle)
    }

    fn request(url: String) -> HttpRequest {
        HttpRequest {
            url,
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                (API_KEY_HEADER.to_string(), "key-123".to_string()),
            ],
            body: json!({ "name": "ServiceOutage" }),
        }
    }

    #[test]
    fn test_reqwest_transport_posts_json() {
        let (base, server) = serve_once(
            "HTTP/1.1 202 Accepted\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
        );
        let transport = ReqwestTransport::new(Some(Duration::from_secs(5))).unwrap();

        let response = transport
            .post_json(&request(format!("{}/alerts/event", base)))
            .unwrap();
        assert_eq!(response.status, 202);
        assert_eq!(response.body, "ok");

        let raw = server.join().unwrap();
        assert!(raw.starts_with("POST /alerts/event HTTP/1.1"));
        assert!(raw.to_ascii_lowercase().contains("x-api-key: key-123"));
        assert!(raw.ends_with("{\"name\":\"ServiceOutage\"}"));
    }

    #[test]
    fn test_reqwest_transport_returns_error_status() {
        let (base, server) = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 12\r\nConnection: close\r\n\r\nserver error",
        );
        let transport = ReqwestTransport::new(Some(Duration::from_secs(5))).unwrap();

        let response = transport.post_json(&request(base)).unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(response.body, "server error");
        server.join().unwrap();
    }

    #[test]
    fn test_reqwest_transport_connection_refused() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let transport = ReqwestTransport::new(Some(Duration::from_secs(5))).unwrap();

        let err = transport
            .post_json(&request(format!("http://{}", addr)))
            .unwrap_err();
        assert!(matches!(err, TransportError::Request(_)));
    }

    #[test]
    fn test_redacted_headers() {
        let req = request("http://localhost".to_string());
        assert_eq!(req.header("x-api-key"), Some("key-123"));
        let redacted = req.redacted_headers();
        assert!(redacted.iter().all(|(_, v)| v != "key-123"));
        assert!(!format!("{:?}", req).contains("key-123"));
    }
}
