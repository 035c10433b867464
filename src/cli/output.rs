//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::client::HttpRequest;
use crate::connection::{mask, Connection, StaticRegistry};
use crate::domain::AlertPayload;
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Normalized payload for display
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct PayloadView {
    pub payload: AlertPayload,
}

impl From<AlertPayload> for PayloadView {
    fn from(payload: AlertPayload) -> Self {
        Self { payload }
    }
}

impl TableDisplay for PayloadView {
    fn to_table(&self) -> String {
        let p = &self.payload;
        let mut output = format!("Name:        {}\n", p.name);
        output.push_str(&format!("Status:      {}\n", p.status));
        output.push_str(&format!("Severity:    {}\n", p.severity));
        output.push_str(&format!("Environment: {}\n", p.environment));
        output.push_str(&format!("Source:      {}\n", p.source.join(", ")));
        output.push_str(&format!("Pushed:      {}\n", p.pushed));

        let optional = [
            ("Id", &p.id),
            ("Service", &p.service),
            ("Message", &p.message),
            ("Description", &p.description),
            ("Last seen", &p.last_received),
            ("Firing since", &p.firing_start_time),
            ("URL", &p.url),
            ("Image URL", &p.image_url),
            ("Fingerprint", &p.fingerprint),
            ("Assignee", &p.assignee),
            ("Note", &p.note),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                output.push_str(&format!("{:<13}{}\n", format!("{}:", label), value));
            }
        }

        if !p.labels.is_empty() {
            output.push_str("Labels:\n");
            for (key, value) in &p.labels {
                output.push_str(&format!("  {} = {}\n", key, label_text(value)));
            }
        }

        output
    }

    fn to_compact(&self) -> String {
        format!(
            "{} [{}/{}] {}",
            self.payload.name,
            self.payload.status,
            self.payload.severity,
            self.payload.environment
        )
    }
}

/// Request that would be sent, with the API key masked
#[derive(Debug, Clone, Serialize)]
pub struct RequestPreview {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl From<&HttpRequest> for RequestPreview {
    fn from(request: &HttpRequest) -> Self {
        Self {
            method: "POST",
            url: request.url.clone(),
            headers: request.redacted_headers(),
            body: request.body.clone(),
        }
    }
}

impl TableDisplay for RequestPreview {
    fn to_table(&self) -> String {
        let mut output = format!("[DRY RUN] {} {}\n", self.method, self.url);
        for (key, value) in &self.headers {
            output.push_str(&format!("{}: {}\n", key, value));
        }
        output.push('\n');
        output.push_str(
            &serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| "{}".to_string()),
        );
        output
    }

    fn to_compact(&self) -> String {
        format!("[DRY RUN] {} {}", self.method, self.url)
    }
}

/// Connection entry for display
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionEntry {
    pub conn_id: String,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub complete: bool,
}

impl ConnectionEntry {
    fn new(conn_id: &str, connection: &Connection) -> Self {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        Self {
            conn_id: conn_id.to_string(),
            endpoint: connection.host.clone(),
            api_key: connection.password.as_deref().map(mask),
            complete: present(&connection.host) && present(&connection.password),
        }
    }
}

impl TableDisplay for ConnectionEntry {
    fn to_table(&self) -> String {
        format!(
            "{} -> {} (key: {}){}",
            self.conn_id,
            self.endpoint.as_deref().unwrap_or("<no endpoint>"),
            self.api_key.as_deref().unwrap_or("<none>"),
            if self.complete { "" } else { " [incomplete]" }
        )
    }

    fn to_compact(&self) -> String {
        self.conn_id.clone()
    }
}

/// Connection list for display
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionList {
    pub connections: Vec<ConnectionEntry>,
}

impl From<&StaticRegistry> for ConnectionList {
    fn from(registry: &StaticRegistry) -> Self {
        Self {
            connections: registry
                .iter()
                .map(|(id, conn)| ConnectionEntry::new(id, conn))
                .collect(),
        }
    }
}

impl TableDisplay for ConnectionList {
    fn to_table(&self) -> String {
        if self.connections.is_empty() {
            return "No connections configured".to_string();
        }

        let mut output = format!("Connections: {}\n\n", self.connections.len());
        for conn in &self.connections {
            output.push_str(&conn.to_table());
            output.push('\n');
        }
        output
    }

    fn to_compact(&self) -> String {
        self.connections
            .iter()
            .map(|c| c.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        self.message.clone()
    }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AlertSeverity;
    use serde_json::json;

    #[test]
    fn test_payload_table() {
        let mut payload = AlertPayload::new("ServiceOutage");
        payload.severity = AlertSeverity::Critical;
        payload.service = Some("payments".to_string());
        payload.merge_labels([("dag_id".to_string(), json!("wf1"))]);

        let table = PayloadView::from(payload).to_table();
        assert!(table.contains("Name:        ServiceOutage"));
        assert!(table.contains("Severity:    critical"));
        assert!(table.contains("Service:     payments"));
        assert!(table.contains("dag_id = wf1"));
        assert!(!table.contains("Note:"));
    }

    #[test]
    fn test_payload_view_json_is_payload() {
        let view = PayloadView::from(AlertPayload::new("x"));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], json!("x"));
    }

    #[test]
    fn test_request_preview_masks_key() {
        let request = HttpRequest {
            url: "https://keep.example.com/alerts/event".to_string(),
            headers: vec![("X-API-KEY".to_string(), "supersecret".to_string())],
            body: json!({ "name": "x" }),
        };
        let preview = RequestPreview::from(&request);
        assert!(!preview.to_table().contains("supersecret"));
        assert!(preview.to_compact().contains("POST https://keep.example.com"));
    }

    #[test]
    fn test_connection_list() {
        let registry = StaticRegistry::new()
            .with_connection("a", Connection::new("https://keep.example.com", "abcdefgh"))
            .with_connection("b", Connection::new("", "k"));
        let list = ConnectionList::from(&registry);

        assert_eq!(list.connections.len(), 2);
        assert!(list.connections[0].complete);
        assert_eq!(list.connections[0].api_key.as_deref(), Some("****efgh"));
        assert!(!list.connections[1].complete);
        assert!(list.to_table().contains("[incomplete]"));
        assert_eq!(list.to_compact(), "a, b");
    }

    #[test]
    fn test_empty_connection_list() {
        let list = ConnectionList::from(&StaticRegistry::new());
        assert_eq!(list.to_table(), "No connections configured");
    }
}
