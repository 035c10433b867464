//! Keep notifier
//!
//! Forwards task lifecycle events to Keep, tagging the alert with the
//! workflow, task and run that triggered it.

use super::{EventContext, Notifier};
use crate::client::{AlertClient, HttpRequest, HttpTransport, ReqwestTransport};
use crate::config::KeepConfig;
use crate::connection::ConnectionRegistry;
use crate::domain::AlertPayload;
use crate::error::{AppError, NotificationError, SendError};
use serde_json::{Map, Value};

/// Notifier sending one Keep alert per event
///
/// The alert data is validated and the credentials resolved once, when the
/// notifier is built. Each call works on its own copy of the payload.
pub struct KeepNotifier {
    conn_id: String,
    payload: AlertPayload,
    client: AlertClient,
}

impl KeepNotifier {
    /// Build a notifier sending over HTTP
    ///
    /// Construction errors are returned as they are, not wrapped in
    /// `NotificationError`; only `notify` uses that wrapper.
    ///
    /// # Errors
    /// Returns `AppError::Validation` if `alert_data` breaks the schema, or
    /// `AppError::Config` if the connection cannot be resolved.
    pub fn new<R>(
        registry: &R,
        config: &KeepConfig,
        alert_data: &Map<String, Value>,
    ) -> Result<Self, AppError>
    where
        R: ConnectionRegistry + ?Sized,
    {
        let payload = AlertPayload::from_map(alert_data, config.unknown_keys)?;
        let transport = ReqwestTransport::new(config.timeout()).map_err(SendError::from)?;
        Self::build(registry, config, payload, Box::new(transport))
    }

    /// Build a notifier over a caller-provided transport
    ///
    /// Errors are the same as [`KeepNotifier::new`], unwrapped.
    pub fn with_transport<R>(
        registry: &R,
        config: &KeepConfig,
        alert_data: &Map<String, Value>,
        transport: Box<dyn HttpTransport>,
    ) -> Result<Self, AppError>
    where
        R: ConnectionRegistry + ?Sized,
    {
        let payload = AlertPayload::from_map(alert_data, config.unknown_keys)?;
        Self::build(registry, config, payload, transport)
    }

    fn build<R>(
        registry: &R,
        config: &KeepConfig,
        payload: AlertPayload,
        transport: Box<dyn HttpTransport>,
    ) -> Result<Self, AppError>
    where
        R: ConnectionRegistry + ?Sized,
    {
        let client =
            AlertClient::from_connection(registry, &config.conn_id, &config.alert_endpoint, transport)?;

        Ok(Self {
            conn_id: config.conn_id.clone(),
            payload,
            client,
        })
    }

    /// The payload every notification starts from
    pub fn payload(&self) -> &AlertPayload {
        &self.payload
    }

    pub fn conn_id(&self) -> &str {
        &self.conn_id
    }

    /// The payload for one event, with context labels merged in
    pub fn enrich(&self, context: &EventContext) -> AlertPayload {
        let mut payload = self.payload.clone();
        payload.merge_labels(context.labels());
        payload
    }

    /// The request [`notify`](Notifier::notify) would send, without sending it
    pub fn preview(&self, context: &EventContext) -> Result<HttpRequest, NotificationError> {
        self.client
            .build_request(&self.enrich(context))
            .map_err(NotificationError::new)
    }
}

impl Notifier for KeepNotifier {
    fn notify(&self, context: &EventContext) -> Result<(), NotificationError> {
        let payload = self.enrich(context);

        self.client.send(&payload).map_err(|e| {
            log::error!(
                "Keep notification for '{}' via '{}' failed: {}",
                payload.name,
                self.conn_id,
                e
            );
            NotificationError::new(e)
        })
    }

    fn name(&self) -> &str {
        "keep"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::{Connection, StaticRegistry};
    use crate::error::{ConfigError, SendError};
    use crate::mock::{mock_registry, MockTransport};
    use serde_json::json;

    fn alert_data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn notifier(transport: &MockTransport, data: Value) -> KeepNotifier {
        KeepNotifier::with_transport(
            &mock_registry(),
            &KeepConfig::default(),
            &alert_data(data),
            Box::new(transport.clone()),
        )
        .unwrap()
    }

    fn context() -> EventContext {
        EventContext::new()
            .with_dag_id("wf1")
            .with_task_id("t1")
            .with_run_id("r1")
            .with_try_number(1)
    }

    #[test]
    fn test_notify_merges_context_labels() {
        let transport = MockTransport::with_response(201, "");
        let notifier = notifier(
            &transport,
            json!({
                "name": "TaskFailure",
                "severity": "critical",
                "labels": { "team": "data", "dag_id": "caller" },
            }),
        );

        notifier.notify(&context()).unwrap();

        let request = transport.last_request().unwrap();
        let labels = &request.body["labels"];
        assert_eq!(labels["dag_id"], json!("wf1"));
        assert_eq!(labels["task_id"], json!("t1"));
        assert_eq!(labels["run_id"], json!("r1"));
        assert_eq!(labels["try_number"], json!(1));
        assert_eq!(labels["team"], json!("data"));
        assert_eq!(request.body["severity"], json!("critical"));
        assert_eq!(request.url, "https://keep.example.com/alerts/event");
    }

    #[test]
    fn test_notify_does_not_leak_between_events() {
        let transport = MockTransport::new();
        let notifier = notifier(&transport, json!({ "name": "TaskFailure" }));

        notifier.notify(&context()).unwrap();
        notifier
            .notify(&EventContext::new().with_dag_id("wf2"))
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        let second = &requests[1].body["labels"];
        assert_eq!(second["dag_id"], json!("wf2"));
        assert!(second.get("task_id").is_none());
        assert!(notifier.payload().labels.is_empty());
    }

    #[test]
    fn test_notify_wraps_transmission_error() {
        let transport = MockTransport::with_response(500, "server error");
        let notifier = notifier(&transport, json!({ "name": "TaskFailure" }));

        let err = notifier.notify(&context()).unwrap_err();
        match err.cause() {
            AppError::Send(SendError::Transmission { status, body }) => {
                assert_eq!(*status, 500);
                assert_eq!(body, "server error");
            }
            other => panic!("unexpected cause: {other}"),
        }
        assert!(err.to_string().contains("server error"));
    }

    #[test]
    fn test_notify_wraps_transport_error() {
        let transport = MockTransport::failing("connection refused");
        let notifier = notifier(&transport, json!({ "name": "TaskFailure" }));

        let err = notifier.notify(&context()).unwrap_err();
        assert!(matches!(
            err.cause(),
            AppError::Send(SendError::Transport(_))
        ));
    }

    #[test]
    fn test_notify_with_empty_context() {
        let transport = MockTransport::new();
        let notifier = notifier(&transport, json!({ "name": "TaskFailure" }));

        assert!(notifier.notify(&EventContext::new()).is_ok());
        let request = transport.last_request().unwrap();
        assert_eq!(request.body["labels"], json!({}));
        assert_eq!(notifier.name(), "keep");
    }

    #[test]
    fn test_invalid_alert_data_fails_fast() {
        let transport = MockTransport::new();
        let result = KeepNotifier::with_transport(
            &StaticRegistry::new(),
            &KeepConfig::default(),
            &alert_data(json!({ "status": "exploded" })),
            Box::new(transport.clone()),
        );

        // Validation runs before the (empty) registry is consulted
        assert!(matches!(result, Err(AppError::Validation(ref e)) if e.has_field("name")));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_incomplete_connection_fails() {
        let registry =
            StaticRegistry::new().with_connection("keep_default", Connection::new("", "key"));
        let transport = MockTransport::new();

        let result = KeepNotifier::with_transport(
            &registry,
            &KeepConfig::default(),
            &alert_data(json!({ "name": "TaskFailure" })),
            Box::new(transport.clone()),
        );

        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::MissingEndpoint(_)))
        ));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_unknown_connection_is_not_wrapped() {
        let config = KeepConfig {
            conn_id: "keep_missing".to_string(),
            ..KeepConfig::default()
        };

        let result = KeepNotifier::with_transport(
            &mock_registry(),
            &config,
            &alert_data(json!({ "name": "TaskFailure" })),
            Box::new(MockTransport::new()),
        );

        match result {
            Err(AppError::Config(ConfigError::ConnectionNotFound(id))) => {
                assert_eq!(id, "keep_missing")
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("expected a configuration error"),
        }
    }

    #[test]
    fn test_custom_conn_and_endpoint() {
        let registry = StaticRegistry::new().with_connection(
            "keep_prod",
            Connection::new("https://keep.prod.example.com", "prod-key"),
        );
        let config = KeepConfig {
            conn_id: "keep_prod".to_string(),
            alert_endpoint: "/alerts/event/airflow".to_string(),
            ..KeepConfig::default()
        };
        let transport = MockTransport::new();

        let notifier = KeepNotifier::with_transport(
            &registry,
            &config,
            &alert_data(json!({ "name": "TaskFailure" })),
            Box::new(transport.clone()),
        )
        .unwrap();
        notifier.notify(&context()).unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(
            request.url,
            "https://keep.prod.example.com/alerts/event/airflow"
        );
        assert_eq!(request.header("X-API-KEY"), Some("prod-key"));
        assert_eq!(notifier.conn_id(), "keep_prod");
    }

    #[test]
    fn test_preview_sends_nothing() {
        let transport = MockTransport::new();
        let notifier = notifier(&transport, json!({ "name": "TaskFailure" }));

        let request = notifier.preview(&context()).unwrap();
        assert_eq!(request.body["labels"]["run_id"], json!("r1"));
        assert!(request.body["lastReceived"].is_string());
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_enrich_is_pure() {
        let transport = MockTransport::new();
        let notifier = notifier(&transport, json!({ "name": "TaskFailure" }));
        let a = notifier.enrich(&context());
        let b = notifier.enrich(&context());
        assert_eq!(a, b);
        assert!(a.last_received.is_none());
    }
}
