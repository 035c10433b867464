//! Keep alert payload
//!
//! Provides the validated, normalized alert record and the field-by-field
//! schema check that builds it from an arbitrary JSON mapping.

use super::status::{AlertSeverity, AlertStatus};
use crate::error::{FieldViolation, ValidationError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::str::FromStr;

/// Maximum number of characters in `message` and `description`
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Environment used when the caller gives none
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Source used when the caller gives none
pub const DEFAULT_SOURCE: &str = "python";

/// Every key the schema understands, in wire form
pub const KNOWN_FIELDS: [&str; 18] = [
    "id",
    "name",
    "status",
    "severity",
    "lastReceived",
    "firingStartTime",
    "environment",
    "service",
    "source",
    "message",
    "description",
    "pushed",
    "url",
    "imageUrl",
    "labels",
    "fingerprint",
    "assignee",
    "note",
];

/// What to do with keys the schema does not know
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// Drop them silently
    #[default]
    Ignore,
    /// Report each one as a violation
    Reject,
}

/// A normalized alert record, ready to be sent to Keep
///
/// Optional fields serialize as `null` so the service always receives the
/// full record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPayload {
    /// Unique identifier for the alert
    pub id: Option<String>,
    /// Human-readable name of the alert
    pub name: String,
    pub status: AlertStatus,
    pub severity: AlertSeverity,
    /// ISO timestamp of last alert occurrence
    pub last_received: Option<String>,
    /// ISO timestamp when the alert first fired
    pub firing_start_time: Option<String>,
    pub environment: String,
    /// Service or application affected
    pub service: Option<String>,
    /// Sources that triggered the alert
    pub source: Vec<String>,
    /// Concise alert summary
    pub message: Option<String>,
    /// Detailed explanation
    pub description: Option<String>,
    pub pushed: bool,
    /// URL for additional context
    pub url: Option<String>,
    pub image_url: Option<String>,
    /// Key-value metadata pairs
    pub labels: Map<String, Value>,
    /// Identifier used by Keep to group alerts
    pub fingerprint: Option<String>,
    pub assignee: Option<String>,
    pub note: Option<String>,
}

impl AlertPayload {
    /// Create a payload with every field at its default
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            status: AlertStatus::default(),
            severity: AlertSeverity::default(),
            last_received: None,
            firing_start_time: None,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            service: None,
            source: vec![DEFAULT_SOURCE.to_string()],
            message: None,
            description: None,
            pushed: true,
            url: None,
            image_url: None,
            labels: Map::new(),
            fingerprint: None,
            assignee: None,
            note: None,
        }
    }

    /// Build a payload from any JSON value, which must be an object
    ///
    /// # Errors
    /// Returns `ValidationError` listing every violated field
    pub fn from_value(value: &Value, policy: UnknownKeyPolicy) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Self::from_map(map, policy),
            other => Err(ValidationError::new(vec![FieldViolation::new(
                "<root>",
                format!("expected an object, got {}", json_type(other)),
            )])),
        }
    }

    /// Build a payload from a caller-supplied mapping
    ///
    /// All fields are checked before returning, so the error carries every
    /// violation rather than the first one.
    ///
    /// # Errors
    /// Returns `ValidationError` listing every violated field
    pub fn from_map(
        map: &Map<String, Value>,
        policy: UnknownKeyPolicy,
    ) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::new(map);

        let payload = Self {
            id: reader.optional_string("id"),
            name: reader.required_string("name"),
            status: reader.enum_or("status", AlertStatus::default()),
            severity: reader.enum_or("severity", AlertSeverity::default()),
            last_received: reader.optional_string("lastReceived"),
            firing_start_time: reader.optional_string("firingStartTime"),
            environment: reader.string_or("environment", DEFAULT_ENVIRONMENT),
            service: reader.optional_string("service"),
            source: reader.string_list_or("source", &[DEFAULT_SOURCE]),
            message: reader.optional_string("message"),
            description: reader.optional_string("description"),
            pushed: reader.bool_or("pushed", true),
            url: reader.optional_string("url"),
            image_url: reader.optional_string("imageUrl"),
            labels: reader.object_or_empty("labels"),
            fingerprint: reader.optional_string("fingerprint"),
            assignee: reader.optional_string("assignee"),
            note: reader.optional_string("note"),
        };

        let unknown = reader.unknown_keys();
        let mut violations = reader.into_violations();

        if !unknown.is_empty() {
            match policy {
                UnknownKeyPolicy::Ignore => {
                    log::debug!("Ignoring unknown payload keys: {}", unknown.join(", "));
                }
                UnknownKeyPolicy::Reject => {
                    violations.extend(
                        unknown
                            .into_iter()
                            .map(|key| FieldViolation::new(key, "unknown field")),
                    );
                }
            }
        }

        violations.extend(payload.invariant_violations());

        if violations.is_empty() {
            Ok(payload)
        } else {
            Err(ValidationError::new(dedup(violations)))
        }
    }

    /// Re-check the invariants of an already constructed payload
    ///
    /// Fields are public, so anything that mutates a payload must call this
    /// before handing it to the transport.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let violations = self.invariant_violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }

    /// Fill `lastReceived`, and `firingStartTime` for firing alerts, when absent
    pub fn fill_timestamps(&mut self, now: DateTime<Utc>) {
        let stamp = now.to_rfc3339_opts(SecondsFormat::Micros, true);

        if self.last_received.is_none() {
            self.last_received = Some(stamp.clone());
        }

        if self.status == AlertStatus::Firing && self.firing_start_time.is_none() {
            self.firing_start_time = Some(stamp);
        }
    }

    /// Insert labels, overwriting any existing label with the same key
    pub fn merge_labels<I>(&mut self, labels: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (key, value) in labels {
            self.labels.insert(key, value);
        }
    }

    /// Serialize into the JSON document sent to Keep
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn invariant_violations(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push(FieldViolation::new("name", "must not be empty"));
        }

        for (field, text) in [
            ("message", &self.message),
            ("description", &self.description),
        ] {
            if let Some(text) = text {
                let len = text.chars().count();
                if len > MAX_TEXT_LENGTH {
                    violations.push(FieldViolation::new(
                        field,
                        format!(
                            "must be at most {} characters, got {}",
                            MAX_TEXT_LENGTH, len
                        ),
                    ));
                }
            }
        }

        violations
    }
}

/// Reads typed fields out of a JSON object, collecting violations as it goes
struct FieldReader<'a> {
    map: &'a Map<String, Value>,
    seen: HashSet<&'static str>,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    fn new(map: &'a Map<String, Value>) -> Self {
        Self {
            map,
            seen: HashSet::new(),
            violations: Vec::new(),
        }
    }

    fn get(&mut self, key: &'static str) -> Option<&'a Value> {
        self.seen.insert(key);
        self.map.get(key)
    }

    fn violation(&mut self, key: &str, reason: impl Into<String>) {
        self.violations.push(FieldViolation::new(key, reason));
    }

    fn mismatch(&mut self, key: &str, expected: &str, got: &Value) {
        self.violation(key, format!("expected {}, got {}", expected, json_type(got)));
    }

    fn optional_string(&mut self, key: &'static str) -> Option<String> {
        match self.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.mismatch(key, "a string", other);
                None
            }
        }
    }

    fn required_string(&mut self, key: &'static str) -> String {
        match self.get(key) {
            None => {
                self.violation(key, "field required");
                String::new()
            }
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                self.mismatch(key, "a string", other);
                String::new()
            }
        }
    }

    fn string_or(&mut self, key: &'static str, default: &str) -> String {
        match self.get(key) {
            None => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                self.mismatch(key, "a string", other);
                default.to_string()
            }
        }
    }

    fn enum_or<T>(&mut self, key: &'static str, default: T) -> T
    where
        T: FromStr<Err = String>,
    {
        match self.get(key) {
            None => default,
            Some(Value::String(s)) => match s.parse() {
                Ok(value) => value,
                Err(reason) => {
                    self.violation(key, reason);
                    default
                }
            },
            Some(other) => {
                self.mismatch(key, "a string", other);
                default
            }
        }
    }

    fn bool_or(&mut self, key: &'static str, default: bool) -> bool {
        match self.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.mismatch(key, "a boolean", other);
                default
            }
        }
    }

    fn string_list_or(&mut self, key: &'static str, default: &[&str]) -> Vec<String> {
        let fallback = || -> Vec<String> { default.iter().map(|s| s.to_string()).collect() };

        match self.get(key) {
            None => fallback(),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    match item {
                        Value::String(s) => out.push(s.clone()),
                        other => {
                            let field = format!("{}[{}]", key, i);
                            self.mismatch(&field, "a string", other);
                        }
                    }
                }
                out
            }
            Some(other) => {
                self.mismatch(key, "a list of strings", other);
                fallback()
            }
        }
    }

    fn object_or_empty(&mut self, key: &'static str) -> Map<String, Value> {
        match self.get(key) {
            None => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                self.mismatch(key, "an object", other);
                Map::new()
            }
        }
    }

    fn unknown_keys(&self) -> Vec<String> {
        self.map
            .keys()
            .filter(|key| !self.seen.contains(key.as_str()))
            .cloned()
            .collect()
    }

    fn into_violations(self) -> Vec<FieldViolation> {
        self.violations
    }
}

/// Drop repeated reports for the same field, keeping the first
fn dedup(violations: Vec<FieldViolation>) -> Vec<FieldViolation> {
    let mut fields = HashSet::new();
    violations
        .into_iter()
        .filter(|v| fields.insert(v.field.clone()))
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
