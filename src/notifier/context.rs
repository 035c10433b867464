//! Task lifecycle event context
//!
//! What the orchestration runtime knows about the event that triggered a
//! notification. Every field is optional; absent fields are not forwarded.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identity and run metadata of a task lifecycle event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventContext {
    /// Workflow (DAG) identifier
    pub dag_id: Option<String>,
    pub task_id: Option<String>,
    pub run_id: Option<String>,
    /// Logical execution timestamp of the run
    pub execution_date: Option<DateTime<Utc>>,
    /// Current attempt, starting at 1
    pub try_number: Option<u32>,
}

impl EventContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a context handed over as a JSON mapping
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Builder: set the workflow identifier
    pub fn with_dag_id(mut self, dag_id: impl Into<String>) -> Self {
        self.dag_id = Some(dag_id.into());
        self
    }

    /// Builder: set the task identifier
    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Builder: set the run identifier
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Builder: set the execution timestamp
    pub fn with_execution_date(mut self, execution_date: DateTime<Utc>) -> Self {
        self.execution_date = Some(execution_date);
        self
    }

    /// Builder: set the attempt number
    pub fn with_try_number(mut self, try_number: u32) -> Self {
        self.try_number = Some(try_number);
        self
    }

    /// Labels contributed by this context, present fields only
    pub fn labels(&self) -> Vec<(String, Value)> {
        let mut labels = Vec::with_capacity(5);

        let strings = [
            ("dag_id", &self.dag_id),
            ("task_id", &self.task_id),
            ("run_id", &self.run_id),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                labels.push((key.to_string(), Value::String(value.clone())));
            }
        }

        if let Some(date) = self.execution_date {
            labels.push((
                "execution_date".to_string(),
                Value::String(date.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            ));
        }

        if let Some(try_number) = self.try_number {
            labels.push(("try_number".to_string(), Value::from(try_number)));
        }

        labels
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.labels().is_empty()
    }
}
