//! TaskFactory - builds tasks owned by this service

use std::collections::BTreeSet;

use contracts::{Task, TaskOwner, DEFAULT_PRIORITY, HEADLESS_EXECUTOR, SERVICE_EXECUTOR};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ServiceError};

/// Metadata key holding a page script; tasks without one may run on
/// non-browser executors
pub const SCRIPT_KEY: &str = "script";

/// Input of [`TaskFactory::generate`]; only `url` is required
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub url: String,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
    /// Overrides the default `{"HEADLESSBROWSER"}`
    #[serde(default, alias = "suitableAgents")]
    pub suitable_executors: Option<BTreeSet<String>>,
    /// Overrides the configured global id
    #[serde(default)]
    pub global_id: Option<String>,
}

impl TaskSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Builds tasks stamped with this service's identity
#[derive(Debug, Clone, Default)]
pub struct TaskFactory {
    global_id: Option<String>,
}

impl TaskFactory {
    pub fn new(global_id: Option<String>) -> Self {
        Self { global_id }
    }

    pub fn global_id(&self) -> Option<&str> {
        self.global_id.as_deref()
    }

    /// Build a task
    ///
    /// `"SERVICE"` is added to the executors when the metadata carries no
    /// script; `null`, `false`, `0` and `""` count as no script. A priority
    /// of 0 means unset and becomes the default.
    ///
    /// # Errors
    /// `MissingOwner` when neither the `TaskSpec` nor the factory has a global id.
    pub fn generate(&self, spec: TaskSpec) -> Result<Task> {
        let global_id = spec
            .global_id
            .or_else(|| self.global_id.clone())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ServiceError::MissingOwner {
                url: spec.url.clone(),
            })?;

        let mut executors = spec
            .suitable_executors
            .unwrap_or_else(|| BTreeSet::from([HEADLESS_EXECUTOR.to_string()]));
        let has_script = spec
            .metadata
            .as_ref()
            .and_then(|m| m.get(SCRIPT_KEY))
            .is_some_and(is_set);
        if !has_script {
            executors.insert(SERVICE_EXECUTOR.to_string());
        }

        Ok(Task {
            url: spec.url,
            owner: TaskOwner { global_id },
            priority: spec
                .priority
                .filter(|priority| *priority != 0)
                .unwrap_or(DEFAULT_PRIORITY),
            suitable_executors: executors,
            metadata: spec.metadata,
        })
    }

    /// Build several tasks, failing on the first without an owner
    pub fn generate_all(&self, specs: impl IntoIterator<Item = TaskSpec>) -> Result<Vec<Task>> {
        specs.into_iter().map(|spec| self.generate(spec)).collect()
    }
}

/// Whether a metadata value carries anything
fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
