//! Task - unit of crawl work sent to the supplier
//!
//! Field names on the wire follow the supplier API (`soi`, `suitableAgents`).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default task priority (lower value = more urgent)
pub const DEFAULT_PRIORITY: i64 = 100;

/// Executor capable of running scripts in a real browser page
pub const HEADLESS_EXECUTOR: &str = "HEADLESSBROWSER";

/// Executor that fetches pages without a browser
pub const SERVICE_EXECUTOR: &str = "SERVICE";

/// Identity of the retailer service that owns a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOwner {
    pub global_id: String,
}

/// A crawl task
///
/// `priority` is advisory: the dispatch queue never reorders by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Page to process
    pub url: String,

    /// Owning retailer service
    #[serde(rename = "soi")]
    pub owner: TaskOwner,

    #[serde(default = "default_priority")]
    pub priority: i64,

    /// Executor capability tags
    #[serde(rename = "suitableAgents", default)]
    pub suitable_executors: BTreeSet<String>,

    /// Opaque, passed through to the executor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_wire_format() {
        let task = Task {
            url: "http://exampleblog.munew.io/".into(),
            owner: TaskOwner {
                global_id: "retailer-1".into(),
            },
            priority: 1,
            suitable_executors: [HEADLESS_EXECUTOR.to_string()].into_iter().collect(),
            metadata: Some(json!({"type": "bloglist"}).as_object().unwrap().clone()),
        };

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["soi"]["globalId"], "retailer-1");
        assert_eq!(value["suitableAgents"], json!(["HEADLESSBROWSER"]));
        assert_eq!(value["metadata"]["type"], "bloglist");
        assert_eq!(value["priority"], 1);
    }

    #[test]
    fn test_priority_defaults_when_missing() {
        let task: Task = serde_json::from_value(json!({
            "url": "http://a",
            "soi": {"globalId": "g"}
        }))
        .unwrap();
        assert_eq!(task.priority, DEFAULT_PRIORITY);
        assert!(task.suitable_executors.is_empty());
        assert!(task.metadata.is_none());
    }
}
