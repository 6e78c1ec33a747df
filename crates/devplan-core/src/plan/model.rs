//! Serde types for the plan JSON format.
//!
//! These types map directly to the persisted plan file and to the object the
//! generator is asked to produce.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Root of a development plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    /// Project title.
    pub title: String,
    /// Project description.
    pub description: String,
    /// Top-level tasks in display order.
    pub tasks: Vec<Task>,
}

/// A node in the plan's task tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Canonical dotted id (`"2.3.1"`), derived from tree position.
    /// Generated plans may omit it or give a number; renumbering always
    /// assigns it.
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub task_id: String,
    /// Short task name.
    pub name: String,
    /// What the task should accomplish.
    pub description: String,
    /// Free-form implementation instructions, absent until populated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Ids of tasks that must be done first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub dependencies: Vec<String>,
    /// Child tasks in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Task>,
}

impl Task {
    /// Create a leaf task with no id, prompt or dependencies.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            task_id: String::new(),
            name: name.into(),
            description: description.into(),
            prompt: None,
            dependencies: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Whether the task carries a non-empty implementation prompt.
    pub fn has_prompt(&self) -> bool {
        self.prompt.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Treat an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept any JSON scalar as a string id; `null` becomes empty.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a task id string or number, got {other}"
        ))),
    }
}
