//! JSON Schema describing the plan format.
//!
//! The schema is embedded in the plan-generation prompt and printed by
//! `devplan schema`. It is built once and shared read-only.

use once_cell::sync::Lazy;
use serde_json::{Value, json};

static PLAN_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft/2020-12/schema",
        "title": "Project Schema",
        "type": "object",
        "properties": {
            "title": { "type": "string" },
            "description": { "type": "string" },
            "tasks": {
                "type": "array",
                "items": { "$ref": "#/definitions/task" }
            }
        },
        "required": ["title", "description", "tasks"],
        "definitions": {
            "task": {
                "type": "object",
                "properties": {
                    "task_id": { "type": "string" },
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "prompt": { "type": "string" },
                    "tasks": {
                        "type": "array",
                        "items": { "$ref": "#/definitions/task" }
                    },
                    "dependencies": {
                        "type": "array",
                        "items": { "type": "string" }
                    }
                },
                "required": ["task_id", "name", "description"]
            }
        }
    })
});

/// Keys every plan object must carry.
pub const REQUIRED_PLAN_KEYS: [&str; 3] = ["title", "description", "tasks"];

/// The plan JSON Schema.
pub fn plan_schema() -> &'static Value {
    &PLAN_SCHEMA
}

/// The plan JSON Schema, pretty-printed with two-space indentation.
pub fn plan_schema_pretty() -> String {
    // Serializing a `Value` built from `json!` cannot fail.
    serde_json::to_string_pretty(plan_schema()).unwrap_or_default()
}
