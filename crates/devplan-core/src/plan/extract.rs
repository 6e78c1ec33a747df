//! Tolerant extraction of plan JSON from generated text.
//!
//! Generators wrap the plan in prose or Markdown fences and sometimes echo
//! the JSON Schema next to the data. [`extract_json`] applies a chain of
//! textual repairs and [`parse_and_validate`] turns the result into a
//! [`Plan`], falling back to further recovery before giving up.
//!
//! The repairs are best effort: they make mechanically recoverable text
//! parse, they do not make it semantically correct.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::model::Plan;
use super::schema::REQUIRED_PLAN_KEYS;

/// First fenced block, optionally tagged `json`.
static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("valid fence regex"));

/// Offending text is cut to this many characters in error messages.
const SNIPPET_LIMIT: usize = 500;

/// Distance past the start of `"definitions"` before looking for the plan's
/// opening brace; clears the key and the brace of the definitions map.
const DEFINITIONS_SKIP: usize = 20;

/// Errors that can occur while extracting and validating a plan.
#[derive(Debug, Error)]
pub enum PlanParseError {
    #[error("failed to parse plan JSON: {source}\ncontent: {snippet}")]
    Json {
        snippet: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("plan JSON must be an object")]
    NotAnObject,

    #[error("missing required fields in plan JSON: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("invalid plan structure: {0}")]
    InvalidStructure(#[source] serde_json::Error),
}

/// Normalize generator output into a JSON candidate.
///
/// 1. The content of the first fenced block replaces the whole text.
/// 2. Text that already parses is returned as is.
/// 3. When the text holds several objects and one of them is an echoed
///    JSON Schema, that object is cut out and the rest is re-wrapped in
///    braces.
///
/// The result is not guaranteed to parse; [`parse_and_validate`] continues
/// the recovery from here.
pub fn extract_json(raw: &str) -> String {
    let text = strip_fence(raw);

    if serde_json::from_str::<Value>(&text).is_ok() {
        return text;
    }

    if text.matches('{').count() > 1 && text.matches('}').count() > 1 {
        if let Some(span) = find_schema_span(&text) {
            debug!(start = span.start, end = span.end, "removing echoed schema");
            return excise(&text, span);
        }
    }

    text
}

/// Extract, parse and validate a plan from generator output.
pub fn parse_and_validate(raw: &str) -> Result<Plan, PlanParseError> {
    let candidate = extract_json(raw);
    let value = match serde_json::from_str::<Value>(&candidate) {
        Ok(value) => value,
        Err(source) => {
            debug!(error = %source, "plan JSON did not parse, trying recovery");
            recover_after_definitions(&candidate)
                .or_else(|| find_plan_object(&candidate))
                .or_else(|| find_plan_object(&strip_fence(raw)))
                .ok_or_else(|| PlanParseError::Json {
                    snippet: snippet(&candidate),
                    source,
                })?
        }
    };
    validate(value)
}

/// Parse a plan file strictly, without any repair.
pub fn parse_plan_file(content: &str) -> Result<Plan, PlanParseError> {
    let value = serde_json::from_str::<Value>(content).map_err(|source| PlanParseError::Json {
        snippet: snippet(content),
        source,
    })?;
    validate(value)
}

/// Check the required keys, then deserialize.
fn validate(value: Value) -> Result<Plan, PlanParseError> {
    let Value::Object(map) = &value else {
        return Err(PlanParseError::NotAnObject);
    };

    let missing: Vec<String> = REQUIRED_PLAN_KEYS
        .iter()
        .filter(|key| !map.contains_key(**key))
        .map(|key| (*key).to_owned())
        .collect();
    if !missing.is_empty() {
        return Err(PlanParseError::MissingFields(missing));
    }

    serde_json::from_value(value).map_err(PlanParseError::InvalidStructure)
}

/// Content of the first fenced block, or the whole text.
fn strip_fence(raw: &str) -> String {
    match FENCED_BLOCK.captures(raw) {
        Some(caps) => caps[1].trim().to_owned(),
        None => raw.to_owned(),
    }
}

/// Byte ranges of every balanced `{...}` span, ordered by opening brace.
///
/// Quotes are only tracked inside an object, so stray quotes in surrounding
/// prose do not hide braces. Escapes inside strings are honoured.
fn object_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut open = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, byte) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' if !open.is_empty() => in_string = true,
            b'{' => open.push(i),
            b'}' => {
                if let Some(start) = open.pop() {
                    spans.push(start..i + 1);
                }
            }
            _ => {}
        }
    }

    spans.sort_by_key(|span| span.start);
    spans
}

fn find_schema_span(text: &str) -> Option<Range<usize>> {
    object_spans(text)
        .into_iter()
        .find(|span| is_schema_object(&text[span.clone()]))
}

/// A schema object has `$schema` and `definitions.task`. Spans that do not
/// parse on their own are matched textually, anchored on a leading
/// `"$schema"` key.
fn is_schema_object(span: &str) -> bool {
    match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(map)) => {
            map.contains_key("$schema")
                && map
                    .get("definitions")
                    .and_then(|defs| defs.get("task"))
                    .is_some()
        }
        Ok(_) => false,
        Err(_) => {
            span[1..].trim_start().starts_with("\"$schema\"")
                && span.contains("\"definitions\"")
                && span.contains("\"task\"")
        }
    }
}

/// Remove `span` and re-wrap what is left as a single object.
fn excise(text: &str, span: Range<usize>) -> String {
    let mut residual = String::with_capacity(text.len());
    residual.push_str(&text[..span.start]);
    residual.push_str(&text[span.end..]);

    let mut rest = residual.trim_start();
    if let Some(stripped) = rest.strip_prefix(',') {
        rest = stripped.trim_start();
    }

    let mut cleaned = String::with_capacity(rest.len() + 2);
    if !rest.starts_with('{') {
        cleaned.push('{');
    }
    let rest = rest.trim_end();
    cleaned.push_str(rest);
    if !rest.ends_with('}') {
        cleaned.push('}');
    }
    cleaned
}

/// Take everything from the first brace after the schema's `"definitions"`.
fn recover_after_definitions(text: &str) -> Option<Value> {
    let key = text.find("\"definitions\"")?;
    let from = key + DEFINITIONS_SKIP;
    let start = from + text.get(from..)?.find('{')?;
    let value = serde_json::from_str(&text[start..]).ok()?;
    debug!(start, "recovered plan after schema definitions");
    Some(value)
}

/// First balanced object that parses and carries every plan key.
fn find_plan_object(text: &str) -> Option<Value> {
    object_spans(text).into_iter().find_map(|span| {
        match serde_json::from_str::<Value>(&text[span]) {
            Ok(value @ Value::Object(_))
                if REQUIRED_PLAN_KEYS.iter().all(|key| value.get(key).is_some()) =>
            {
                Some(value)
            }
            _ => None,
        }
    })
}

fn snippet(text: &str) -> String {
    let mut chars = text.chars();
    let mut out: String = chars.by_ref().take(SNIPPET_LIMIT).collect();
    if chars.next().is_some() {
        out.push_str("...");
    }
    out
}
